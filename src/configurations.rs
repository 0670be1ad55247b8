//! A module that contains functions required to read, parse and return the council
//! configuration from the file `Config.toml` at the root of this crate.

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::str::FromStr;

use config::{Config, File};

/// Reads the `[council]` section of the given configuration file and returns the address
/// book: the mapping from member id to endpoint, identical on every member.
pub fn get_config(file_name: &str) -> HashMap<usize, SocketAddrV4> {
    let c = read_config(file_name);
    parse_config(&c)
}

fn read_config(file_name: &str) -> HashMap<String, HashMap<String, String>> {
    let mut c = Config::default();
    c.merge(File::with_name(file_name)).unwrap();
    c.try_into::<HashMap<String, HashMap<String, String>>>().expect("Could not try_into")
}

fn parse_config(c: &HashMap<String, HashMap<String, String>>) -> HashMap<usize, SocketAddrV4> {
    let council = &c["council"];

    let size: usize = council["size"].parse().expect("Could not parse the council size");
    let host =
        Ipv4Addr::from_str(&council["host"]).expect("Could not parse the council host");
    let base_port: u16 =
        council["base_port"].parse().expect("Could not parse the council base port");

    address_book(size, host, base_port)
}

/// Builds the id to endpoint mapping for a council of the given size. Member i listens on
/// base_port + i - 1, so the reference council of nine spans base_port..base_port + 8.
pub fn address_book(size: usize, host: Ipv4Addr, base_port: u16) -> HashMap<usize, SocketAddrV4> {
    (1..=size)
        .map(|id| (id, SocketAddrV4::new(host, base_port + id as u16 - 1)))
        .collect()
}

/// The localhost address book used by single-machine simulations and tests.
pub fn local_address_book(size: usize, base_port: u16) -> HashMap<usize, SocketAddrV4> {
    address_book(size, Ipv4Addr::LOCALHOST, base_port)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_address_book_covers_every_member() {
        let book = local_address_book(9, 8001);

        assert_eq!(9, book.len());
        assert_eq!(8001, book[&1].port());
        assert_eq!(8009, book[&9].port());
        assert!(book.values().all(|a| *a.ip() == Ipv4Addr::LOCALHOST));
    }
}
