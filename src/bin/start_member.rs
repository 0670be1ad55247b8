//! A script used to start one council member, which will listen for its peers and drive an
//! election every time a candidate name is entered on the standard input.
//!
//! You can run this binary as follows
//!     RUST_LOG=council_paxos=info cargo run --bin start_member -- <member_id> Config [behavior]
//! where <member_id> is this member's id in the configuration and behavior is one of
//! immediate, small-delay, large-delay or no-response (immediate when omitted).

extern crate council_paxos;
extern crate env_logger;
#[macro_use]
extern crate log;
#[macro_use]
extern crate text_io;

use std::env;
use std::io;
use std::io::prelude::*;

use council_paxos::behavior::Behavior;
use council_paxos::configurations::get_config;
use council_paxos::council::CouncilMember;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    info!("{:?}", args);

    match args.len() {
        len if len == 3 || len == 4 => {
            let id = &args[1];
            let id: usize = match id.parse() {
                Ok(n) => n,
                Err(_) => {
                    eprintln!("Error: second argument not an usize");
                    return;
                }
            };

            let config_file_name = &args[2];
            let address_book = get_config(config_file_name);

            let behavior = if len == 4 {
                match args[3].parse() {
                    Ok(behavior) => behavior,
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        return;
                    }
                }
            } else {
                Behavior::ImmediateResponse
            };

            let port = match address_book.get(&id) {
                Some(address) => address.port(),
                None => {
                    eprintln!("Error: member {} is not in the configuration", id);
                    return;
                }
            };

            let member = CouncilMember::new(id, behavior, address_book, port);
            member.listen().expect("Could not bind the member's endpoint");

            loop {
                print!("Enter a candidate name (or quit): ");
                io::stdout().flush().ok().expect("Could not flush stdout"); // print! is not very clever.
                let candidate: String = read!();

                if candidate == "quit" {
                    member.shutdown();
                    return;
                }

                let elected = member.start_election(&candidate);
                println!(
                    "election for {:?} {}",
                    candidate,
                    if elected { "succeeded" } else { "failed" }
                );
            }
        }
        _ => {
            panic!("Expected 2 or 3 arguments (excluding file name)");
        }
    }
}
