//! A module which moves whole messages between members. Every outbound message travels on its
//! own TCP connection: dial, write one frame, close. Inbound connections are accepted by the
//! member's listener loop and carry exactly one frame each.

use std::io;
use std::net::{SocketAddrV4, TcpListener, TcpStream};

use crate::codec;
use crate::message::Message;

/// Binds the member's listening endpoint. The listener is non-blocking so the accept loop can
/// notice a shutdown request between connections.
pub fn bind(port: u16) -> io::Result<TcpListener> {
    let listener = TcpListener::bind(("0.0.0.0", port))?;
    listener.set_nonblocking(true)?;
    Ok(listener)
}

/// Sends one message to the given endpoint on a fresh connection. A failure here is equivalent
/// to the message being lost on the network; callers log it and move on.
pub fn send(address: &SocketAddrV4, message: &Message) -> io::Result<()> {
    let mut stream = TcpStream::connect(address)?;
    codec::write_message(&mut stream, message)
}

/// Reads the single message carried by an accepted connection.
pub fn receive(stream: &mut TcpStream) -> io::Result<Message> {
    // Accepted sockets may inherit the listener's non-blocking mode on some platforms.
    stream.set_nonblocking(false)?;
    codec::read_message(stream)
}
