//! A module which frames messages on the wire: a 4-byte big-endian length prefix followed by
//! the bincode encoding of the message.

use std::io::{self, Read, Write};

use bincode::{deserialize, serialize};

use crate::message::Message;

// Upper bound on a single encoded message. A frame that announces more than this is not one of
// ours and the connection carrying it is abandoned.
pub const MAX_MESSAGE_SIZE: usize = 16384;

/// Writes one length-prefixed message to the given writer.
pub fn write_message<W: Write>(writer: &mut W, message: &Message) -> io::Result<()> {
    let encoded: Vec<u8> =
        serialize(message).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

    if encoded.len() > MAX_MESSAGE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("message of {} bytes exceeds the frame limit", encoded.len()),
        ));
    }

    writer.write_all(&(encoded.len() as u32).to_be_bytes())?;
    writer.write_all(&encoded)?;
    writer.flush()
}

/// Reads exactly one length-prefixed message from the given reader. Any framing or decoding
/// failure is reported as an error; the caller drops the connection and nothing else changes.
pub fn read_message<R: Read>(reader: &mut R) -> io::Result<Message> {
    let mut length_bytes = [0u8; 4];
    reader.read_exact(&mut length_bytes)?;
    let length = u32::from_be_bytes(length_bytes) as usize;

    if length > MAX_MESSAGE_SIZE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame of {} bytes exceeds the frame limit", length),
        ));
    }

    let mut encoded = vec![0u8; length];
    reader.read_exact(&mut encoded)?;

    deserialize(&encoded).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}
