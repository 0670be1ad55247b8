extern crate bincode;
extern crate config;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate rand;
extern crate serde;
#[macro_use]
extern crate serde_derive;

mod codec;
mod transport;
pub mod behavior;
pub mod configurations;
pub mod council;
pub mod message;
