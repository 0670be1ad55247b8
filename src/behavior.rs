//! A module which contains the per-member fault profile. The profile shapes only the member's
//! outbound traffic: inbound messages are always delivered to the handlers.

use std::str::FromStr;
use std::time::Duration;

use rand::distributions::{Distribution, Standard};
use rand::Rng;

pub const SMALL_DELAY: Duration = Duration::from_secs(1);
pub const LARGE_DELAY: Duration = Duration::from_secs(5);

/// How a member treats each message it is about to send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Send right away.
    ImmediateResponse,

    /// Hold every outbound message for one second before sending it.
    SmallDelay,

    /// Hold every outbound message for five seconds. Phase timeouts are dimensioned so that a
    /// member this slow still makes it into a majority.
    LargeDelay,

    /// Drop every outbound message. The member keeps listening and keeps its state current,
    /// but from the outside it is silent.
    NoResponse,
}

impl Behavior {
    /// The pause served before each outbound send.
    pub fn send_delay(&self) -> Duration {
        match self {
            Behavior::ImmediateResponse => Duration::from_secs(0),
            Behavior::SmallDelay => SMALL_DELAY,
            Behavior::LargeDelay => LARGE_DELAY,
            Behavior::NoResponse => Duration::from_secs(0),
        }
    }

    /// Whether outbound messages are dropped instead of sent.
    pub fn drops_messages(&self) -> bool {
        *self == Behavior::NoResponse
    }

    /// Samples one of the three responsive profiles. Used by simulations that want faulty
    /// timing without silent members.
    pub fn random_responsive<R: Rng + ?Sized>(rng: &mut R) -> Behavior {
        match rng.gen_range(0, 3) {
            0 => Behavior::ImmediateResponse,
            1 => Behavior::SmallDelay,
            _ => Behavior::LargeDelay,
        }
    }
}

impl Distribution<Behavior> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Behavior {
        match rng.gen_range(0, 4) {
            0 => Behavior::ImmediateResponse,
            1 => Behavior::SmallDelay,
            2 => Behavior::LargeDelay,
            _ => Behavior::NoResponse,
        }
    }
}

impl FromStr for Behavior {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "immediate" => Ok(Behavior::ImmediateResponse),
            "small-delay" => Ok(Behavior::SmallDelay),
            "large-delay" => Ok(Behavior::LargeDelay),
            "no-response" => Ok(Behavior::NoResponse),
            other => Err(format!("unknown behavior: {}", other)),
        }
    }
}
