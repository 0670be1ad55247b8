//! A module which contains the definition of the messages that council members exchange while
//! electing a president.

/// An enum which contains all types of messages which members, in the Paxos algorithm, can
/// exchange. Every message carries the proposal number it refers to and the stable id of the
/// member that sent it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum Message {
    Prepare(Prepare),
    Promise(Promise),
    AcceptRequest(AcceptRequest),
    Accepted(Accepted),
    Nack(Nack),
}

impl Message {
    /// The id of the member that sent this message.
    pub fn sender(&self) -> usize {
        match self {
            Message::Prepare(m) => m.from,
            Message::Promise(m) => m.from,
            Message::AcceptRequest(m) => m.from,
            Message::Accepted(m) => m.from,
            Message::Nack(m) => m.from,
        }
    }
}

/// In phase 1a, a proposer asks every other member to promise not to accept proposals numbered
/// below its own.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Prepare {
    // The proposal number the proposer wants promises for.
    pub proposal_number: i64,

    // The id of the proposer.
    pub from: usize,
}

/// In phase 1b, an acceptor answers a Prepare whose number is higher than anything it has
/// promised so far.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Promise {
    // The number the acceptor is now promised to, i.e. its highest promised proposal number.
    pub proposal_number: i64,

    // The value the acceptor last accepted, if it has accepted anything at all. A proposer that
    // learns of such a value must adopt it instead of its own candidate.
    pub accepted_value: Option<String>,

    // The id of the acceptor.
    pub from: usize,
}

/// In phase 2a, a proposer that gathered a majority of promises asks every other member to
/// accept a value. The same message kind also disseminates an already-chosen value to members
/// that have not accepted it yet.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AcceptRequest {
    pub proposal_number: i64,

    // The value the proposer picked: either its own candidate or the value adopted from the
    // highest-numbered promise it received.
    pub proposed_value: String,

    pub from: usize,
}

/// In phase 2b, an acceptor confirms that it accepted a proposal.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Accepted {
    pub proposal_number: i64,

    pub proposed_value: String,

    pub from: usize,
}

/// A rejection, sent in place of a Promise or an Accepted when the inbound proposal number is
/// too low. Informational only: nobody retries or bumps counters because of a Nack.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Nack {
    // The number the rejecting member is currently promised to.
    pub proposal_number: i64,

    pub from: usize,
}
