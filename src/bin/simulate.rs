//! An example which simulates a presidential election locally (on one machine).
//!
//! Run this binary as follows
//!     RUST_LOG=council_paxos=info cargo run --bin simulate

extern crate council_paxos;
extern crate env_logger;
#[macro_use]
extern crate log;
extern crate rand;

use std::thread;
use std::time::Duration;

use rand::thread_rng;

use council_paxos::behavior::Behavior;
use council_paxos::configurations::local_address_book;
use council_paxos::council::CouncilMember;

fn main() {
    env_logger::init();

    let size: usize = 9;
    let base_port: u16 = 8001;
    let address_book = local_address_book(size, base_port);

    let mut rng = thread_rng();

    let members: Vec<CouncilMember> = (1..=size)
        .map(|id| {
            // Member 9 drives the election, so it stays responsive; the others get a random
            // responsive profile to exercise the timing paths.
            let behavior = if id == size {
                Behavior::ImmediateResponse
            } else {
                Behavior::random_responsive(&mut rng)
            };

            let port = address_book[&id].port();
            let member = CouncilMember::new(id, behavior, address_book.clone(), port);
            member.listen().expect("Could not bind the member's endpoint");

            info!("[M={}] Listening with behavior {:?}.", id, behavior);
            member
        })
        .collect();

    let proposer = &members[size - 1];
    let candidate = format!("Member {}", proposer.id());
    let elected = proposer.start_election(&candidate);

    info!("Election driven by member {} returned {}.", proposer.id(), elected);

    // Give the propagation flood a moment to reach the slowest members.
    thread::sleep(Duration::from_secs(6));

    for member in &members {
        println!(
            "member {} accepted {:?} (proposal {})",
            member.id(),
            member.accepted_value(),
            member.accepted_proposal_number()
        );
    }

    for member in &members {
        member.shutdown();
    }
}
