//! The module that contains the council member core. Every member plays the proposer, acceptor
//! and learner roles of the Paxos algorithm at once: it answers its peers' messages according
//! to the Paxos rules and can drive an election for a president of its own choosing.

use std::collections::{HashMap, HashSet};
use std::io;
use std::net::{SocketAddrV4, TcpListener};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::{Duration, Instant};

use log::Level;

use crate::behavior::Behavior;
use crate::message::{AcceptRequest, Accepted, Message, Nack, Prepare, Promise};
use crate::transport;

/// How long the election driver waits for a majority in each phase. Must stay at least twice
/// the largest behavior delay so that slow-but-present members still make it into a majority.
pub const PHASE_TIMEOUT: Duration = Duration::from_secs(10);

// Granularity of the driver's majority polling.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

// Pause between accept attempts on the non-blocking listener.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// The mutable Paxos state of one member. Handlers and the election driver only touch it
/// through the member's mutex, so every decision sees a consistent snapshot. Each handler
/// returns the messages to send in response instead of sending them itself; the caller pushes
/// them through the behavior gate after releasing the lock.
struct PaxosState {
    // The id of the member owning this state.
    id: usize,

    // The ids of the other members, used when flooding accept requests.
    peers: Vec<usize>,

    // The number of members, this one included, that makes a strict majority.
    majority: usize,

    // Counter used when this member proposes. Incremented before each phase 1. Counters are
    // per-proposer, so two members' first proposals both carry the number 1 and the earlier
    // prepare wins at each acceptor.
    proposal_number: i64,

    // The highest proposal number this member has promised to. -1 until the first promise.
    promised_proposal_number: i64,

    // The highest proposal number this member has accepted. -1 until the first acceptance.
    accepted_proposal_number: i64,

    // The value bound to accepted_proposal_number.
    accepted_value: Option<String>,

    // The members that have promised this member's current proposal.
    promised_by: HashSet<usize>,

    // The members that have accepted this member's current proposal.
    accepted_by: HashSet<usize>,
}

impl PaxosState {
    fn new(id: usize, member_ids: &[usize]) -> PaxosState {
        PaxosState {
            id,
            peers: member_ids.iter().copied().filter(|&m| m != id).collect(),
            majority: member_ids.len() / 2 + 1,
            proposal_number: 0,
            promised_proposal_number: -1,
            accepted_proposal_number: -1,
            accepted_value: None,
            promised_by: HashSet::new(),
            accepted_by: HashSet::new(),
        }
    }

    /// Dispatches one inbound message and returns the messages to send in response.
    fn handle(&mut self, message: Message) -> Vec<(usize, Message)> {
        match message {
            Message::Prepare(prepare) => self.handle_prepare(prepare),
            Message::Promise(promise) => self.handle_promise(promise),
            Message::AcceptRequest(request) => self.handle_accept_request(request),
            Message::Accepted(accepted) => self.handle_accepted(accepted),
            Message::Nack(nack) => self.handle_nack(nack),
        }
    }

    /// A prepare is promised only when its number beats every promise made so far.
    fn handle_prepare(&mut self, prepare: Prepare) -> Vec<(usize, Message)> {
        if prepare.proposal_number > self.promised_proposal_number {
            self.promised_proposal_number = prepare.proposal_number;

            if log_enabled!(Level::Info) {
                info!(
                    "[M={}] Promising proposal {} to member {}.",
                    self.id, prepare.proposal_number, prepare.from
                );
            }

            let promise = Promise {
                proposal_number: self.promised_proposal_number,
                accepted_value: self.accepted_value.clone(),
                from: self.id,
            };
            vec![(prepare.from, Message::Promise(promise))]
        } else {
            if log_enabled!(Level::Info) {
                info!(
                    "[M={}] Rejecting prepare {} from member {}: already promised {}.",
                    self.id, prepare.proposal_number, prepare.from, self.promised_proposal_number
                );
            }

            let nack = Nack { proposal_number: self.promised_proposal_number, from: self.id };
            vec![(prepare.from, Message::Nack(nack))]
        }
    }

    /// A promise counts toward the proposer's phase 1 tally. When it reports a previously
    /// accepted value, the highest-numbered such value binds this proposer: it must be
    /// proposed in phase 2 instead of our own candidate.
    fn handle_promise(&mut self, promise: Promise) -> Vec<(usize, Message)> {
        self.promised_by.insert(promise.from);

        if let Some(value) = promise.accepted_value {
            if promise.proposal_number > self.accepted_proposal_number {
                if log_enabled!(Level::Info) {
                    info!(
                        "[M={}] Adopting value {:?} at proposal {} from member {}.",
                        self.id, value, promise.proposal_number, promise.from
                    );
                }
                self.adopt(promise.proposal_number, value);
            }
        }

        Vec::new()
    }

    /// An accept request is honored at or above the promised number. Accepting also counts as
    /// promising, so both numbers move together.
    fn handle_accept_request(&mut self, request: AcceptRequest) -> Vec<(usize, Message)> {
        if request.proposal_number >= self.promised_proposal_number {
            self.promised_proposal_number = request.proposal_number;
            self.accepted_proposal_number = request.proposal_number;
            self.accepted_value = Some(request.proposed_value.clone());

            if log_enabled!(Level::Info) {
                info!(
                    "[M={}] Accepted proposal {} with value {:?}.",
                    self.id, request.proposal_number, request.proposed_value
                );
            }

            let accepted = Accepted {
                proposal_number: request.proposal_number,
                proposed_value: request.proposed_value,
                from: self.id,
            };
            vec![(request.from, Message::Accepted(accepted))]
        } else {
            if log_enabled!(Level::Info) {
                info!(
                    "[M={}] Rejecting accept request {} from member {}: already promised {}.",
                    self.id, request.proposal_number, request.from, self.promised_proposal_number
                );
            }

            let nack = Nack { proposal_number: self.promised_proposal_number, from: self.id };
            vec![(request.from, Message::Nack(nack))]
        }
    }

    /// An acceptance counts toward the proposer's phase 2 tally. Once a majority stands behind
    /// the value, it is chosen, and this member makes sure the rest of the council hears of it.
    fn handle_accepted(&mut self, accepted: Accepted) -> Vec<(usize, Message)> {
        self.accepted_by.insert(accepted.from);

        if self.has_accept_majority() {
            self.propagate(accepted.proposal_number, accepted.proposed_value)
        } else {
            Vec::new()
        }
    }

    /// Nacks are informational. No retry and no proposal-number catch-up.
    fn handle_nack(&mut self, nack: Nack) -> Vec<(usize, Message)> {
        if log_enabled!(Level::Info) {
            info!(
                "[M={}] Member {} rejected us; it is promised up to {}.",
                self.id, nack.from, nack.proposal_number
            );
        }
        Vec::new()
    }

    /// Installs a chosen value locally and floods it to the peers that may not have accepted
    /// it yet, riding on the regular accept-request handling. Receiving a value this member
    /// already holds does nothing, which is what stops the flood from echoing forever.
    fn propagate(&mut self, proposal_number: i64, value: String) -> Vec<(usize, Message)> {
        if self.accepted_value.as_deref() == Some(value.as_str()) {
            return Vec::new();
        }

        if log_enabled!(Level::Info) {
            info!(
                "[M={}] Propagating chosen value {:?} at proposal {}.",
                self.id, value, proposal_number
            );
        }

        self.adopt(proposal_number, value.clone());

        self.peers
            .iter()
            .map(|&peer| {
                let request = AcceptRequest {
                    proposal_number,
                    proposed_value: value.clone(),
                    from: self.id,
                };
                (peer, Message::AcceptRequest(request))
            })
            .collect()
    }

    // Binds a value to this member. The promised number is raised alongside when needed so
    // that the accepted number never exceeds it.
    fn adopt(&mut self, proposal_number: i64, value: String) {
        self.accepted_proposal_number = proposal_number;
        self.accepted_value = Some(value);
        if self.promised_proposal_number < proposal_number {
            self.promised_proposal_number = proposal_number;
        }
    }

    /// Starts a new local proposal: a fresh number and fresh tallies.
    fn begin_proposal(&mut self) -> i64 {
        self.proposal_number += 1;
        self.promised_by.clear();
        self.accepted_by.clear();
        self.proposal_number
    }

    // The proposer itself counts toward both majorities.
    fn has_promise_majority(&self) -> bool {
        self.promised_by.len() + 1 >= self.majority
    }

    fn has_accept_majority(&self) -> bool {
        self.accepted_by.len() + 1 >= self.majority
    }

    fn reset(&mut self) {
        self.proposal_number = 0;
        self.promised_proposal_number = -1;
        self.accepted_proposal_number = -1;
        self.accepted_value = None;
        self.promised_by.clear();
        self.accepted_by.clear();
    }
}

/// One member of the council. Listens for messages from its peers in the background and can
/// drive an election on the calling thread.
pub struct CouncilMember {
    id: usize,
    behavior: Behavior,
    address_book: Arc<HashMap<usize, SocketAddrV4>>,
    port: u16,
    state: Arc<Mutex<PaxosState>>,
    running: Arc<AtomicBool>,
    listener: Mutex<Option<thread::JoinHandle<()>>>,
}

impl CouncilMember {
    /// Creates a member with the given id, fault profile and address book. The address book
    /// must contain every member of the council, this one included, and is the same on every
    /// member.
    pub fn new(
        id: usize,
        behavior: Behavior,
        address_book: HashMap<usize, SocketAddrV4>,
        port: u16,
    ) -> CouncilMember {
        let mut member_ids: Vec<usize> = address_book.keys().copied().collect();
        member_ids.sort_unstable();

        CouncilMember {
            id,
            behavior,
            address_book: Arc::new(address_book),
            port,
            state: Arc::new(Mutex::new(PaxosState::new(id, &member_ids))),
            running: Arc::new(AtomicBool::new(false)),
            listener: Mutex::new(None),
        }
    }

    /// Binds the member's endpoint and starts answering messages in the background. A bind
    /// failure is surfaced to the caller; nothing after that is fatal to the member.
    pub fn listen(&self) -> io::Result<()> {
        let listener = transport::bind(self.port)?;
        self.running.store(true, Ordering::SeqCst);

        let id = self.id;
        let behavior = self.behavior;
        let address_book = Arc::clone(&self.address_book);
        let state = Arc::clone(&self.state);
        let running = Arc::clone(&self.running);

        let handle = thread::spawn(move || {
            accept_loop(id, behavior, &address_book, &state, &running, listener);
        });

        *self.listener.lock().expect("listener handle lock poisoned") = Some(handle);
        Ok(())
    }

    /// Drives one election for the given candidate on the calling thread. Returns true when a
    /// majority accepted the proposal and the chosen value was flooded to the council, false
    /// when either phase timed out.
    pub fn start_election(&self, value: &str) -> bool {
        let proposal_number = self.lock_state().begin_proposal();

        if log_enabled!(Level::Info) {
            info!(
                "[M={}] Starting an election for {:?} with proposal {}.",
                self.id, value, proposal_number
            );
        }

        // Phase 1: ask every other member for a promise.
        for peer in self.peers() {
            let prepare = Prepare { proposal_number, from: self.id };
            self.send(peer, Message::Prepare(prepare));
        }

        if !self.await_majority(PaxosState::has_promise_majority) {
            warn!(
                "[M={}] Election for {:?} failed: no promise majority for proposal {} within {:?}.",
                self.id, value, proposal_number, PHASE_TIMEOUT
            );
            return false;
        }

        // Phase 2: propose our own candidate, unless a promise forced us to adopt a value an
        // acceptor had already accepted.
        let proposed_value = self
            .lock_state()
            .accepted_value
            .clone()
            .unwrap_or_else(|| value.to_string());

        for peer in self.peers() {
            let request = AcceptRequest {
                proposal_number,
                proposed_value: proposed_value.clone(),
                from: self.id,
            };
            self.send(peer, Message::AcceptRequest(request));
        }

        if !self.await_majority(PaxosState::has_accept_majority) {
            warn!(
                "[M={}] Election for {:?} failed: no accept majority for proposal {} within {:?}.",
                self.id, value, proposal_number, PHASE_TIMEOUT
            );
            return false;
        }

        if log_enabled!(Level::Info) {
            info!(
                "[M={}] {:?} was chosen by a majority at proposal {}.",
                self.id, proposed_value, proposal_number
            );
        }

        // Usually a no-op: the handler that tallied the deciding acceptance has already
        // flooded the value.
        let outbound = self.lock_state().propagate(proposal_number, proposed_value);
        for (to, message) in outbound {
            self.send(to, message);
        }

        true
    }

    /// Clears all proposer and acceptor state back to its initial values. A harness operation
    /// for reuse between unrelated elections, not part of the protocol.
    pub fn reset(&self) {
        self.lock_state().reset();
    }

    /// Stops listening and releases the endpoint. Idempotent. In-flight outbound sends are
    /// left to finish or fail on their own.
    pub fn shutdown(&self) {
        if self.running.swap(false, Ordering::SeqCst) {
            let handle = self.listener.lock().expect("listener handle lock poisoned").take();
            if let Some(handle) = handle {
                if handle.join().is_err() {
                    warn!("[M={}] Listener thread panicked.", self.id);
                }
            }
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn behavior(&self) -> Behavior {
        self.behavior
    }

    /// The value this member currently holds as accepted, if any.
    pub fn accepted_value(&self) -> Option<String> {
        self.lock_state().accepted_value.clone()
    }

    /// The highest proposal number this member has accepted, or -1.
    pub fn accepted_proposal_number(&self) -> i64 {
        self.lock_state().accepted_proposal_number
    }

    /// The highest proposal number this member has promised to, or -1.
    pub fn promised_proposal_number(&self) -> i64 {
        self.lock_state().promised_proposal_number
    }

    /// A copy of the ids that promised this member's current proposal.
    pub fn promised_by(&self) -> HashSet<usize> {
        self.lock_state().promised_by.clone()
    }

    /// A copy of the ids that accepted this member's current proposal.
    pub fn accepted_by(&self) -> HashSet<usize> {
        self.lock_state().accepted_by.clone()
    }

    fn send(&self, to: usize, message: Message) {
        send_gated(self.id, self.behavior, &self.address_book, to, message);
    }

    // Polls the tally under the lock until the majority stands or the phase times out.
    // Majorities are monotone within a proposal, so a racy read can only be behind, never
    // wrong.
    fn await_majority<F: Fn(&PaxosState) -> bool>(&self, reached: F) -> bool {
        let deadline = Instant::now() + PHASE_TIMEOUT;
        loop {
            if reached(&self.lock_state()) {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, PaxosState> {
        self.state.lock().expect("paxos state lock poisoned")
    }

    fn peers(&self) -> Vec<usize> {
        let mut peers: Vec<usize> =
            self.address_book.keys().copied().filter(|&m| m != self.id).collect();
        peers.sort_unstable();
        peers
    }
}

impl Drop for CouncilMember {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// Accepts one connection at a time, reads its single message, updates the state and pushes the
// replies through the behavior gate. Handler effects are serialized by the state mutex, which
// is released before any reply is sent.
fn accept_loop(
    id: usize,
    behavior: Behavior,
    address_book: &Arc<HashMap<usize, SocketAddrV4>>,
    state: &Arc<Mutex<PaxosState>>,
    running: &Arc<AtomicBool>,
    listener: TcpListener,
) {
    while running.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((mut stream, _)) => {
                let message = match transport::receive(&mut stream) {
                    Ok(message) => message,
                    Err(e) => {
                        warn!("[M={}] Dropping a connection with an unreadable message: {}", id, e);
                        continue;
                    }
                };

                if log_enabled!(Level::Debug) {
                    debug!("[M={}] Received {:?} from member {}.", id, message, message.sender());
                }

                let outbound = state.lock().expect("paxos state lock poisoned").handle(message);

                for (to, reply) in outbound {
                    send_gated(id, behavior, address_book, to, reply);
                }
            }
            Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_POLL_INTERVAL);
            }
            Err(e) => {
                if running.load(Ordering::SeqCst) {
                    warn!("[M={}] Listener error: {}", id, e);
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
            }
        }
    }
}

// Applies the member's fault profile to one outbound message. Each send runs on its own
// thread: the profile's delay blocks that thread and nothing else, so a slow member still
// hears and handles everything it receives, its answers are just late.
fn send_gated(
    id: usize,
    behavior: Behavior,
    address_book: &Arc<HashMap<usize, SocketAddrV4>>,
    to: usize,
    message: Message,
) {
    if behavior.drops_messages() {
        if log_enabled!(Level::Debug) {
            debug!("[M={}] Dropping outbound {:?} to member {}.", id, message, to);
        }
        return;
    }

    let address = match address_book.get(&to) {
        Some(address) => *address,
        None => {
            warn!("[M={}] Member {} is not in the address book.", id, to);
            return;
        }
    };

    let delay = behavior.send_delay();
    thread::spawn(move || {
        if delay > Duration::from_secs(0) {
            thread::sleep(delay);
        }
        if let Err(e) = transport::send(&address, &message) {
            warn!("[M={}] Could not send {:?} to member {}: {}", id, message, to, e);
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    const COUNCIL: [usize; 9] = [1, 2, 3, 4, 5, 6, 7, 8, 9];

    fn state() -> PaxosState {
        PaxosState::new(1, &COUNCIL)
    }

    fn check_invariants(state: &PaxosState) {
        if state.accepted_value.is_some() {
            assert!(state.accepted_proposal_number >= 0);
            assert!(state.accepted_proposal_number <= state.promised_proposal_number);
        }
    }

    #[test]
    fn prepare_above_the_promise_is_promised() {
        let mut state = state();

        let replies = state.handle(Message::Prepare(Prepare { proposal_number: 5, from: 2 }));

        assert_eq!(5, state.promised_proposal_number);
        assert_eq!(
            vec![(
                2,
                Message::Promise(Promise { proposal_number: 5, accepted_value: None, from: 1 })
            )],
            replies
        );
    }

    #[test]
    fn prepare_at_or_below_the_promise_is_nacked() {
        let mut state = state();
        state.handle(Message::Prepare(Prepare { proposal_number: 5, from: 2 }));

        let equal = state.handle(Message::Prepare(Prepare { proposal_number: 5, from: 3 }));
        let below = state.handle(Message::Prepare(Prepare { proposal_number: 3, from: 4 }));

        assert_eq!(vec![(3, Message::Nack(Nack { proposal_number: 5, from: 1 }))], equal);
        assert_eq!(vec![(4, Message::Nack(Nack { proposal_number: 5, from: 1 }))], below);
        assert_eq!(5, state.promised_proposal_number);
    }

    #[test]
    fn promised_number_never_decreases() {
        let mut state = state();

        for (n, expected) in [(3i64, 3i64), (5, 5), (4, 5), (5, 5), (9, 9)].iter() {
            state.handle(Message::Prepare(Prepare { proposal_number: *n, from: 2 }));
            assert_eq!(*expected, state.promised_proposal_number);
        }
    }

    #[test]
    fn promise_with_a_value_is_adopted() {
        let mut state = state();

        state.handle(Message::Promise(Promise {
            proposal_number: 3,
            accepted_value: Some("Member 4".to_string()),
            from: 4,
        }));

        assert_eq!(Some("Member 4".to_string()), state.accepted_value);
        assert_eq!(3, state.accepted_proposal_number);
        check_invariants(&state);
    }

    #[test]
    fn the_highest_numbered_prior_value_wins_adoption() {
        let mut state = state();

        state.handle(Message::Promise(Promise {
            proposal_number: 3,
            accepted_value: Some("Member 4".to_string()),
            from: 4,
        }));
        state.handle(Message::Promise(Promise {
            proposal_number: 2,
            accepted_value: Some("Member 5".to_string()),
            from: 5,
        }));

        assert_eq!(Some("Member 4".to_string()), state.accepted_value);
        assert_eq!(3, state.accepted_proposal_number);
        assert!(state.promised_by.contains(&4) && state.promised_by.contains(&5));
    }

    #[test]
    fn promise_without_a_value_only_tallies() {
        let mut state = state();

        let replies = state.handle(Message::Promise(Promise {
            proposal_number: 1,
            accepted_value: None,
            from: 2,
        }));

        assert!(replies.is_empty());
        assert!(state.promised_by.contains(&2));
        assert_eq!(None, state.accepted_value);
        assert_eq!(-1, state.accepted_proposal_number);
    }

    #[test]
    fn accept_request_at_or_above_the_promise_is_accepted() {
        let mut state = state();
        state.handle(Message::Prepare(Prepare { proposal_number: 4, from: 2 }));

        let replies = state.handle(Message::AcceptRequest(AcceptRequest {
            proposal_number: 4,
            proposed_value: "Member 2".to_string(),
            from: 2,
        }));

        assert_eq!(
            vec![(
                2,
                Message::Accepted(Accepted {
                    proposal_number: 4,
                    proposed_value: "Member 2".to_string(),
                    from: 1,
                })
            )],
            replies
        );
        assert_eq!(4, state.accepted_proposal_number);
        assert_eq!(Some("Member 2".to_string()), state.accepted_value);
        check_invariants(&state);
    }

    #[test]
    fn accept_request_below_the_promise_is_nacked() {
        let mut state = state();
        state.handle(Message::Prepare(Prepare { proposal_number: 7, from: 2 }));

        let replies = state.handle(Message::AcceptRequest(AcceptRequest {
            proposal_number: 4,
            proposed_value: "Member 3".to_string(),
            from: 3,
        }));

        assert_eq!(vec![(3, Message::Nack(Nack { proposal_number: 7, from: 1 }))], replies);
        assert_eq!(None, state.accepted_value);
        assert_eq!(-1, state.accepted_proposal_number);
    }

    #[test]
    fn an_acceptance_majority_floods_the_chosen_value() {
        let mut state = state();

        for from in [2usize, 3, 4].iter() {
            let replies = state.handle(Message::Accepted(Accepted {
                proposal_number: 1,
                proposed_value: "Member 1".to_string(),
                from: *from,
            }));
            assert!(replies.is_empty());
        }

        // The fourth acceptance makes five with the proposer itself: a strict majority of 9.
        let replies = state.handle(Message::Accepted(Accepted {
            proposal_number: 1,
            proposed_value: "Member 1".to_string(),
            from: 5,
        }));

        assert_eq!(8, replies.len());
        for (to, message) in &replies {
            assert_ne!(1, *to);
            assert_eq!(
                &Message::AcceptRequest(AcceptRequest {
                    proposal_number: 1,
                    proposed_value: "Member 1".to_string(),
                    from: 1,
                }),
                message
            );
        }
        assert_eq!(Some("Member 1".to_string()), state.accepted_value);
        check_invariants(&state);
    }

    #[test]
    fn propagation_of_an_already_held_value_is_idempotent() {
        let mut state = state();

        for from in [2usize, 3, 4, 5].iter() {
            state.handle(Message::Accepted(Accepted {
                proposal_number: 1,
                proposed_value: "Member 1".to_string(),
                from: *from,
            }));
        }

        // Still a majority, but the value is already ours: no re-flood.
        let replies = state.handle(Message::Accepted(Accepted {
            proposal_number: 1,
            proposed_value: "Member 1".to_string(),
            from: 6,
        }));

        assert!(replies.is_empty());
    }

    #[test]
    fn re_receiving_the_accepted_value_does_not_rebroadcast() {
        let mut state = state();
        state.handle(Message::AcceptRequest(AcceptRequest {
            proposal_number: 2,
            proposed_value: "Member 2".to_string(),
            from: 2,
        }));

        let replies = state.handle(Message::AcceptRequest(AcceptRequest {
            proposal_number: 2,
            proposed_value: "Member 2".to_string(),
            from: 2,
        }));

        // Exactly the one confirmation back to the sender, nothing flooded.
        assert_eq!(1, replies.len());
        assert_eq!(2, replies[0].0);
    }

    #[test]
    fn a_nack_changes_nothing() {
        let mut state = state();
        state.handle(Message::Prepare(Prepare { proposal_number: 2, from: 3 }));

        let replies = state.handle(Message::Nack(Nack { proposal_number: 9, from: 3 }));

        assert!(replies.is_empty());
        assert_eq!(2, state.promised_proposal_number);
        assert_eq!(-1, state.accepted_proposal_number);
        assert_eq!(0, state.proposal_number);
    }

    #[test]
    fn beginning_a_proposal_bumps_the_counter_and_clears_the_tallies() {
        let mut state = state();
        state.promised_by.insert(2);
        state.accepted_by.insert(3);

        assert_eq!(1, state.begin_proposal());
        assert!(state.promised_by.is_empty());
        assert!(state.accepted_by.is_empty());
        assert_eq!(2, state.begin_proposal());
    }

    #[test]
    fn majorities_count_the_proposer_itself() {
        let mut state = state();
        for from in 2..5 {
            state.handle(Message::Promise(Promise {
                proposal_number: 1,
                accepted_value: None,
                from,
            }));
        }
        // Three promises plus the proposer is four of nine: not a majority.
        assert!(!state.has_promise_majority());

        state.handle(Message::Promise(Promise { proposal_number: 1, accepted_value: None, from: 5 }));
        assert!(state.has_promise_majority());
    }

    #[test]
    fn reset_restores_the_initial_state() {
        let mut state = state();
        state.begin_proposal();
        state.handle(Message::Prepare(Prepare { proposal_number: 3, from: 2 }));
        state.handle(Message::AcceptRequest(AcceptRequest {
            proposal_number: 3,
            proposed_value: "Member 2".to_string(),
            from: 2,
        }));

        state.reset();

        assert_eq!(0, state.proposal_number);
        assert_eq!(-1, state.promised_proposal_number);
        assert_eq!(-1, state.accepted_proposal_number);
        assert_eq!(None, state.accepted_value);
        assert!(state.promised_by.is_empty());
        assert!(state.accepted_by.is_empty());
    }
}
