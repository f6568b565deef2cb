//! Player session registry: connection lifecycle and per-player input state.
//!
//! One [`PlayerSession`] exists per connected player, holding the network
//! address, liveness bookkeeping, the bounded input queue, and the
//! acknowledgment cursor the authority loop feeds back into snapshots.

use crate::input_queue::InputQueue;
use log::{info, warn};
use shared::TickInput;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Disconnect a player after this long without any packet.
const SESSION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug)]
pub struct PlayerSession {
    pub id: u32,
    pub addr: SocketAddr,
    pub last_seen: Instant,
    /// Inputs received and not yet simulated.
    pub queue: InputQueue,
    /// The input applied on the most recent tick; reused when the queue runs
    /// dry so the character keeps moving through packet gaps instead of
    /// freezing.
    pub last_applied: TickInput,
    /// Highest input sequence the simulation has consumed, echoed to the
    /// client for reconciliation.
    pub last_processed: u64,
}

impl PlayerSession {
    fn new(id: u32, addr: SocketAddr, queue_capacity: usize) -> Self {
        Self {
            id,
            addr,
            last_seen: Instant::now(),
            queue: InputQueue::with_capacity(queue_capacity),
            last_applied: TickInput::default(),
            last_processed: 0,
        }
    }

    pub fn is_timed_out(&self, timeout: Duration) -> bool {
        self.last_seen.elapsed() > timeout
    }

    /// Picks the input to simulate this tick: the oldest pending one, or the
    /// previous tick's input when nothing arrived in time.
    pub fn next_input(&mut self) -> TickInput {
        if let Some(input) = self.queue.dequeue() {
            self.last_applied = input;
        }
        self.last_applied.clone()
    }
}

/// All connected players, keyed by server-assigned id.
pub struct SessionRegistry {
    sessions: HashMap<u32, PlayerSession>,
    next_id: u32,
    max_players: usize,
    queue_capacity: usize,
}

impl SessionRegistry {
    pub fn new(max_players: usize, queue_capacity: usize) -> Self {
        Self {
            sessions: HashMap::new(),
            next_id: 1,
            max_players,
            queue_capacity,
        }
    }

    /// Admits a new player, or `None` when the server is full. Ids start at
    /// 1 and are never reused within a server run.
    pub fn add(&mut self, addr: SocketAddr) -> Option<u32> {
        if self.sessions.len() >= self.max_players {
            return None;
        }

        let id = self.next_id;
        self.next_id += 1;
        info!("player {} connected from {}", id, addr);
        self.sessions.insert(id, PlayerSession::new(id, addr, self.queue_capacity));
        Some(id)
    }

    pub fn remove(&mut self, id: u32) -> bool {
        if self.sessions.remove(&id).is_some() {
            info!("player {} disconnected", id);
            true
        } else {
            false
        }
    }

    pub fn find_by_addr(&self, addr: SocketAddr) -> Option<u32> {
        self.sessions
            .iter()
            .find(|(_, session)| session.addr == addr)
            .map(|(id, _)| *id)
    }

    /// Validates and buffers a received input, refreshing liveness. Malformed
    /// inputs are rejected whole; stale ones are dropped by the queue.
    pub fn queue_input(&mut self, id: u32, input: TickInput) -> bool {
        let Some(session) = self.sessions.get_mut(&id) else {
            return false;
        };
        session.last_seen = Instant::now();

        if let Err(e) = input.validate() {
            warn!("player {}: {}", id, e);
            return false;
        }
        session.queue.enqueue(input)
    }

    pub fn touch(&mut self, id: u32) {
        if let Some(session) = self.sessions.get_mut(&id) {
            session.last_seen = Instant::now();
        }
    }

    /// Removes and returns every session past the liveness timeout.
    pub fn check_timeouts(&mut self) -> Vec<u32> {
        let timed_out: Vec<u32> = self
            .sessions
            .values()
            .filter(|session| session.is_timed_out(SESSION_TIMEOUT))
            .map(|session| session.id)
            .collect();

        for id in &timed_out {
            self.remove(*id);
        }
        timed_out
    }

    pub fn addrs(&self) -> Vec<(u32, SocketAddr)> {
        self.sessions
            .iter()
            .map(|(id, session)| (*id, session.addr))
            .collect()
    }

    /// Last processed input sequence per player, for snapshot assembly.
    pub fn acks(&self) -> HashMap<u32, u64> {
        self.sessions
            .iter()
            .map(|(id, session)| (*id, session.last_processed))
            .collect()
    }

    pub fn sessions_mut(&mut self) -> impl Iterator<Item = &mut PlayerSession> {
        self.sessions.values_mut()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
