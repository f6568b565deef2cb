//! The authoritative fixed-tick simulation.
//!
//! Each tick, every player advances by exactly one input through the shared
//! movement simulator. The resulting states are owned here and leave only as
//! copies inside broadcast snapshots; nothing outside this module mutates
//! them.

use crate::session::SessionRegistry;
use log::{debug, info};
use shared::{BoxWorld, MovementConfig, MovementSimulator, MovementState, Snapshot};
use std::collections::HashMap;

pub struct AuthorityLoop {
    simulator: MovementSimulator<BoxWorld>,
    states: HashMap<u32, MovementState>,
    tick_dt: f32,
    pub tick: u64,
}

impl AuthorityLoop {
    pub fn new(config: MovementConfig, tick_dt: f32) -> Self {
        Self {
            simulator: MovementSimulator::new(BoxWorld::arena(), config),
            states: HashMap::new(),
            tick_dt,
            tick: 0,
        }
    }

    pub fn tick_dt(&self) -> f32 {
        self.tick_dt
    }

    pub fn add_player(&mut self, id: u32) {
        let spawn = self.simulator.world().spawn_point(id);
        info!("spawning player {} at {}", id, spawn);
        self.states.insert(id, MovementState::spawn(spawn));
    }

    pub fn remove_player(&mut self, id: u32) {
        self.states.remove(&id);
    }

    pub fn state_of(&self, id: u32) -> Option<&MovementState> {
        self.states.get(&id)
    }

    /// Advances the whole world one fixed tick: one input per player, with
    /// the previous input reused when the player's queue is empty.
    pub fn advance(&mut self, sessions: &mut SessionRegistry) {
        self.tick += 1;

        for session in sessions.sessions_mut() {
            let Some(state) = self.states.get(&session.id) else {
                continue;
            };

            let input = session.next_input();
            let next = self.simulator.step(state, &input, self.tick_dt);
            self.states.insert(session.id, next);

            if input.sequence > session.last_processed {
                session.last_processed = input.sequence;
            }
        }

        if self.tick % 640 == 0 {
            debug!("tick {}: {} players simulated", self.tick, self.states.len());
        }
    }

    /// Assembles the broadcast snapshot: every player's state plus the
    /// acknowledgment cursor each client needs for reconciliation.
    pub fn snapshot(&self, sessions: &SessionRegistry, timestamp: u64) -> Snapshot {
        Snapshot {
            tick: self.tick,
            timestamp,
            last_processed_input: sessions.acks(),
            players: self.states.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::TickInput;
    use std::net::SocketAddr;

    fn addr(port: u16) -> SocketAddr {
        format!("127.0.0.1:{}", port).parse().unwrap()
    }

    fn setup() -> (AuthorityLoop, SessionRegistry, u32) {
        let mut authority = AuthorityLoop::new(MovementConfig::default(), 1.0 / 64.0);
        let mut sessions = SessionRegistry::new(8, 32);
        let id = sessions.add(addr(9000)).unwrap();
        authority.add_player(id);
        (authority, sessions, id)
    }

    #[test]
    fn test_advance_consumes_one_input_per_tick() {
        let (mut authority, mut sessions, id) = setup();
        for seq in 1..=3u64 {
            sessions.queue_input(id, TickInput::new(0.0, 1.0).with_sequence(seq));
        }

        authority.advance(&mut sessions);
        assert_eq!(sessions.acks()[&id], 1);
        authority.advance(&mut sessions);
        assert_eq!(sessions.acks()[&id], 2);
        authority.advance(&mut sessions);
        assert_eq!(sessions.acks()[&id], 3);
    }

    #[test]
    fn test_stale_input_keeps_character_moving() {
        let (mut authority, mut sessions, id) = setup();

        // Settle onto the floor first.
        for _ in 0..40 {
            authority.advance(&mut sessions);
        }
        let rest = authority.state_of(id).unwrap().transform.origin;

        sessions.queue_input(id, TickInput::new(0.0, 1.0).with_sequence(1));
        authority.advance(&mut sessions);

        // No further packets: the last input is reused and the character
        // keeps accelerating instead of freezing in place.
        for _ in 0..20 {
            authority.advance(&mut sessions);
        }
        let moved = authority.state_of(id).unwrap().transform.origin;
        assert!((moved - rest).length() > 0.1);
        // The ack does not advance past the only real input.
        assert_eq!(sessions.acks()[&id], 1);
    }

    #[test]
    fn test_snapshot_carries_states_and_acks() {
        let (mut authority, mut sessions, id) = setup();
        sessions.queue_input(id, TickInput::new(1.0, 0.0).with_sequence(9));
        authority.advance(&mut sessions);

        let snapshot = authority.snapshot(&sessions, 12_345);
        assert_eq!(snapshot.tick, 1);
        assert_eq!(snapshot.timestamp, 12_345);
        assert_eq!(snapshot.acked_for(id), Some(9));
        assert!(snapshot.players.contains_key(&id));
    }

    #[test]
    fn test_removed_player_leaves_snapshot() {
        let (mut authority, mut sessions, id) = setup();
        authority.advance(&mut sessions);

        sessions.remove(id);
        authority.remove_player(id);
        authority.advance(&mut sessions);

        let snapshot = authority.snapshot(&sessions, 0);
        assert!(snapshot.players.is_empty());
    }

    #[test]
    fn test_players_spawn_at_distinct_points() {
        let mut authority = AuthorityLoop::new(MovementConfig::default(), 1.0 / 64.0);
        authority.add_player(1);
        authority.add_player(2);
        let a = authority.state_of(1).unwrap().transform.origin;
        let b = authority.state_of(2).unwrap().transform.origin;
        assert_ne!(a, b);
    }
}
