//! Client-side prediction and server reconciliation for the local player.
//!
//! Local inputs are applied to the movement simulator immediately, so the
//! character responds the same frame the key goes down. Every applied input
//! is also kept in an ordered history until the server acknowledges it; when
//! an authoritative state arrives, the controller adopts it and replays the
//! still-unacknowledged tail on top, deterministically reconstructing the
//! predicted present from the server's past. Rendered state therefore always
//! converges to the authority within one round trip.

use log::{debug, warn};
use shared::{BoxWorld, MovementConfig, MovementSimulator, MovementState, TickInput};
use std::collections::VecDeque;

/// An applied-but-unacknowledged input. Created when the predictor runs it,
/// pruned once the server acknowledges an equal-or-greater sequence.
#[derive(Debug, Clone)]
pub struct InputHistoryEntry {
    pub sequence: u64,
    pub input: TickInput,
}

pub struct PredictionController {
    simulator: MovementSimulator<BoxWorld>,
    state: MovementState,
    history: VecDeque<InputHistoryEntry>,
    /// Fixed dt used for replay: the server's tick interval, not whatever
    /// wall-clock time the frames happened to take.
    replay_dt: f32,
    /// Highest sequence this controller has ever applied. An ack at or past
    /// the next unissued sequence is a protocol anomaly.
    highest_sequence: u64,
}

impl PredictionController {
    pub fn new(config: MovementConfig, spawn: MovementState, replay_dt: f32) -> Self {
        Self {
            simulator: MovementSimulator::new(BoxWorld::arena(), config),
            state: spawn,
            history: VecDeque::new(),
            replay_dt,
            highest_sequence: 0,
        }
    }

    /// The currently displayed state.
    pub fn state(&self) -> &MovementState {
        &self.state
    }

    pub fn grounded(&self) -> bool {
        self.state.on_floor
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn history_sequences(&self) -> Vec<u64> {
        self.history.iter().map(|e| e.sequence).collect()
    }

    /// Applies a local input immediately and records it for possible replay.
    /// Returns the new predicted state.
    pub fn predict(&mut self, input: TickInput) -> MovementState {
        self.state = self.simulator.step(&self.state, &input, self.replay_dt);
        self.highest_sequence = self.highest_sequence.max(input.sequence);
        self.history.push_back(InputHistoryEntry {
            sequence: input.sequence,
            input,
        });
        self.state
    }

    /// Adopts an authoritative state acknowledging everything up to `ack`,
    /// then replays the remaining history in order.
    ///
    /// An ack for a sequence that was never issued means the server and
    /// client disagree about who sent what; that snapshot is skipped rather
    /// than trusted.
    pub fn reconcile(&mut self, authoritative: MovementState, ack: u64) {
        if ack > self.highest_sequence {
            warn!(
                "protocol anomaly: server acked input {} but only {} were sent; skipping reconciliation",
                ack, self.highest_sequence
            );
            return;
        }

        self.state = authoritative;
        while matches!(self.history.front(), Some(entry) if entry.sequence <= ack) {
            self.history.pop_front();
        }

        debug!(
            "reconciling from ack {}: replaying {} inputs",
            ack,
            self.history.len()
        );
        for entry in &self.history {
            self.state = self.simulator.step(&self.state, &entry.input, self.replay_dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    const DT: f32 = 1.0 / 64.0;

    fn controller() -> PredictionController {
        let spawn = MovementState::spawn(Vec3::new(0.0, 0.01, 0.0));
        PredictionController::new(MovementConfig::default(), spawn, DT)
    }

    fn input(sequence: u64, forward: f32) -> TickInput {
        TickInput::new(0.0, forward).with_sequence(sequence)
    }

    #[test]
    fn test_predict_advances_state_and_grows_history() {
        let mut controller = controller();
        let start = controller.state().transform.origin;

        for seq in 1..=10 {
            controller.predict(input(seq, 1.0));
        }

        assert_eq!(controller.history_len(), 10);
        assert_ne!(controller.state().transform.origin, start);
    }

    #[test]
    fn test_reconcile_prunes_acknowledged_history() {
        let mut controller = controller();
        for seq in 3..=8 {
            controller.predict(input(seq, 1.0));
        }

        let baseline = *controller.state();
        controller.reconcile(baseline, 5);

        // Exactly 6, 7, 8 remain, in that order.
        assert_eq!(controller.history_sequences(), vec![6, 7, 8]);
    }

    #[test]
    fn test_reconcile_replays_to_servers_future() {
        let mut controller = controller();

        // The server runs the same simulator over the same inputs.
        let server_sim =
            MovementSimulator::new(BoxWorld::arena(), MovementConfig::default());
        let mut server_state = MovementState::spawn(Vec3::new(0.0, 0.01, 0.0));

        let inputs: Vec<TickInput> = (1..=20)
            .map(|seq| {
                TickInput::new(if seq % 4 == 0 { 1.0 } else { 0.0 }, 1.0)
                    .with_sequence(seq)
                    .with_jump(seq == 10, false)
            })
            .collect();

        for input in &inputs {
            controller.predict(input.clone());
        }

        // Server has processed the first 12 when its snapshot arrives.
        for input in &inputs[..12] {
            server_state = server_sim.step(&server_state, input, DT);
        }
        controller.reconcile(server_state, 12);

        // Replaying 13..=20 on the server state must land exactly where the
        // server will once it processes them.
        for input in &inputs[12..] {
            server_state = server_sim.step(&server_state, input, DT);
        }
        assert_eq!(*controller.state(), server_state);
    }

    #[test]
    fn test_reconcile_with_ack_beyond_sent_is_skipped() {
        let mut controller = controller();
        for seq in 1..=5 {
            controller.predict(input(seq, 1.0));
        }
        let predicted = *controller.state();

        let mut bogus = predicted;
        bogus.transform.origin += Vec3::new(100.0, 0.0, 0.0);
        controller.reconcile(bogus, 50);

        // Anomalous snapshot ignored entirely.
        assert_eq!(*controller.state(), predicted);
        assert_eq!(controller.history_len(), 5);
    }

    #[test]
    fn test_reconcile_ack_of_everything_empties_history() {
        let mut controller = controller();
        for seq in 1..=4 {
            controller.predict(input(seq, 1.0));
        }

        let authoritative = MovementState::spawn(Vec3::new(5.0, 0.01, 5.0));
        controller.reconcile(authoritative, 4);

        assert_eq!(controller.history_len(), 0);
        assert_eq!(controller.state().transform.origin.x, 5.0);
    }

    #[test]
    fn test_duplicate_ack_is_idempotent() {
        let mut controller = controller();
        for seq in 1..=6 {
            controller.predict(input(seq, 1.0));
        }

        let baseline = *controller.state();
        controller.reconcile(baseline, 3);
        let after_first = *controller.state();
        let history_first = controller.history_sequences();

        controller.reconcile(baseline, 3);
        assert_eq!(*controller.state(), after_first);
        assert_eq!(controller.history_sequences(), history_first);
    }
}
