//! Bounded per-player buffer of inputs awaiting simulation.

use log::{debug, error};
use shared::TickInput;
use std::collections::VecDeque;

/// Default number of unprocessed inputs kept per player. At 64 ticks per
/// second this is half a second of backlog.
pub const DEFAULT_CAPACITY: usize = 32;

/// FIFO of raw received inputs, one per connected player.
///
/// The transport may deliver inputs duplicated or out of order; anything not
/// strictly newer than the newest accepted sequence is dropped silently, so
/// the queue contents are always in increasing sequence order. When the queue
/// is full the oldest entry is evicted: under sustained loss it is better to
/// simulate the player's most recent intent than to replay half a second of
/// stale movement first.
#[derive(Debug)]
pub struct InputQueue {
    pending: VecDeque<TickInput>,
    capacity: usize,
    last_accepted: u64,
}

impl Default for InputQueue {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }
}

impl InputQueue {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
            last_accepted: 0,
        }
    }

    /// Appends an input. Returns false when the input was dropped as stale
    /// or duplicate.
    pub fn enqueue(&mut self, input: TickInput) -> bool {
        if input.sequence <= self.last_accepted {
            debug!(
                "dropping stale input {} (newest accepted {})",
                input.sequence, self.last_accepted
            );
            return false;
        }

        if self.pending.len() >= self.capacity {
            if let Some(evicted) = self.pending.pop_front() {
                error!(
                    "input queue full, evicting oldest pending input {}",
                    evicted.sequence
                );
            }
        }

        self.last_accepted = input.sequence;
        self.pending.push_back(input);
        true
    }

    /// Pops the oldest pending input, or `None` when the player has nothing
    /// buffered this tick.
    pub fn dequeue(&mut self) -> Option<TickInput> {
        self.pending.pop_front()
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
