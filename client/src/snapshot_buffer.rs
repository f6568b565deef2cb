//! Interpolation buffer for remote characters.
//!
//! Remote players only update when a snapshot arrives, typically at a far
//! lower rate than the render loop. The buffer renders them a fixed delay in
//! the past, so there is usually a snapshot on either side of the render
//! time to interpolate between. Degraded cases (startup, packet loss) hold
//! the last known state, or optionally extrapolate ahead of it.

use log::debug;
use shared::MovementState;
use std::collections::VecDeque;

/// How far in the past remote characters are rendered, in milliseconds.
/// Chosen to cover a couple of broadcast intervals at the default 20 Hz.
pub const DEFAULT_INTERPOLATION_DELAY_MS: u64 = 100;

/// Snapshots retained beyond what bracketing needs; keeps a little history
/// for the extrapolation fallback without growing unbounded.
const MAX_RETAINED: usize = 32;

/// Lower clamp for the interpolation factor, so a near-zero interval between
/// snapshots cannot produce a division blow-up.
const FACTOR_EPSILON: f32 = 1e-4;

/// Furthest the extrapolation fallback will project past the newest
/// snapshot, as a fraction of the last known interval.
const MAX_EXTRAPOLATION: f32 = 0.5;

pub struct SnapshotBuffer {
    snapshots: VecDeque<(u64, MovementState)>,
    interpolation_delay_ms: u64,
    /// Extrapolation is off by default: projecting a character along stale
    /// velocity guesses wrong at every direction change, and holding the
    /// last state degrades more gracefully.
    extrapolate: bool,
}

impl Default for SnapshotBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_INTERPOLATION_DELAY_MS, false)
    }
}

impl SnapshotBuffer {
    pub fn new(interpolation_delay_ms: u64, extrapolate: bool) -> Self {
        Self {
            snapshots: VecDeque::new(),
            interpolation_delay_ms,
            extrapolate,
        }
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn latest_timestamp(&self) -> Option<u64> {
        self.snapshots.back().map(|(ts, _)| *ts)
    }

    /// Retains the state only if it is strictly newer than everything held.
    /// Stale and duplicate arrivals are expected under lossy transport and
    /// dropped without fuss. Returns whether the state was kept.
    pub fn push(&mut self, timestamp: u64, state: MovementState) -> bool {
        if let Some(newest) = self.latest_timestamp() {
            if timestamp <= newest {
                debug!(
                    "dropping stale snapshot at {} (newest {})",
                    timestamp, newest
                );
                return false;
            }
        }

        self.snapshots.push_back((timestamp, state));
        while self.snapshots.len() > MAX_RETAINED {
            self.snapshots.pop_front();
        }
        true
    }

    /// Produces a render state for wall-clock `now_ms`, or `None` while the
    /// buffer has never seen a snapshot. Never fails once it has one: the
    /// degraded paths fall back to the newest known state.
    pub fn sample(&mut self, now_ms: u64) -> Option<MovementState> {
        let render_time = now_ms.saturating_sub(self.interpolation_delay_ms);

        // Drop snapshots that can no longer bracket the render time. The
        // last two always stay: one as the hold-last state, both for the
        // extrapolation fallback.
        while self.snapshots.len() > 2 && self.snapshots[1].0 <= render_time {
            self.snapshots.pop_front();
        }

        let (t0, s0) = *self.snapshots.front()?;
        if render_time <= t0 {
            // Render time is at or before the oldest retained snapshot.
            return Some(s0);
        }

        match self.snapshots.get(1) {
            Some(&(t1, s1)) if t1 > render_time => {
                let factor = ((render_time - t0) as f32 / (t1 - t0) as f32)
                    .clamp(FACTOR_EPSILON, 1.0);
                Some(s0.interpolate(&s1, factor))
            }
            _ => {
                // No snapshot on the future side of the render time yet.
                if self.extrapolate {
                    self.extrapolated(render_time)
                } else {
                    self.snapshots.back().map(|(_, state)| *state)
                }
            }
        }
    }

    // Projects past the newest snapshot using the last two, capped so the
    // guess cannot run far ahead of reality.
    fn extrapolated(&self, render_time: u64) -> Option<MovementState> {
        let count = self.snapshots.len();
        if count < 2 {
            return self.snapshots.back().map(|(_, state)| *state);
        }

        let (t_prev, s_prev) = self.snapshots[count - 2];
        let (t_last, s_last) = self.snapshots[count - 1];
        if t_last <= t_prev {
            return Some(s_last);
        }

        let interval = (t_last - t_prev) as f32;
        let overshoot = ((render_time.saturating_sub(t_last)) as f32 / interval)
            .min(MAX_EXTRAPOLATION);
        Some(s_prev.interpolate(&s_last, 1.0 + overshoot))
    }
}
