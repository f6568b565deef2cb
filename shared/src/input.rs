//! Tick-stamped input units and the per-character sequencer producing them.
//!
//! A [`TickInput`] is immutable once built: both sides of the connection keep
//! them around (the client for replay, the server for reuse when a packet is
//! late), so derived variants are produced with the `with_*` builders instead
//! of mutation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// A float field was NaN or infinite. The whole input is rejected, never
    /// a single field.
    #[error("input {sequence} rejected: non-finite {field}")]
    NonFinite { sequence: u64, field: &'static str },
}

/// One relative mouse movement, in raw counts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MouseDelta {
    #[serde(default)]
    pub dx: f32,
    #[serde(default)]
    pub dy: f32,
}

/// Everything a character needs to advance one simulation tick.
///
/// All fields decode to `0`/`false`/empty when absent so old peers can talk
/// to new ones.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TickInput {
    #[serde(default)]
    pub sequence: u64,
    #[serde(default)]
    pub tick: u64,
    /// Wall-clock send time in milliseconds, for ping measurement only.
    #[serde(default)]
    pub timestamp: u64,
    /// Sideways axis in [-1, 1], positive right.
    #[serde(default)]
    pub strafe: f32,
    /// Forward axis in [-1, 1].
    #[serde(default)]
    pub forward: f32,
    /// Mouse movements accumulated since the previous tick, in order.
    #[serde(default)]
    pub mouse: Vec<MouseDelta>,
    /// True when a jump is armed for this tick.
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub auto_jump: bool,
}

impl TickInput {
    /// Builds a movement input. Axis values outside [-1, 1] are clamped here
    /// rather than rejected; only non-finite values are treated as malformed.
    pub fn new(strafe: f32, forward: f32) -> Self {
        Self {
            strafe: strafe.clamp(-1.0, 1.0),
            forward: forward.clamp(-1.0, 1.0),
            ..Self::default()
        }
    }

    pub fn with_sequence(self, sequence: u64) -> Self {
        Self { sequence, ..self }
    }

    pub fn with_tick(self, tick: u64) -> Self {
        Self { tick, ..self }
    }

    pub fn with_timestamp(self, timestamp: u64) -> Self {
        Self { timestamp, ..self }
    }

    pub fn with_mouse(self, mouse: Vec<MouseDelta>) -> Self {
        Self { mouse, ..self }
    }

    pub fn with_jump(self, jump: bool, auto_jump: bool) -> Self {
        Self {
            jump,
            auto_jump,
            ..self
        }
    }

    /// Checks every float field for NaN/Inf. A failure rejects the whole
    /// input; callers keep their previous state and log.
    pub fn validate(&self) -> Result<(), InputError> {
        if !self.strafe.is_finite() {
            return Err(InputError::NonFinite {
                sequence: self.sequence,
                field: "strafe",
            });
        }
        if !self.forward.is_finite() {
            return Err(InputError::NonFinite {
                sequence: self.sequence,
                field: "forward",
            });
        }
        for delta in &self.mouse {
            if !delta.dx.is_finite() || !delta.dy.is_finite() {
                return Err(InputError::NonFinite {
                    sequence: self.sequence,
                    field: "mouse",
                });
            }
        }
        Ok(())
    }

    /// Total accumulated mouse movement for this tick.
    pub fn mouse_total(&self) -> (f32, f32) {
        self.mouse
            .iter()
            .fold((0.0, 0.0), |(dx, dy), d| (dx + d.dx, dy + d.dy))
    }
}

/// Raw control values as sampled from whatever drives the character this
/// frame, before sequencing.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameSample {
    pub strafe: f32,
    pub forward: f32,
    pub jump_held: bool,
}

/// Samples controls once per tick and stamps them with a strictly increasing
/// sequence id, starting at 1.
///
/// Mouse deltas are only accumulated while the session holds input focus;
/// losing focus discards whatever was pending, so a character never turns
/// from movement the player made in another window.
#[derive(Debug)]
pub struct InputSequencer {
    next_sequence: u64,
    auto_jump: bool,
    jump_armed: bool,
    prev_jump_held: bool,
    pending_mouse: Vec<MouseDelta>,
    focused: bool,
}

impl InputSequencer {
    pub fn new(auto_jump: bool) -> Self {
        Self {
            next_sequence: 1,
            auto_jump,
            jump_armed: false,
            prev_jump_held: false,
            pending_mouse: Vec::new(),
            focused: true,
        }
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    pub fn set_focus(&mut self, focused: bool) {
        if !focused {
            self.pending_mouse.clear();
        }
        self.focused = focused;
    }

    pub fn accumulate_mouse(&mut self, dx: f32, dy: f32) {
        if self.focused {
            self.pending_mouse.push(MouseDelta { dx, dy });
        }
    }

    /// Produces the input for one tick, draining pending mouse deltas and
    /// resolving jump intent.
    ///
    /// Tap mode toggles an armed flag on the key-down edge; the flag stays
    /// armed through the air (a jump can be buffered before landing) and
    /// clears on the grounded tick that launches it. Auto mode is simply
    /// "held and grounded", which re-jumps every landing.
    pub fn sample(
        &mut self,
        frame: &FrameSample,
        grounded: bool,
        tick: u64,
        timestamp: u64,
    ) -> TickInput {
        let jump = if self.auto_jump {
            frame.jump_held && grounded
        } else {
            if frame.jump_held && !self.prev_jump_held {
                self.jump_armed = !self.jump_armed;
            }
            let jump = self.jump_armed;
            if jump && grounded {
                self.jump_armed = false;
            }
            jump
        };
        self.prev_jump_held = frame.jump_held;

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        TickInput::new(frame.strafe, frame.forward)
            .with_sequence(sequence)
            .with_tick(tick)
            .with_timestamp(timestamp)
            .with_mouse(std::mem::take(&mut self.pending_mouse))
            .with_jump(jump, self.auto_jump)
    }
}
