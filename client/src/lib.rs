//! # Predictive movement client
//!
//! The client's job is to make a laggy connection feel like none: local
//! inputs take effect the same tick they happen, and the authoritative
//! truth arriving later is folded in without visible snapping.
//!
//! ## How the pieces fit
//!
//! Each fixed tick, the shared input sequencer stamps a fresh input, the
//! [`prediction`] controller runs it through the same movement simulator the
//! server uses, and the input goes out on the wire. When a server snapshot
//! arrives, the controller adopts the authoritative state for the local
//! player and replays every input the server has not yet seen, so the
//! displayed state is always "server truth plus unacknowledged intent".
//!
//! Remote players cannot be predicted (their inputs are unknown here), so
//! they render from [`snapshot_buffer`] instead: a short history of
//! authoritative states sampled a fixed delay in the past and interpolated
//! between bracketing snapshots.
//!
//! ## Modules
//!
//! - [`prediction`]: local-player prediction, input history, reconciliation.
//! - [`snapshot_buffer`]: interpolation buffer for remote characters.
//! - [`network`]: UDP loop tying sequencer, predictor and buffers together.

pub mod network;
pub mod prediction;
pub mod snapshot_buffer;
