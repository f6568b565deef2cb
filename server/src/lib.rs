//! # Authoritative movement server
//!
//! This crate runs the definitive simulation of every connected character.
//! Clients predict locally, but what this server computes is what everyone
//! eventually sees: each broadcast snapshot overwrites client guesses, and
//! the acknowledgment cursor in it tells each client which of its inputs are
//! already accounted for.
//!
//! ## Tick model
//!
//! The simulation advances on a fixed interval. Each tick, every player
//! consumes at most one input from their bounded queue; a player with an
//! empty queue is advanced with their previous input, so late packets cause
//! a small correction later rather than a visible freeze now. Snapshot
//! broadcasting runs on its own, slower interval.
//!
//! ## Concurrency
//!
//! All game state is owned by the main loop task. The receiver, sender and
//! timeout tasks only decode, encode, and sweep; they communicate with the
//! main loop over channels, so incoming packets are applied strictly between
//! ticks and never mutate the simulation mid-step.
//!
//! ## Modules
//!
//! - [`input_queue`]: bounded FIFO of unprocessed inputs, one per player.
//! - [`session`]: connection lifecycle, liveness, per-player input state.
//! - [`authority`]: the fixed-tick simulation and snapshot assembly.
//! - [`network`]: UDP socket plumbing and the main event loop.

pub mod authority;
pub mod input_queue;
pub mod network;
pub mod session;
