//! Deterministic movement and protocol core shared by the server and client.
//!
//! Everything that must behave identically on both ends of the connection
//! lives in this crate: the movement simulator and its collision world, the
//! input types and sequencer, and the wire protocol. The server's authority
//! loop and the client's predictor both drive [`movement::MovementSimulator`]
//! with the same [`config::MovementConfig`] and the same geometry, which is
//! the entire basis for prediction and reconciliation working at all.
//!
//! Movement state flows by value: the simulator returns a new
//! [`movement::MovementState`] per tick and nothing holds one by shared
//! reference across components.

pub mod collide;
pub mod config;
pub mod input;
pub mod movement;
pub mod protocol;
pub mod transform;
pub mod world;

pub use collide::{CollisionShape, Slide, Sweep, SweepCollider};
pub use config::MovementConfig;
pub use input::{FrameSample, InputError, InputSequencer, MouseDelta, TickInput};
pub use movement::{MovementSimulator, MovementState};
pub use protocol::{Packet, Snapshot, PROTOCOL_VERSION};
pub use transform::Transform;
pub use world::{Aabb, BoxWorld};
