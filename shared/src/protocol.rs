//! Wire types exchanged over the unreliable channel.
//!
//! Every unit carries an explicit sequence id or timestamp so receivers can
//! drop duplicates and late arrivals without coordination. Payload fields all
//! decode with defaults when absent, which lets the schema grow without
//! breaking older peers mid-session.

use crate::input::TickInput;
use crate::movement::MovementState;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bumped on incompatible protocol changes; the server rejects mismatches at
/// connect time.
pub const PROTOCOL_VERSION: u32 = 1;

/// A timestamped, authoritative bundle of every character's movement state.
/// Immutable once assembled; clients keep a short history of them keyed by
/// timestamp.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub tick: u64,
    /// Server wall clock at broadcast, milliseconds.
    #[serde(default)]
    pub timestamp: u64,
    /// Highest input sequence the server has applied, per player. Drives
    /// client-side history pruning and replay.
    #[serde(default)]
    pub last_processed_input: HashMap<u32, u64>,
    #[serde(default)]
    pub players: HashMap<u32, MovementState>,
}

impl Snapshot {
    pub fn acked_for(&self, player_id: u32) -> Option<u64> {
        self.last_processed_input.get(&player_id).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Packet {
    // Client to server.
    Connect { client_version: u32 },
    Input { input: TickInput },
    Disconnect,

    // Server to client.
    Connected { client_id: u32 },
    Snapshot { snapshot: Snapshot },
    Disconnected { reason: String },
}
