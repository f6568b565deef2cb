//! Client network layer: the predictive tick loop over a UDP socket.
//!
//! The loop samples input once per fixed tick, predicts locally, and sends
//! the input to the server. Snapshots coming back reconcile the local player
//! and feed the interpolation buffers of every remote player. Packets are
//! handled between ticks only; nothing mutates the predicted state while a
//! tick is in flight.

use crate::prediction::PredictionController;
use crate::snapshot_buffer::SnapshotBuffer;
use bincode::{deserialize, serialize};
use log::{debug, error, info, warn};
use shared::{
    FrameSample, InputSequencer, MovementConfig, MovementState, Packet, Snapshot, PROTOCOL_VERSION,
};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::net::UdpSocket;
use tokio::time::{interval, sleep};

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_millis() as u64
}

/// Deterministic control script driving the headless client: run forward,
/// weave, hop now and then, and sweep the view around. Stands in for a real
/// input device so netcode behavior can be exercised and measured from the
/// command line.
struct ScriptedPilot;

impl ScriptedPilot {
    fn frame(&self, tick: u64) -> FrameSample {
        FrameSample {
            forward: 1.0,
            strafe: match (tick / 128) % 3 {
                0 => 0.0,
                1 => 1.0,
                _ => -1.0,
            },
            jump_held: tick % 160 < 12,
        }
    }

    fn turn(&self, tick: u64) -> f32 {
        if tick % 64 == 0 {
            45.0 / 0.05 * 0.25 // quarter of a 45 degree turn, in mouse counts
        } else {
            0.0
        }
    }
}

pub struct Client {
    socket: UdpSocket,
    server_addr: SocketAddr,
    client_id: Option<u32>,
    connected: bool,

    config: MovementConfig,
    tick_dt: f32,
    tick: u64,
    sequencer: InputSequencer,
    prediction: Option<PredictionController>,
    remotes: HashMap<u32, SnapshotBuffer>,
    last_snapshot_timestamp: u64,

    pilot: ScriptedPilot,
    fake_ping_ms: u64,
    ping_ms: u64,
}

impl Client {
    pub async fn new(
        server_addr: &str,
        config: MovementConfig,
        tick_rate: u32,
        auto_jump: bool,
        fake_ping_ms: u64,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        let server_addr = server_addr.parse()?;

        Ok(Client {
            socket,
            server_addr,
            client_id: None,
            connected: false,
            config,
            tick_dt: 1.0 / tick_rate as f32,
            tick: 0,
            sequencer: InputSequencer::new(auto_jump),
            prediction: None,
            remotes: HashMap::new(),
            last_snapshot_timestamp: 0,
            pilot: ScriptedPilot,
            fake_ping_ms,
            ping_ms: 0,
        })
    }

    pub fn ping_ms(&self) -> u64 {
        self.ping_ms
    }

    async fn connect(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        info!("connecting to {}...", self.server_addr);
        self.send_packet(&Packet::Connect {
            client_version: PROTOCOL_VERSION,
        })
        .await
    }

    async fn send_packet(&self, packet: &Packet) -> Result<(), Box<dyn std::error::Error>> {
        // Half the simulated round trip on the way out.
        if self.fake_ping_ms > 0 {
            sleep(Duration::from_millis(self.fake_ping_ms / 2)).await;
        }

        let data = serialize(packet)?;
        self.socket.send_to(&data, self.server_addr).await?;
        Ok(())
    }

    fn handle_snapshot(&mut self, snapshot: Snapshot) {
        // Out-of-order and duplicate snapshots are expected on UDP; only
        // strictly newer ones are applied.
        if snapshot.timestamp <= self.last_snapshot_timestamp {
            debug!(
                "dropping stale snapshot at {} (newest {})",
                snapshot.timestamp, self.last_snapshot_timestamp
            );
            return;
        }
        self.last_snapshot_timestamp = snapshot.timestamp;
        self.ping_ms = now_ms().saturating_sub(snapshot.timestamp);

        let local_id = match self.client_id {
            Some(id) => id,
            None => return,
        };

        for (player_id, state) in &snapshot.players {
            if *player_id == local_id {
                self.reconcile_local(*state, snapshot.acked_for(local_id));
            } else {
                self.remotes
                    .entry(*player_id)
                    .or_default()
                    .push(snapshot.timestamp, *state);
            }
        }

        // Forget remote players missing from the authoritative set.
        self.remotes
            .retain(|player_id, _| snapshot.players.contains_key(player_id));
    }

    fn reconcile_local(&mut self, state: MovementState, ack: Option<u64>) {
        match self.prediction.as_mut() {
            Some(prediction) => {
                prediction.reconcile(state, ack.unwrap_or(0));
            }
            None => {
                // First authoritative sight of ourselves: adopt it as the
                // prediction baseline.
                self.prediction = Some(PredictionController::new(
                    self.config,
                    state,
                    self.tick_dt,
                ));
            }
        }
    }

    async fn handle_packet(&mut self, packet: Packet) {
        match packet {
            Packet::Connected { client_id } => {
                info!("connected with id {}", client_id);
                self.client_id = Some(client_id);
                self.connected = true;
            }

            Packet::Snapshot { snapshot } => {
                self.handle_snapshot(snapshot);
            }

            Packet::Disconnected { reason } => {
                warn!("disconnected by server: {}", reason);
                self.connected = false;
                self.client_id = None;
                self.prediction = None;
            }

            _ => {
                warn!("unexpected packet type from server");
            }
        }
    }

    /// One predictive tick: sample, predict, transmit.
    async fn advance_tick(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.tick += 1;

        let Some(prediction) = self.prediction.as_mut() else {
            return Ok(());
        };

        let turn = self.pilot.turn(self.tick);
        if turn != 0.0 {
            self.sequencer.accumulate_mouse(turn, 0.0);
        }

        let frame = self.pilot.frame(self.tick);
        let grounded = prediction.grounded();
        let input = self.sequencer.sample(&frame, grounded, self.tick, now_ms());

        let state = prediction.predict(input.clone());
        if self.tick % 256 == 0 {
            debug!(
                "tick {}: predicted origin {}, {} unacked inputs",
                self.tick,
                state.transform.origin,
                prediction.history_len()
            );
        }

        self.send_packet(&Packet::Input { input }).await
    }

    /// Samples every remote buffer at the render clock. The headless build
    /// has no renderer; this is the state a camera would consume.
    fn sample_remotes(&mut self) -> Vec<(u32, MovementState)> {
        let now = now_ms();
        self.remotes
            .iter_mut()
            .filter_map(|(id, buffer)| buffer.sample(now).map(|state| (*id, state)))
            .collect()
    }

    /// Runs the client loop for `run_ticks` ticks (0 means until killed).
    pub async fn run(&mut self, run_ticks: u64) -> Result<(), Box<dyn std::error::Error>> {
        self.connect().await?;

        let mut tick_interval = interval(Duration::from_secs_f32(self.tick_dt));
        let mut buffer = [0u8; 65536];

        loop {
            tokio::select! {
                result = self.socket.recv_from(&mut buffer) => {
                    match result {
                        Ok((len, _)) => {
                            // The other half of the simulated round trip.
                            if self.fake_ping_ms > 0 {
                                sleep(Duration::from_millis(self.fake_ping_ms / 2)).await;
                            }

                            if let Ok(packet) = deserialize::<Packet>(&buffer[0..len]) {
                                self.handle_packet(packet).await;
                            } else {
                                warn!("undecodable packet from server");
                            }
                        },
                        Err(e) => error!("error receiving packet: {}", e),
                    }
                },

                _ = tick_interval.tick() => {
                    if self.connected {
                        self.advance_tick().await?;

                        let remotes = self.sample_remotes();
                        if self.tick % 256 == 0 && !remotes.is_empty() {
                            debug!("tick {}: {} remote players interpolated", self.tick, remotes.len());
                        }
                    }

                    if run_ticks > 0 && self.tick >= run_ticks {
                        break;
                    }
                },
            }
        }

        if self.connected {
            let _ = self.send_packet(&Packet::Disconnect).await;
            info!("session finished after {} ticks, ping {} ms", self.tick, self.ping_ms);
        }

        Ok(())
    }
}
