//! Server network layer: UDP plumbing around the authority loop.
//!
//! Incoming packets are decoded on a receiver task and funneled through a
//! channel into the main loop, so all simulation state is touched from a
//! single task and inputs are only consumed at tick boundaries.

use crate::authority::AuthorityLoop;
use crate::session::SessionRegistry;
use bincode::{deserialize, serialize};
use log::{error, info, warn};
use shared::{Packet, PROTOCOL_VERSION};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::net::UdpSocket;
use tokio::sync::{mpsc, RwLock};
use tokio::time::interval;

/// Messages sent from network tasks to the main server loop.
#[derive(Debug)]
pub enum ServerMessage {
    PacketReceived {
        packet: Packet,
        addr: SocketAddr,
    },
    ClientTimeout {
        client_id: u32,
    },
    #[allow(dead_code)]
    Shutdown,
}

/// Messages sent from the main loop to the sender task.
#[derive(Debug)]
pub enum SendMessage {
    Packet { packet: Packet, addr: SocketAddr },
    Broadcast { packet: Packet },
}

pub struct Server {
    socket: Arc<UdpSocket>,
    sessions: Arc<RwLock<SessionRegistry>>,
    authority: AuthorityLoop,
    tick_duration: Duration,
    broadcast_duration: Duration,

    server_tx: mpsc::UnboundedSender<ServerMessage>,
    server_rx: mpsc::UnboundedReceiver<ServerMessage>,
    send_tx: mpsc::UnboundedSender<SendMessage>,
    send_rx: mpsc::UnboundedReceiver<SendMessage>,
}

impl Server {
    pub async fn new(
        addr: &str,
        authority: AuthorityLoop,
        tick_duration: Duration,
        broadcast_duration: Duration,
        max_players: usize,
        queue_capacity: usize,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let socket = Arc::new(UdpSocket::bind(addr).await?);
        info!("server listening on {}", addr);

        let (server_tx, server_rx) = mpsc::unbounded_channel();
        let (send_tx, send_rx) = mpsc::unbounded_channel();

        Ok(Server {
            socket,
            sessions: Arc::new(RwLock::new(SessionRegistry::new(max_players, queue_capacity))),
            authority,
            tick_duration,
            broadcast_duration,
            server_tx,
            server_rx,
            send_tx,
            send_rx,
        })
    }

    /// Spawns the task that listens for incoming datagrams.
    fn spawn_receiver(&self) {
        let socket = Arc::clone(&self.socket);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut buffer = [0u8; 4096];

            loop {
                match socket.recv_from(&mut buffer).await {
                    Ok((len, addr)) => {
                        if let Ok(packet) = deserialize::<Packet>(&buffer[0..len]) {
                            if server_tx
                                .send(ServerMessage::PacketReceived { packet, addr })
                                .is_err()
                            {
                                break;
                            }
                        } else {
                            warn!("undecodable packet from {}", addr);
                        }
                    }
                    Err(e) => {
                        error!("error receiving packet: {}", e);
                        tokio::time::sleep(Duration::from_millis(10)).await;
                    }
                }
            }
        });
    }

    /// Spawns the task that drains the outgoing queue.
    fn spawn_sender(&mut self) {
        let socket = Arc::clone(&self.socket);
        let sessions = Arc::clone(&self.sessions);
        let mut send_rx = std::mem::replace(&mut self.send_rx, mpsc::unbounded_channel().1);

        tokio::spawn(async move {
            while let Some(message) = send_rx.recv().await {
                match message {
                    SendMessage::Packet { packet, addr } => {
                        if let Err(e) = Self::send_to(&socket, &packet, addr).await {
                            error!("failed to send to {}: {}", addr, e);
                        }
                    }
                    SendMessage::Broadcast { packet } => {
                        let addrs = {
                            let sessions = sessions.read().await;
                            sessions.addrs()
                        };
                        for (client_id, addr) in addrs {
                            if let Err(e) = Self::send_to(&socket, &packet, addr).await {
                                error!("failed to send to player {}: {}", client_id, e);
                            }
                        }
                    }
                }
            }
        });
    }

    /// Spawns the task that sweeps for silent clients.
    fn spawn_timeout_checker(&self) {
        let sessions = Arc::clone(&self.sessions);
        let server_tx = self.server_tx.clone();

        tokio::spawn(async move {
            let mut sweep = interval(Duration::from_secs(1));

            loop {
                sweep.tick().await;

                let timed_out = {
                    let mut sessions = sessions.write().await;
                    sessions.check_timeouts()
                };

                for client_id in timed_out {
                    if server_tx
                        .send(ServerMessage::ClientTimeout { client_id })
                        .is_err()
                    {
                        return;
                    }
                }
            }
        });
    }

    async fn send_to(
        socket: &UdpSocket,
        packet: &Packet,
        addr: SocketAddr,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let data = serialize(packet)?;
        socket.send_to(&data, addr).await?;
        Ok(())
    }

    fn queue_send(&self, packet: Packet, addr: SocketAddr) {
        if self.send_tx.send(SendMessage::Packet { packet, addr }).is_err() {
            error!("sender task gone, dropping packet");
        }
    }

    fn queue_broadcast(&self, packet: Packet) {
        if self.send_tx.send(SendMessage::Broadcast { packet }).is_err() {
            error!("sender task gone, dropping broadcast");
        }
    }

    async fn handle_packet(&mut self, packet: Packet, addr: SocketAddr) {
        match packet {
            Packet::Connect { client_version } => {
                if client_version != PROTOCOL_VERSION {
                    warn!(
                        "rejecting {} with protocol version {} (want {})",
                        addr, client_version, PROTOCOL_VERSION
                    );
                    self.queue_send(
                        Packet::Disconnected {
                            reason: "protocol version mismatch".to_string(),
                        },
                        addr,
                    );
                    return;
                }

                // A reconnect from a known address replaces the old session.
                let existing = {
                    let sessions = self.sessions.read().await;
                    sessions.find_by_addr(addr)
                };
                if let Some(existing_id) = existing {
                    info!("replacing existing session {} from {}", existing_id, addr);
                    let mut sessions = self.sessions.write().await;
                    sessions.remove(existing_id);
                    self.authority.remove_player(existing_id);
                }

                let client_id = {
                    let mut sessions = self.sessions.write().await;
                    sessions.add(addr)
                };

                match client_id {
                    Some(client_id) => {
                        self.authority.add_player(client_id);
                        self.queue_send(Packet::Connected { client_id }, addr);
                    }
                    None => {
                        self.queue_send(
                            Packet::Disconnected {
                                reason: "server full".to_string(),
                            },
                            addr,
                        );
                    }
                }
            }

            Packet::Input { input } => {
                let client_id = {
                    let sessions = self.sessions.read().await;
                    sessions.find_by_addr(addr)
                };

                if let Some(client_id) = client_id {
                    let mut sessions = self.sessions.write().await;
                    sessions.queue_input(client_id, input);
                }
            }

            Packet::Disconnect => {
                let client_id = {
                    let sessions = self.sessions.read().await;
                    sessions.find_by_addr(addr)
                };

                if let Some(client_id) = client_id {
                    let mut sessions = self.sessions.write().await;
                    sessions.remove(client_id);
                    self.authority.remove_player(client_id);
                }
            }

            _ => {
                warn!("unexpected packet type from {}", addr);
            }
        }
    }

    async fn broadcast_snapshot(&mut self) {
        let sessions = self.sessions.read().await;
        if sessions.is_empty() {
            return;
        }

        // Stamp as close to transmission as possible.
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::from_secs(0))
            .as_millis() as u64;

        let snapshot = self.authority.snapshot(&sessions, timestamp);
        drop(sessions);

        self.queue_broadcast(Packet::Snapshot { snapshot });
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        self.spawn_receiver();
        self.spawn_sender();
        self.spawn_timeout_checker();

        let mut sim_interval = interval(self.tick_duration);
        let mut broadcast_interval = interval(self.broadcast_duration);

        info!(
            "server running: {:.0} Hz simulation, {:.0} Hz broadcast",
            1.0 / self.tick_duration.as_secs_f64(),
            1.0 / self.broadcast_duration.as_secs_f64()
        );

        loop {
            tokio::select! {
                message = self.server_rx.recv() => {
                    match message {
                        Some(ServerMessage::PacketReceived { packet, addr }) => {
                            self.handle_packet(packet, addr).await;
                        },
                        Some(ServerMessage::ClientTimeout { client_id }) => {
                            self.authority.remove_player(client_id);
                        },
                        Some(ServerMessage::Shutdown) | None => {
                            info!("server shutting down");
                            break;
                        }
                    }
                },

                _ = sim_interval.tick() => {
                    let mut sessions = self.sessions.write().await;
                    self.authority.advance(&mut sessions);
                },

                _ = broadcast_interval.tick() => {
                    self.broadcast_snapshot().await;
                },
            }
        }

        Ok(())
    }
}
