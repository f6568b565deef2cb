use clap::Parser;
use log::info;
use server::authority::AuthorityLoop;
use server::network::Server;
use shared::MovementConfig;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to bind to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(short, long, default_value = "28960")]
    port: u16,

    /// Simulation ticks per second
    #[arg(short, long, default_value = "64")]
    tick_rate: u32,

    /// Snapshot broadcasts per second
    #[arg(short, long, default_value = "20")]
    broadcast_rate: u32,

    /// Maximum concurrent players
    #[arg(short, long, default_value = "16")]
    max_players: usize,

    /// Pending inputs buffered per player
    #[arg(long, default_value = "32")]
    queue_capacity: usize,

    /// Max ground speed
    #[arg(long, default_value = "10.0")]
    max_speed: f32,

    /// Ground/air acceleration factor
    #[arg(long, default_value = "60.0")]
    acceleration: f32,

    /// Ground friction factor
    #[arg(long, default_value = "6.0")]
    friction: f32,

    /// Jump launch velocity
    #[arg(long, default_value = "8.0")]
    jump_impulse: f32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let config = MovementConfig {
        max_speed: args.max_speed,
        acceleration: args.acceleration,
        friction: args.friction,
        jump_impulse: args.jump_impulse,
        ..MovementConfig::default()
    };

    let tick_duration = Duration::from_secs_f64(1.0 / args.tick_rate as f64);
    let broadcast_duration = Duration::from_secs_f64(1.0 / args.broadcast_rate as f64);
    let authority = AuthorityLoop::new(config, tick_duration.as_secs_f32());

    let addr = format!("{}:{}", args.host, args.port);
    info!("starting server on {}", addr);

    let mut server = Server::new(
        &addr,
        authority,
        tick_duration,
        broadcast_duration,
        args.max_players,
        args.queue_capacity,
    )
    .await?;

    server.run().await?;

    Ok(())
}
