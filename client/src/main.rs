use clap::Parser;
use log::info;
use shared::MovementConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server address to connect to
    #[arg(short = 's', long, default_value = "127.0.0.1:28960")]
    server: String,

    /// Prediction ticks per second; must match the server's tick rate
    #[arg(short, long, default_value = "64")]
    tick_rate: u32,

    /// Ticks to run before disconnecting (0 = run until killed)
    #[arg(long, default_value = "0")]
    run_ticks: u64,

    /// Hold-to-bunny-hop instead of tap-to-jump
    #[arg(long)]
    auto_jump: bool,

    /// Simulated one-way-doubled latency in milliseconds
    #[arg(short = 'l', long, default_value = "0")]
    fake_ping: u64,

    /// Max ground speed; must match the server
    #[arg(long, default_value = "10.0")]
    max_speed: f32,

    /// Acceleration factor; must match the server
    #[arg(long, default_value = "60.0")]
    acceleration: f32,

    /// Ground friction factor; must match the server
    #[arg(long, default_value = "6.0")]
    friction: f32,

    /// Jump launch velocity; must match the server
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

    info!("starting client against {}", args.server);
    if args.fake_ping > 0 {
        info!("simulating {} ms of round-trip latency", args.fake_ping);
    }

    let config = MovementConfig {
        max_speed: args.max_speed,
        acceleration: args.acceleration,
        friction: args.friction,
        jump_impulse: args.jump_impulse,
        ..MovementConfig::default()
    };

    let mut client = client::network::Client::new(
        &args.server,
        config,
        args.tick_rate,
        args.auto_jump,
        args.fake_ping,
    )
    .await?;

    client.run(args.run_ticks).await?;

    Ok(())
}
