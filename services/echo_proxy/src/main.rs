//! Echo proxy demo - spawns a Proxy, sends it one message, shuts down
//!
//! Usage:
//!   echo-proxy
//!   echo-proxy --config config/echo_proxy.toml --message "hello"

use anyhow::Result;
use clap::Parser;
use echo_proxy::{EchoMessage, EchoProxyConfig, Proxy, Transcript};
use std::path::PathBuf;
use switchboard_actors::ActorSystem;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "echo-proxy")]
#[command(about = "Switchboard echo/proxy actor demo")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Message to pass through the proxy (overrides config)
    #[arg(short, long)]
    message: Option<String>,

    /// Milliseconds to wait before broadcasting shutdown (overrides config)
    #[arg(long)]
    settle_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error); RUST_LOG takes precedence
    #[arg(short, long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args);

    let mut config = match &args.config {
        Some(path) => EchoProxyConfig::from_file(path)?,
        None => EchoProxyConfig::default(),
    };
    if let Some(message) = args.message.clone() {
        config.demo.message = message;
    }
    if let Some(settle_ms) = args.settle_ms {
        config.demo.settle_ms = settle_ms;
    }

    let system = ActorSystem::with_config(config.runtime.clone())?;
    let transcript = Transcript::default();

    let proxy = system.spawn(Proxy::new(transcript.clone()), None).await?;
    info!(proxy = %proxy, "Sending echo request");
    system.tell(&proxy, EchoMessage::Echo(config.demo.message.clone()))?;

    tokio::time::sleep(config.demo.settle()).await;

    let routed = system.broadcast_shutdown();
    for address in system.list_actors() {
        let status = system.join(&address).await?;
        info!(actor = %address, status = ?status, "Actor finished");
    }

    if transcript.len() < 3 {
        warn!(
            handled = transcript.len(),
            "Echo round trip incomplete before shutdown"
        );
    }
    info!(
        shutdown_routed = routed,
        stats = ?system.metrics().snapshot(),
        "Echo proxy demo complete"
    );
    Ok(())
}

fn init_logging(args: &Args) {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(args.log_level.to_lowercase())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
