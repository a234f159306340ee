use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use fleetsim_server::{
    ServerError,
    chat::{ChatSession, GatewayClient},
    config::ServerConfig,
};
use tracing::error;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "fleetsim-server")]
#[command(about = "Simulated bus fleet with a live HTTP API and a chat proxy")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "FLEETSIM_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(long, env = "FLEETSIM_HOST")]
    host: Option<String>,

    #[arg(short, long, env = "FLEETSIM_PORT")]
    port: Option<u16>,

    /// Real seconds between ticks
    #[arg(long)]
    tick_interval: Option<f64>,

    /// Seed for a reproducible run
    #[arg(long)]
    seed: Option<u64>,

    /// JSON fleet roster
    #[arg(long)]
    fleet: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP service (default)
    Serve,
    /// Send one question through the chat gateway and print the reply
    Ask { message: Vec<String> },
}

impl Args {
    fn into_config(self) -> Result<(ServerConfig, Option<Command>), ServerError> {
        let mut config = ServerConfig::load(self.config.as_deref())?;
        if let Some(host) = self.host {
            config.server.host = host;
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(interval) = self.tick_interval {
            config.simulation.tick_interval_secs = interval;
        }
        if self.seed.is_some() {
            config.simulation.seed = self.seed;
        }
        if self.fleet.is_some() {
            config.simulation.fleet = self.fleet;
        }
        Ok((config, self.command))
    }
}

async fn ask(config: &ServerConfig, words: &[String]) -> Result<(), ServerError> {
    let backend = GatewayClient::from_config(&config.chat)?;
    let mut session = ChatSession::new();
    let reply = session.send(&backend, &words.join(" ")).await?;

    println!("{}\n", reply.content);
    for link in reply.youtube_links.iter().flatten() {
        println!("  {link}");
    }
    Ok(())
}

async fn run(args: Args) -> Result<(), ServerError> {
    let (config, command) = args.into_config()?;
    match command {
        Some(Command::Ask { message }) => ask(&config, &message).await,
        Some(Command::Serve) | None => fleetsim_server::serve(config).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
