use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use meeting_assistant::edge::{EdgeTransport, NatsEdge};
use meeting_assistant::http::{create_router, AppState};
use meeting_assistant::session::{SessionRegistry, SessionSupervisor};
use meeting_assistant::Config;

/// Call transcription backend with a trigger-gated meeting assistant.
#[derive(Debug, Parser)]
#[command(name = "meeting-assistant", version)]
struct Cli {
    /// Configuration file (TOML; extension optional)
    #[arg(long, default_value = "config/meeting-assistant")]
    config: String,

    /// Override the configured HTTP port
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut cfg = Config::load(&cli.config)?;
    if let Some(port) = cli.port {
        cfg.service.http.port = port;
    }

    info!("{} starting", cfg.service.name);

    let edge: Arc<dyn EdgeTransport> =
        Arc::new(NatsEdge::connect(&cfg.edge.nats_url, cfg.assistant.identity()).await?);
    let registry = Arc::new(SessionRegistry::new());
    let supervisor = Arc::new(SessionSupervisor::new(Arc::clone(&registry), edge));

    let state = AppState::new(registry, supervisor);
    let app = create_router(state);

    let addr = format!("{}:{}", cfg.service.http.bind, cfg.service.http.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Meeting assistant backend listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
