//! `meetdraw`: headless meeting participant that draws and submits a sketch.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use meetdraw::script::{self, ScriptError};
use meetdraw::{ChannelError, DrawingSession, MeetdrawConfig, SessionError, Stage, WsChannel};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] meetdraw::config::ConfigError),
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("timed out waiting for startDrawing")]
    Timeout,
    #[error("channel closed before startDrawing")]
    ClosedBeforeStart,
    #[error("failed to write {path}: {source}")]
    Save { path: PathBuf, source: std::io::Error },
}

#[derive(Parser, Debug)]
#[command(name = "meetdraw", about = "Draw on the meeting sketch canvas and forward the drawing")]
struct Cli {
    /// WebSocket endpoint of the meeting channel.
    #[arg(long, env = "MEETDRAW_URL")]
    url: String,

    /// Name attached to the submitted drawing.
    #[arg(long, env = "MEETDRAW_NAME", default_value = "guest")]
    name: String,

    /// JSON stroke script; a single demo stroke is drawn without one.
    #[arg(long)]
    strokes: Option<PathBuf>,

    /// Wait for the host's startDrawing event before drawing.
    #[arg(long, default_value_t = false)]
    wait_for_start: bool,

    /// Seconds to wait for startDrawing.
    #[arg(long, default_value_t = 60)]
    start_timeout_secs: u64,

    /// Also write the exported image to this path. The format's extension is
    /// added when the path has none.
    #[arg(long)]
    save: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    if let Err(error) = dotenvy::dotenv() {
        tracing::debug!(%error, "no .env loaded");
    }

    let cli = Cli::parse();
    let config = MeetdrawConfig::from_env()?;
    let strokes = match &cli.strokes {
        Some(path) => script::load(path)?,
        None => script::demo(),
    };

    let (channel, mut inbound) = WsChannel::connect(&cli.url).await?;
    let channel = Arc::new(channel);
    let mut session = DrawingSession::new(config, cli.name.clone(), channel.clone());

    if cli.wait_for_start {
        let wait = async {
            while let Some(frame) = inbound.recv().await {
                if session.handle_frame(&frame) == Some(Stage::Drawing) {
                    return Ok(());
                }
            }
            Err(AppError::ClosedBeforeStart)
        };
        tokio::time::timeout(Duration::from_secs(cli.start_timeout_secs), wait)
            .await
            .map_err(|_| AppError::Timeout)??;
    }

    let painted = script::replay(&mut session, &strokes);
    info!(strokes = strokes.len(), painted, "strokes drawn");

    let payload = session.submit().await?;
    if let Some(path) = &cli.save {
        let path = payload.image.save_path(path);
        std::fs::write(&path, &payload.image.bytes).map_err(|source| AppError::Save { path: path.clone(), source })?;
        info!(path = %path.display(), "drawing saved");
    }
    session.close();

    // The session is gone; this process owns the connection and closes it.
    match Arc::try_unwrap(channel) {
        Ok(channel) => channel.close().await,
        Err(_) => warn!("channel still shared; leaving it open"),
    }
    Ok(())
}
