//! Survivor client binary.
//!
//! Loads a recorded session and spectates it through the session director,
//! logging the narrative and presentation cues.
//!
//! ```bash
//! cargo run -p survivor-client -- path/to/recording.json
//! SURVIVOR_RECORDING=run.json DIRECTOR_SURFACE=mobile cargo run -p survivor-client
//! ```

use anyhow::{Context, Result};

use runtime::DirectorConfig;
use survivor_client::{ClientConfig, RecordedLedger, Recording, logging, spectate};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let client_config = ClientConfig::from_env();
    let director_config = DirectorConfig::from_env();

    let path = client_config
        .recording
        .clone()
        .context("No recording given. Pass a path or set SURVIVOR_RECORDING.")?;
    let recording = Recording::load(&path)?;

    logging::setup_logging(
        client_config.log_dir.clone(),
        &format!("session_{}", recording.session.0),
    )?;

    tracing::info!("Starting survivor client");
    tracing::info!("Recording: {}", path.display());
    tracing::info!("Surface: {}", director_config.surface);

    let summary = spectate(RecordedLedger::new(recording), director_config).await?;

    tracing::info!(
        mode = %summary.mode,
        events = summary.events_processed,
        narrative = summary.narrative.len(),
        cues = summary.cues.len(),
        "Client shutdown complete"
    );
    Ok(())
}
