//! Game Data Server
//!
//! Loads and verifies the game database, logs its summary and refuses to
//! start on any data error. An optional first argument lists every Power
//! prototype whose name contains it.

use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing::{debug, error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use gamedata::{
    decode, encode, DatabaseConfig, EntitySnapshot, EnumCategory, GameDatabase, Orientation,
    Vector3, VERSION,
};

fn main() -> ExitCode {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Failed to set tracing subscriber");
        return ExitCode::FAILURE;
    }

    info!("Game Data Server v{}", VERSION);

    match run(std::env::args().nth(1)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Startup failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(power_filter: Option<String>) -> Result<()> {
    let config = DatabaseConfig::from_env();
    let database = GameDatabase::load(&config)
        .with_context(|| format!("loading game data from {}", config.manifest_path.display()))?;

    self_check(&database).context("archive self-check")?;

    if let Some(filter) = power_filter {
        list_powers(&database, &filter);
    }

    info!("Game database ready: {} prototypes", database.max_enum_value());
    Ok(())
}

/// Encode and decode a snapshot of the first Entity prototype.
fn self_check(database: &GameDatabase) -> Result<()> {
    let prototype = database.prototype_from_enum(1, EnumCategory::Entity)?;
    let mut snapshot = EntitySnapshot::new(1, prototype)
        .with_location(Vector3::ZERO, Orientation::default())
        .without_locomotion();

    let bytes = encode(&mut snapshot, database.enums())?;
    let decoded: EntitySnapshot = decode(&bytes, database.enums())?;
    anyhow::ensure!(decoded == snapshot, "snapshot changed across encode/decode");

    debug!("Self-check snapshot: {}", hex::encode(&bytes));
    Ok(())
}

fn list_powers(database: &GameDatabase, filter: &str) {
    let indices = database.enums().power_indices_matching(filter, |id| database.prototype_name(id).ok());
    info!("{} powers match \"{}\"", indices.len(), filter);

    for index in indices {
        if let Ok(id) = database.prototype_from_enum(index, EnumCategory::Power) {
            let name = database.prototype_name(id).unwrap_or("<unnamed>");
            info!("  [{}] {} {}", index, id, name);
        }
    }
}
