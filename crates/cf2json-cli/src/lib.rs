// cf2json-cli - shared wiring for the dump and count binaries
//
// Config resolution and tracing setup. Log events go to stderr in both
// formats; stdout belongs to each binary's own output.

use anyhow::{Context, Result};
use cf2json_config::{LogFormat, MigrationConfig};
use std::path::Path;
use tracing::subscriber::DefaultGuard;

/// Resolve configuration: explicit `--config` path when given, default
/// locations and environment otherwise.
pub fn load_config(config_path: Option<&Path>) -> Result<MigrationConfig> {
    match config_path {
        Some(path) => MigrationConfig::load_from_path(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => MigrationConfig::load().context("Failed to load configuration"),
    }
}

/// Install a tracing subscriber scoped to the returned guard.
///
/// Deliberately not a global default: the subscriber lives on the caller's
/// stack and is uninstalled when the guard drops. Both tools are
/// single-threaded, so the thread-scoped default sees every event.
pub fn init_tracing(config: &MigrationConfig) -> DefaultGuard {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let env_filter =
        EnvFilter::try_new(&config.log.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.log.format {
        LogFormat::Json => tracing::subscriber::set_default(
            registry.with(fmt::layer().json().with_writer(std::io::stderr)),
        ),
        LogFormat::Text => tracing::subscriber::set_default(
            registry.with(fmt::layer().with_writer(std::io::stderr)),
        ),
    }
}
