use anyhow::{Context, Result};
use cf2json_cli::{init_tracing, load_config};
use cf2json_config::MigrationConfig;
use cf2json_core::{dump_partitions, first_verified_key, DumpWriter, ExportError};
use cf2json_store::CqlStore;
use clap::Parser;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{error, info};

/// Dump a Cassandra column family to a gzip-compressed JSON array
#[derive(Parser)]
#[command(name = "cf2json-dump")]
#[command(version)]
#[command(about = "Dump a Cassandra column family to a gzip-compressed JSON array", long_about = None)]
struct Cli {
    /// Destination file (defaults to dump.file from the config)
    #[arg(value_name = "FILE")]
    output: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(output) = &cli.output {
        config.dump.file = output.to_string_lossy().to_string();
    }

    let _guard = init_tracing(&config);
    run(&config)
}

fn run(config: &MigrationConfig) -> Result<()> {
    info!(
        keyspace = %config.cluster.keyspace,
        column_family = %config.cluster.column_family,
        "connecting to source cluster"
    );
    let store = CqlStore::connect(&config.cluster)?;

    let first = match first_verified_key(&store) {
        Ok(first) => first,
        Err(err) => {
            if matches!(err, ExportError::NotFirstKey { .. }) {
                error!(error = %err, "first-key verification failed");
            }
            return Err(err.into());
        }
    };

    // An empty column family is a clean no-op: exit 0, no file created.
    let Some(first) = first else {
        info!("nothing to dump");
        return Ok(());
    };

    info!(file = %config.dump.file, first_key = %first, "dumping column family");

    let file = File::create(&config.dump.file)
        .with_context(|| format!("Failed to create dump file: {}", config.dump.file))?;
    let encoder = GzEncoder::new(BufWriter::new(file), Compression::default());
    let mut writer = DumpWriter::new(encoder)?;

    let summary = dump_partitions(&store, first, &mut writer, config.dump.page_size)?;

    let encoder = writer.finish()?;
    let mut buffered = encoder.finish().context("Failed to finish gzip stream")?;
    buffered.flush().context("Failed to flush dump file")?;

    info!(
        partitions = summary.partitions,
        columns = summary.columns,
        file = %config.dump.file,
        "dump complete"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn cli_accepts_positional_output_and_config_flag() {
        let cli = Cli::parse_from(["cf2json-dump", "out.json.gz", "--config", "cf2json.toml"]);
        assert_eq!(cli.output, Some(PathBuf::from("out.json.gz")));
        assert_eq!(cli.config, Some(PathBuf::from("cf2json.toml")));

        let cli = Cli::parse_from(["cf2json-dump"]);
        assert!(cli.output.is_none());
        assert!(cli.config.is_none());
    }
}
