use anyhow::{Context, Result};
use cf2json_cli::{init_tracing, load_config};
use cf2json_core::count_distinct;
use clap::Parser;
use flate2::read::GzDecoder;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use tracing::info;

/// Count distinct partition-key UUID prefixes in a dump file
#[derive(Parser)]
#[command(name = "cf2json-count")]
#[command(version)]
#[command(about = "Count distinct partition-key UUID prefixes in a dump file", long_about = None)]
struct Cli {
    /// Source dump file (defaults to dump.file from the config)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = load_config(cli.config.as_deref())?;
    if let Some(input) = &cli.input {
        config.dump.file = input.to_string_lossy().to_string();
    }

    let _guard = init_tracing(&config);

    let file = File::open(&config.dump.file)
        .with_context(|| format!("Failed to open dump file: {}", config.dump.file))?;
    let reader = GzDecoder::new(BufReader::new(file));

    let summary = count_distinct(reader)
        .with_context(|| format!("Failed to count dump file: {}", config.dump.file))?;

    info!(
        records = summary.records,
        malformed = summary.malformed,
        "count complete"
    );

    // The count is the program's output; everything else goes to stderr.
    println!("{}", summary.distinct);
    Ok(())
}
