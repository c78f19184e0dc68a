// Configuration validation
//
// The keyspace and column family names are spliced into CQL statement text,
// so they are held to bare-identifier form instead of being escaped.

use crate::{ClusterConfig, DumpConfig, LogConfig, MigrationConfig};
use anyhow::{bail, Result};
use tracing::warn;

pub fn validate_config(config: &MigrationConfig) -> Result<()> {
    validate_cluster_config(&config.cluster)?;
    validate_dump_config(&config.dump)?;
    validate_log_config(&config.log)?;
    Ok(())
}

fn validate_cluster_config(config: &ClusterConfig) -> Result<()> {
    if config.nodes.is_empty() {
        bail!("cluster.nodes must list at least one contact point");
    }

    if config.nodes.iter().any(|node| node.trim().is_empty()) {
        bail!("cluster.nodes must not contain empty entries");
    }

    if config.port == 0 {
        bail!("cluster.port must be greater than 0");
    }

    if !is_cql_identifier(&config.keyspace) {
        bail!(
            "cluster.keyspace must be a bare CQL identifier, got {:?}",
            config.keyspace
        );
    }

    if !is_cql_identifier(&config.column_family) {
        bail!(
            "cluster.column_family must be a bare CQL identifier, got {:?}",
            config.column_family
        );
    }

    Ok(())
}

fn validate_dump_config(config: &DumpConfig) -> Result<()> {
    if config.file.is_empty() {
        bail!("dump.file must not be empty");
    }

    if config.page_size == 0 {
        bail!("dump.page_size must be greater than 0");
    }

    // Warn about very large pages; a full page is held in memory
    if config.page_size > 1_000_000 {
        warn!(
            page_size = config.page_size,
            "dump.page_size is very large; may cause memory issues"
        );
    }

    if !is_utf8_name(&config.encoding) {
        bail!(
            "dump.encoding: only UTF-8 output is supported, got {:?}",
            config.encoding
        );
    }

    Ok(())
}

fn validate_log_config(config: &LogConfig) -> Result<()> {
    if config.level.is_empty() {
        bail!("log.level must not be empty");
    }

    Ok(())
}

fn is_cql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_utf8_name(encoding: &str) -> bool {
    matches!(encoding.to_ascii_lowercase().as_str(), "utf-8" | "utf8")
}
