use crate::{LogFormat, MigrationConfig};
use anyhow::{anyhow, Context, Result};

pub const ENV_PREFIX: &str = "CF2JSON_";

/// Abstraction over environment-variable lookups so tests can inject their
/// own source of overrides.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides (highest priority) to the config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut MigrationConfig, env: &E) -> Result<()> {
    // Cluster configuration
    if let Some(nodes) = env.get("NODES") {
        config.cluster.nodes = nodes
            .split(',')
            .map(str::trim)
            .filter(|node| !node.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(port) = get_env_u16(env, "PORT")? {
        config.cluster.port = port;
    }
    if let Some(keyspace) = env.get("KEYSPACE") {
        config.cluster.keyspace = keyspace;
    }
    if let Some(column_family) = env.get("COLUMN_FAMILY") {
        config.cluster.column_family = column_family;
    }

    // Dump configuration
    if let Some(file) = env.get("DUMP_FILE") {
        config.dump.file = file;
    }
    if let Some(page_size) = get_env_usize(env, "PAGE_SIZE")? {
        config.dump.page_size = page_size;
    }
    if let Some(encoding) = env.get("ENCODING") {
        config.dump.encoding = encoding;
    }

    // Logging
    if let Some(level) = env.get("LOG_LEVEL") {
        config.log.level = level;
    }
    if let Some(format) = env.get("LOG_FORMAT") {
        config.log.format = format
            .parse::<LogFormat>()
            .context("Invalid CF2JSON_LOG_FORMAT value")?;
    }

    Ok(())
}

fn get_env_u16<E: EnvSource>(env: &E, key: &str) -> Result<Option<u16>> {
    match env.get(key) {
        Some(val) => {
            let parsed = val
                .parse::<u16>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

fn get_env_usize<E: EnvSource>(env: &E, key: &str) -> Result<Option<usize>> {
    match env.get(key) {
        Some(val) => {
            let parsed = val
                .parse::<usize>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}
