// cf2json-config - Layered configuration for the migration binaries
//
// Supports configuration from multiple sources:
// 1. Environment variables (CF2JSON_* prefix, highest priority)
// 2. Config file path from CF2JSON_CONFIG env var
// 3. Default config file location (./cf2json.toml)
// 4. Built-in defaults matching the cluster the tools were written against

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod env_overrides;
mod sources;
mod validation;

pub use env_overrides::{EnvSource, ENV_PREFIX};

/// Top-level configuration shared by the dump and count binaries.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigrationConfig {
    #[serde(default)]
    pub cluster: ClusterConfig,

    #[serde(default)]
    pub dump: DumpConfig,

    #[serde(default)]
    pub log: LogConfig,
}

/// Source cluster connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    #[serde(default = "default_nodes")]
    pub nodes: Vec<String>,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_keyspace")]
    pub keyspace: String,

    #[serde(default = "default_column_family")]
    pub column_family: String,
}

fn default_nodes() -> Vec<String> {
    vec!["127.0.0.1".to_string()]
}

fn default_port() -> u16 {
    9042
}

fn default_keyspace() -> String {
    "ddsc".to_string()
}

fn default_column_family() -> String {
    "events".to_string()
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            nodes: default_nodes(),
            port: default_port(),
            keyspace: default_keyspace(),
            column_family: default_column_family(),
        }
    }
}

impl ClusterConfig {
    /// Contact points in `host:port` form. A node that already carries an
    /// explicit port keeps it; the rest get `port` appended.
    pub fn node_addresses(&self) -> Vec<String> {
        self.nodes
            .iter()
            .map(|node| {
                if node.contains(':') {
                    node.clone()
                } else {
                    format!("{}:{}", node, self.port)
                }
            })
            .collect()
    }
}

/// Dump output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DumpConfig {
    #[serde(default = "default_dump_file")]
    pub file: String,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default = "default_encoding")]
    pub encoding: String,
}

fn default_dump_file() -> String {
    "ddsc.json.gz".to_string()
}

fn default_page_size() -> usize {
    // One year of hourly columns per fetch.
    24 * 365
}

fn default_encoding() -> String {
    "utf-8".to_string()
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            file: default_dump_file(),
            page_size: default_page_size(),
            encoding: default_encoding(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub format: LogFormat,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Text => write!(f, "text"),
            LogFormat::Json => write!(f, "json"),
        }
    }
}

impl std::str::FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            _ => anyhow::bail!("Unsupported log format: {}. Supported: text, json", s),
        }
    }
}

impl MigrationConfig {
    /// Load configuration from all sources with priority.
    pub fn load() -> Result<Self> {
        sources::load_config()
    }

    /// Load from an explicit file path (CLI `--config` flag). Environment
    /// overrides still apply on top.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        sources::load_from_file_path(path)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Apply overrides from a custom environment source.
    pub fn apply_env_overrides_from<E: EnvSource>(&mut self, env: &E) -> Result<()> {
        env_overrides::apply_env_overrides(self, env)
    }
}
