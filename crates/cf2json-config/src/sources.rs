// Configuration source loading.
//
// Priority order:
// 1. Environment variables (CF2JSON_* prefix)
// 2. Config file path from CF2JSON_CONFIG
// 3. Default config file (./cf2json.toml)
// 4. Built-in defaults

use crate::env_overrides::{self, EnvSource, ENV_PREFIX};
use crate::MigrationConfig;
use anyhow::{Context, Result};
use std::env;
use std::path::Path;

/// Load configuration from the default file locations plus the environment.
pub fn load_config() -> Result<MigrationConfig> {
    let mut config = match load_from_file()? {
        Some(file_config) => file_config,
        None => MigrationConfig::default(),
    };

    env_overrides::apply_env_overrides(&mut config, &StdEnvSource)?;
    config.validate()?;
    Ok(config)
}

/// Load configuration from a specific file path (for the CLI --config flag).
/// Returns an error if the file is missing or malformed; environment
/// overrides and validation still apply afterwards.
pub fn load_from_file_path(path: impl AsRef<Path>) -> Result<MigrationConfig> {
    let mut config = read_config_file(path.as_ref())?;
    env_overrides::apply_env_overrides(&mut config, &StdEnvSource)?;
    config.validate()?;
    Ok(config)
}

fn load_from_file() -> Result<Option<MigrationConfig>> {
    if let Ok(path) = env::var("CF2JSON_CONFIG") {
        return read_config_file(Path::new(&path)).map(Some);
    }

    let default_path = Path::new("./cf2json.toml");
    if default_path.exists() {
        return read_config_file(default_path).map(Some);
    }

    Ok(None)
}

fn read_config_file(path: &Path) -> Result<MigrationConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, key: &str) -> Option<String> {
        env::var(format!("{}{}", ENV_PREFIX, key)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn explicit_file_path_is_loaded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[cluster]\nnodes = [\"10.2.0.9\"]\n\n[dump]\nfile = \"out.json.gz\"\n"
        )
        .unwrap();

        let config = load_from_file_path(file.path()).unwrap();
        assert_eq!(config.cluster.nodes, vec!["10.2.0.9"]);
        assert_eq!(config.dump.file, "out.json.gz");
        assert_eq!(config.cluster.keyspace, "ddsc");
    }

    #[test]
    fn missing_file_path_is_an_error() {
        assert!(load_from_file_path("/nonexistent/cf2json.toml").is_err());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[cluster\nnodes = 3").unwrap();
        assert!(load_from_file_path(file.path()).is_err());
    }
}
