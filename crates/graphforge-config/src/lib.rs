#![doc = include_str!("../README.md")]

use std::path::{Path, PathBuf};

use anyhow::Context;
use graphforge_build::BuildOptions;
use graphforge_metadata::ResolverSource;
use schemars::{JsonSchema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const CONFIG_FILENAME: &str = "graphforge.toml";

/// Contents of `graphforge.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
#[schemars(title = "graphforge configuration")]
pub struct Config {
    /// Resolvers, types, generation flags and the schema file directive.
    ///
    /// Resolver globs are relative to the directory containing this file.
    pub build: BuildOptions,
}

impl Config {
    /// Anchor relative resolver globs at `config_dir`.
    fn resolve_relative_to(&mut self, config_dir: &Path) {
        for source in &mut self.build.generator.resolvers {
            if let ResolverSource::Glob(pattern) = source
                && Path::new(pattern.as_str()).is_relative()
            {
                *pattern = config_dir.join(&*pattern).to_string_lossy().into_owned();
            }
        }
    }
}

/// A config file together with where it was found.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub path: PathBuf,
    pub config: Config,
}

impl LoadedConfig {
    /// Directory holding the config file.
    pub fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Generate the JSON Schema for `graphforge.toml`.
pub fn schema() -> Value {
    schema_for!(Config).to_value()
}

/// Find the nearest `graphforge.toml` starting from `start_dir`, walking upward.
pub fn find_config_path(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.is_file())
}

/// Read and parse a config file, resolving its resolver globs.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_file(path: &Path) -> Result<LoadedConfig, anyhow::Error> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut config: Config = toml::from_str(&content)
        .map_err(|e| anyhow::anyhow!("failed to parse {}: {e}", path.display()))?;
    let loaded_dir = path.parent().unwrap_or_else(|| Path::new(""));
    config.resolve_relative_to(loaded_dir);
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(LoadedConfig {
        path: path.to_path_buf(),
        config,
    })
}

/// Search for `graphforge.toml` starting from `start_dir`, walking up.
/// Returns `None` if no config file was found.
///
/// # Errors
///
/// Returns an error if a config file exists but cannot be read or parsed.
pub fn find_and_load(start_dir: &Path) -> Result<Option<LoadedConfig>, anyhow::Error> {
    find_config_path(start_dir)
        .map(|path| load_file(&path))
        .transpose()
}

/// Load config from the current working directory (walking upward).
///
/// # Errors
///
/// Returns an error if no config file exists, or if it cannot be read or parsed.
pub fn load() -> Result<LoadedConfig, anyhow::Error> {
    let cwd = std::env::current_dir()?;
    find_and_load(&cwd)?.with_context(|| {
        format!(
            "no {CONFIG_FILENAME} found in {} or any parent directory",
            cwd.display()
        )
    })
}
