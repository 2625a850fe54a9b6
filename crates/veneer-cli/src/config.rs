//! Generator configuration parsing (veneer.toml)
//!
//! ```toml
//! metadata = "types.json"
//! out-dir = "Generated"
//!
//! [generator]
//! runtime-namespace = "Acme.Runtime"
//!
//! [[target]]
//! target = "Acme.Widget"
//! options = { proxy-base-classes = true }
//!
//! [[replacement]]
//! foreign = "Host.Color"
//! local = "Acme.RgbColor"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::Range;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;
use veneer_codegen::{GeneratorSettings, ReplacementEntry, ReplacementRegistry};
use veneer_types::{TargetSpec, TypeName};

/// Default configuration file name
pub const CONFIG_FILE: &str = "veneer.toml";

/// Errors that can occur while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Parsed veneer.toml
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct VeneerConfig {
    /// Type metadata JSON read by the oracle, relative to the configuration file
    pub metadata: PathBuf,

    /// Output directory, relative to the configuration file
    #[serde(default = "default_out_dir")]
    pub out_dir: PathBuf,

    #[serde(default)]
    pub generator: GeneratorSettings,

    #[serde(default, rename = "target")]
    pub targets: Vec<TargetSpec>,

    #[serde(default, rename = "replacement")]
    pub replacements: Vec<ReplacementEntry>,
}

fn default_out_dir() -> PathBuf {
    PathBuf::from("Generated")
}

impl VeneerConfig {
    /// Load and validate a configuration file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse and validate a configuration
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: VeneerConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the parts of the configuration the generator does not
    ///
    /// Per-target problems (unresolvable names, contradictory options) are
    /// left to the generator so that one bad target does not stop the others.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.targets.is_empty() {
            return Err(ConfigError::ValidationError(
                "at least one [[target]] is required".to_string(),
            ));
        }

        if !TypeName::is_valid(&self.generator.runtime_namespace) {
            return Err(ConfigError::ValidationError(format!(
                "Invalid runtime namespace: '{}'",
                self.generator.runtime_namespace
            )));
        }

        let mut foreign: HashMap<&str, &str> = HashMap::new();
        for entry in &self.replacements {
            for name in [&entry.foreign, &entry.local] {
                if !TypeName::is_valid(TypeName::split_nullable(name).0) {
                    return Err(ConfigError::ValidationError(format!(
                        "Invalid replacement type name: '{}'",
                        name
                    )));
                }
            }
            if TypeName::normalize(&entry.foreign) == TypeName::normalize(&entry.local) {
                return Err(ConfigError::ValidationError(format!(
                    "Type '{}' cannot replace itself",
                    entry.foreign
                )));
            }
            let local = TypeName::normalize(&entry.local);
            match foreign.get(TypeName::normalize(&entry.foreign)) {
                Some(first) if *first != local => warn!(
                    foreign = %entry.foreign,
                    kept = %first,
                    ignored = %entry.local,
                    "replacement registered twice; keeping the first"
                ),
                Some(_) => {}
                None => {
                    foreign.insert(TypeName::normalize(&entry.foreign), local);
                }
            }
        }

        Ok(())
    }

    /// Replacement registry holding every configured pair
    pub fn replacement_registry(&self) -> ReplacementRegistry {
        ReplacementRegistry::from_pairs(
            self.replacements
                .iter()
                .map(|e| (e.foreign.as_str(), e.local.as_str())),
        )
    }

    /// Metadata path resolved against the configuration directory
    pub fn metadata_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.metadata)
    }

    /// Output directory resolved against the configuration directory
    pub fn out_dir_path(&self, base_dir: &Path) -> PathBuf {
        base_dir.join(&self.out_dir)
    }
}

/// Byte range of a target's quoted name in the configuration source
pub fn target_span(source: &str, target: &str) -> Option<Range<usize>> {
    let quoted = format!("\"{}\"", target);
    source.match_indices(&quoted).find_map(|(start, _)| {
        let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
        let key = source[line_start..start].trim_start();
        key.starts_with("target")
            .then(|| start..start + quoted.len())
    })
}
