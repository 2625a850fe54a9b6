//! CLI command implementations.

pub mod check;
pub mod generate;

use anyhow::Context;
use std::path::{Path, PathBuf};
use termcolor::ColorChoice;
use tracing::debug;
use veneer_codegen::{GenerationOutput, Generator};
use veneer_types::MetadataOracle;

use crate::config::VeneerConfig;
use crate::output::{report_diagnostics, OutputFormat};

/// Options shared by every command
#[derive(Debug, Clone)]
pub struct CommandOptions {
    /// Path to veneer.toml
    pub config: PathBuf,
    pub format: OutputFormat,
    pub color: ColorChoice,
}

/// A loaded configuration with its metadata
pub(crate) struct Project {
    pub config: VeneerConfig,
    pub source: String,
    pub base_dir: PathBuf,
    pub oracle: MetadataOracle,
}

impl Project {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = VeneerConfig::from_str(&source)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        let base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();

        let metadata = config.metadata_path(&base_dir);
        let oracle = MetadataOracle::from_file(&metadata)
            .with_context(|| format!("Failed to load type metadata from {}", metadata.display()))?;
        debug!(types = oracle.len(), path = %metadata.display(), "loaded type metadata");

        Ok(Self {
            config,
            source,
            base_dir,
            oracle,
        })
    }

    /// Run the generator and report its diagnostics
    pub fn generate(&self, options: &CommandOptions) -> anyhow::Result<GenerationOutput> {
        let replacements = self.config.replacement_registry();
        let output = Generator::new(&self.oracle, &self.config.generator, &replacements)
            .generate(&self.config.targets);

        let config_name = options.config.display().to_string();
        report_diagnostics(
            &output.diagnostics,
            &config_name,
            &self.source,
            options.format,
            options.color,
        )?;
        Ok(output)
    }
}

/// Outcome of a command, used for the exit code
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub targets: usize,
    pub files: usize,
    pub errors: usize,
    pub warnings: usize,
}

impl Summary {
    pub(crate) fn from_output(output: &GenerationOutput, files: usize) -> Self {
        Self {
            targets: output.triples.len(),
            files,
            errors: output.errors().count(),
            warnings: output.warnings().count(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.errors == 0
    }
}
