//! `veneer generate`: write descriptors, proxies and the registry.

use anyhow::Context;
use std::path::PathBuf;
use tracing::{debug, info};

use super::{CommandOptions, Project, Summary};
use crate::output::StyledOutput;

pub fn execute(options: &CommandOptions, out_dir: Option<PathBuf>) -> anyhow::Result<Summary> {
    let project = Project::load(&options.config)?;
    let output = project.generate(options)?;

    let out_dir = out_dir.unwrap_or_else(|| project.config.out_dir_path(&project.base_dir));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let mut written = 0;
    for file in &output.files {
        let path = out_dir.join(&file.name);
        if std::fs::read_to_string(&path).is_ok_and(|existing| existing == file.contents) {
            debug!(path = %path.display(), "unchanged");
            continue;
        }
        std::fs::write(&path, &file.contents)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        written += 1;
    }

    let summary = Summary::from_output(&output, written);
    info!(
        targets = summary.targets,
        written,
        out_dir = %out_dir.display(),
        "generate finished"
    );

    let mut out = StyledOutput::new(options.color);
    let detail = format!(
        "{} target(s), {} of {} file(s) written to {}",
        summary.targets,
        written,
        output.files.len(),
        out_dir.display()
    );
    if summary.is_success() {
        out.success("Generated", &detail);
    } else {
        out.error("Failed", &format!("{} error(s); {}", summary.errors, detail));
    }
    if summary.warnings > 0 {
        out.warning("Warnings", &summary.warnings.to_string());
    }
    out.flush();

    Ok(summary)
}
