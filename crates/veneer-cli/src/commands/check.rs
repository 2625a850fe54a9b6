//! `veneer check`: resolve every target and report without writing.

use super::{CommandOptions, Project, Summary};
use crate::output::StyledOutput;

pub fn execute(options: &CommandOptions) -> anyhow::Result<Summary> {
    let project = Project::load(&options.config)?;
    let output = project.generate(options)?;

    let mut out = StyledOutput::new(options.color);
    for triple in &output.triples {
        out.success(
            "Ok",
            &format!("{} -> {}, {}", triple.target, triple.abstraction, triple.wrapper),
        );
    }
    for error in output.errors() {
        out.error("Skipped", error.target());
    }
    out.flush();

    Ok(Summary::from_output(&output, 0))
}
