//! Colored terminal output and diagnostic reporting.
//!
//! Uses `termcolor` for cross-platform colored terminal output.
//! Respects `NO_COLOR` environment variable and `--color` flag.

use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};
use veneer_codegen::diagnostic::create_files;
use veneer_codegen::{Diagnostic, GenerateError};

use crate::config::target_span;

/// Resolve `ColorChoice` from CLI flag and environment.
///
/// Priority: `NO_COLOR` env > `--color` flag > auto-detect TTY.
pub fn resolve_color_choice(flag: Option<&str>) -> ColorChoice {
    if std::env::var_os("NO_COLOR").is_some() {
        return ColorChoice::Never;
    }
    match flag {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}

/// How diagnostics are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Rendered with source labels
    Pretty,
    /// One JSON object per diagnostic
    Json,
}

/// Styled status lines on stdout.
pub struct StyledOutput {
    stdout: StandardStream,
}

impl StyledOutput {
    pub fn new(choice: ColorChoice) -> Self {
        Self {
            stdout: StandardStream::stdout(choice),
        }
    }

    fn write_styled(&mut self, text: &str, color: Option<Color>, bold: bool) {
        let mut spec = ColorSpec::new();
        spec.set_fg(color).set_bold(bold);
        let _ = self.stdout.set_color(&spec);
        let _ = write!(self.stdout, "{}", text);
        let _ = self.stdout.reset();
    }

    /// `  label  detail` with a colored, right-aligned label.
    pub fn status(&mut self, label: &str, color: Color, detail: &str) {
        self.write_styled(&format!("{:>12}", label), Some(color), true);
        let _ = writeln!(self.stdout, " {}", detail);
    }

    pub fn success(&mut self, label: &str, detail: &str) {
        self.status(label, Color::Green, detail);
    }

    pub fn warning(&mut self, label: &str, detail: &str) {
        self.status(label, Color::Yellow, detail);
    }

    pub fn error(&mut self, label: &str, detail: &str) {
        self.status(label, Color::Red, detail);
    }

    pub fn flush(&mut self) {
        let _ = self.stdout.flush();
    }
}

/// Print generation diagnostics to stderr
///
/// In pretty mode each diagnostic is labelled at its target's entry in the
/// configuration source when that entry can be found.
pub fn report_diagnostics(
    errors: &[GenerateError],
    config_name: &str,
    config_source: &str,
    format: OutputFormat,
    choice: ColorChoice,
) -> anyhow::Result<()> {
    let files = create_files(config_name, config_source);
    let mut stderr = StandardStream::stderr(choice);

    for error in errors {
        let mut diag = Diagnostic::from_generate_error(error);
        match format {
            OutputFormat::Json => {
                writeln!(stderr, "{}", diag.to_json()?)?;
            }
            OutputFormat::Pretty => {
                if let Some(span) = target_span(config_source, error.target()) {
                    diag = diag.with_primary_label(0, span, "configured here");
                }
                diag.emit_to(&mut stderr, &files)?;
            }
        }
    }
    Ok(())
}
