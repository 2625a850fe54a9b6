//! Diagnostic reporting for generation problems
//!
//! Generation errors are collected per target and rendered with
//! codespan-reporting. When the configuration source is available, the
//! offending target entry is labelled in it.

use codespan_reporting::diagnostic::{Diagnostic as CsDiagnostic, Label, Severity};
use codespan_reporting::files::SimpleFiles;
use codespan_reporting::term;
use codespan_reporting::term::termcolor::{ColorChoice, StandardStream, WriteColor};
use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::GenerateError;

/// Error code for a diagnostic
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorCode(pub &'static str);

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        self.0
    }
}

/// A rendered-ready diagnostic
#[derive(Debug, Clone)]
pub struct Diagnostic {
    inner: CsDiagnostic<usize>,
    code: Option<ErrorCode>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            inner: CsDiagnostic::new(severity).with_message(message),
            code: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn with_code(mut self, code: ErrorCode) -> Self {
        self.inner = self.inner.with_code(code.0);
        self.code = Some(code);
        self
    }

    /// Label a byte range of a configuration file
    pub fn with_primary_label(
        mut self,
        file_id: usize,
        range: Range<usize>,
        message: impl Into<String>,
    ) -> Self {
        self.inner
            .labels
            .push(Label::primary(file_id, range).with_message(message));
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.inner.notes.push(note.into());
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.inner.notes.push(format!("help: {}", help.into()));
        self
    }

    /// Build a diagnostic from a generation error
    pub fn from_generate_error(error: &GenerateError) -> Self {
        use GenerateError::*;

        let diag = match error {
            Resolution { target, name } => {
                let diag = Diagnostic::error(error.to_string())
                    .with_note(format!("no code was generated for '{}'", target));
                if name == target {
                    diag.with_help("check the target name and its imports")
                } else {
                    diag.with_help(format!("add '{}' to the type metadata", name))
                }
            }
            Configuration { target, .. } => Diagnostic::error(error.to_string())
                .with_note(format!("no code was generated for '{}'", target)),
            TranslationGap { ty, .. } => Diagnostic::warning(error.to_string())
                .with_help(format!("register a replacement for '{}'", ty)),
            UnknownOperator { .. } => Diagnostic::warning(error.to_string()),
        };

        diag.with_code(error_code(error))
    }

    pub fn severity(&self) -> Severity {
        self.inner.severity
    }

    pub fn code(&self) -> Option<&ErrorCode> {
        self.code.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.inner.message
    }

    pub fn inner(&self) -> &CsDiagnostic<usize> {
        &self.inner
    }

    /// Emit to stderr
    pub fn emit(
        &self,
        files: &SimpleFiles<String, String>,
        color: ColorChoice,
    ) -> Result<(), codespan_reporting::files::Error> {
        let mut writer = StandardStream::stderr(color);
        self.emit_to(&mut writer, files)
    }

    /// Emit to any colour-aware writer
    pub fn emit_to(
        &self,
        writer: &mut dyn WriteColor,
        files: &SimpleFiles<String, String>,
    ) -> Result<(), codespan_reporting::files::Error> {
        let config = term::Config::default();
        term::emit(writer, &config, files, &self.inner)
    }

    /// JSON form for editor integration
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&JsonDiagnostic::from(self))
    }
}

/// JSON representation of a diagnostic
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonDiagnostic {
    pub code: Option<String>,
    pub severity: String,
    pub message: String,
    pub notes: Vec<String>,
}

impl From<&Diagnostic> for JsonDiagnostic {
    fn from(diag: &Diagnostic) -> Self {
        let severity = match diag.inner.severity {
            Severity::Bug => "bug",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Note => "note",
            Severity::Help => "help",
        };
        JsonDiagnostic {
            code: diag.code.as_ref().map(|c| c.0.to_string()),
            severity: severity.to_string(),
            message: diag.inner.message.clone(),
            notes: diag.inner.notes.clone(),
        }
    }
}

pub fn error_code(error: &GenerateError) -> ErrorCode {
    use GenerateError::*;

    match error {
        Resolution { .. } => ErrorCode("VG0001"),
        Configuration { .. } => ErrorCode("VG0002"),
        TranslationGap { .. } => ErrorCode("VG0003"),
        UnknownOperator { .. } => ErrorCode("VG0004"),
    }
}

/// Create a `SimpleFiles` holding one configuration source
pub fn create_files(name: impl Into<String>, source: impl Into<String>) -> SimpleFiles<String, String> {
    let mut files = SimpleFiles::new();
    files.add(name.into(), source.into());
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use codespan_reporting::term::termcolor::NoColor;

    #[test]
    fn test_resolution_is_error() {
        let err = GenerateError::Resolution {
            target: "Acme.Widget".into(),
            name: "Acme.Base".into(),
        };
        let diag = Diagnostic::from_generate_error(&err);
        assert_eq!(diag.severity(), Severity::Error);
        assert_eq!(diag.code(), Some(&ErrorCode("VG0001")));
        assert!(diag.inner().notes.iter().any(|n| n.contains("Acme.Base")));
    }

    #[test]
    fn test_translation_gap_is_warning() {
        let err = GenerateError::TranslationGap {
            target: "Acme.Widget".into(),
            member: "Tint".into(),
            ty: "Host.Color".into(),
        };
        let diag = Diagnostic::from_generate_error(&err);
        assert_eq!(diag.severity(), Severity::Warning);
        assert_eq!(diag.code().map(ErrorCode::as_str), Some("VG0003"));
    }

    #[test]
    fn test_emit_with_label() {
        let source = "[[target]]\ntarget = \"Acme.Widget\"\n";
        let files = create_files("veneer.toml", source);
        let start = source.find("\"Acme.Widget\"").unwrap();
        let diag = Diagnostic::error("Cannot resolve type")
            .with_code(ErrorCode("VG0001"))
            .with_primary_label(0, start..start + 13, "declared here");

        let mut out = NoColor::new(Vec::new());
        diag.emit_to(&mut out, &files).unwrap();
        let rendered = String::from_utf8(out.into_inner()).unwrap();
        assert!(rendered.contains("VG0001"));
        assert!(rendered.contains("declared here"));
    }

    #[test]
    fn test_to_json() {
        let diag = Diagnostic::warning("careful").with_code(ErrorCode("VG0004"));
        let json = diag.to_json().unwrap();
        assert!(json.contains("\"severity\": \"warning\""));
        assert!(json.contains("VG0004"));
    }
}
