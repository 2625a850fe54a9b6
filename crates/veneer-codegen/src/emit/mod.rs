//! Text emission
//!
//! Shared plumbing for the three synthesizers: an indenting line writer, the
//! file preamble, identifier sanitizing and parameter lists.

pub mod abstraction;
pub mod proxy;
pub mod registry;

pub use abstraction::AbstractionSynthesizer;
pub use proxy::ProxySynthesizer;
pub use registry::{RegistryEmitter, RegistryTriple};

use rustc_hash::{FxHashMap, FxHashSet};
use veneer_types::{MethodMember, Parameter, ParameterKind, TypeName};

use crate::error::GenerateError;
use crate::replacement::{ReplacementRegistry, Translated};
use crate::settings::GeneratorSettings;

const INDENT: &str = "    ";

/// Emitted text plus the warnings raised while producing it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Emitted {
    pub text: String,
    pub warnings: Vec<GenerateError>,
}

/// Line-oriented writer with brace-aware indentation
///
/// Blank lines are deferred so that a block never ends with one.
#[derive(Debug, Default)]
pub struct CodeWriter {
    out: String,
    level: usize,
    pending_blank: bool,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&mut self, text: impl AsRef<str>) {
        if self.pending_blank {
            self.out.push('\n');
            self.pending_blank = false;
        }
        let text = text.as_ref();
        if !text.is_empty() {
            for _ in 0..self.level {
                self.out.push_str(INDENT);
            }
            self.out.push_str(text);
        }
        self.out.push('\n');
    }

    pub fn blank(&mut self) {
        if !self.out.is_empty() {
            self.pending_blank = true;
        }
    }

    /// Write a header line followed by `{`, then indent
    pub fn open(&mut self, header: impl AsRef<str>) {
        self.line(header);
        self.line("{");
        self.level += 1;
    }

    /// Dedent and write `}`
    pub fn close(&mut self) {
        self.pending_blank = false;
        self.level = self.level.saturating_sub(1);
        self.line("}");
    }

    pub fn finish(self) -> String {
        self.out
    }
}

/// Auto-generated banner, nullable context, `using` and namespace opening
pub(crate) fn write_preamble(w: &mut CodeWriter, settings: &GeneratorSettings, namespace: &str) {
    w.line("//----------------------------------------------------------------------------------------");
    w.line("// <auto-generated>");
    w.line(format!("//     This code was generated by {}.", settings.generator_name));
    w.line("//");
    w.line("//     Changes to this file may cause incorrect behavior and will be lost if");
    w.line("//     the code is regenerated.");
    w.line("// </auto-generated>");
    w.line("//----------------------------------------------------------------------------------------");
    w.blank();
    if settings.supports_nullable {
        w.line("#nullable enable");
    }
    w.line("using System;");
    w.blank();
    if !namespace.is_empty() {
        w.open(format!("namespace {}", namespace));
    }
}

/// Namespace closing and nullable restore
pub(crate) fn write_epilogue(w: &mut CodeWriter, settings: &GeneratorSettings, namespace: &str) {
    if !namespace.is_empty() {
        w.close();
    }
    if settings.supports_nullable {
        w.line("#nullable restore");
    }
}

const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

/// Prefix reserved words with `@`
pub fn sanitize_identifier(name: &str) -> String {
    if KEYWORDS.contains(&name) {
        format!("@{}", name)
    } else {
        name.to_string()
    }
}

/// `ref int count = 0` style declaration of one parameter
pub(crate) fn declare_parameter(param: &Parameter, ty: &str) -> String {
    let mut decl = format!(
        "{}{} {}",
        param.kind.declaration_prefix(),
        ty,
        sanitize_identifier(&param.name)
    );
    if let Some(default) = &param.default {
        decl.push_str(" = ");
        decl.push_str(default);
    }
    decl
}

/// ` where T : class, new()` clauses of a generic method
pub(crate) fn where_clause(method: &MethodMember) -> String {
    let mut clause = String::new();
    for param in method.type_params.iter().filter(|p| !p.constraints.is_empty()) {
        clause.push_str(&format!(" where {} : {}", param.name, param.constraints.join(", ")));
    }
    clause
}

/// Run-wide state the synthesizers consult
pub struct EmitContext<'a> {
    pub settings: &'a GeneratorSettings,
    pub replacements: &'a ReplacementRegistry,
    /// Targets generated in this run, with the members each one ignores
    run_targets: FxHashMap<String, FxHashSet<String>>,
}

impl<'a> EmitContext<'a> {
    pub fn new<'t>(
        settings: &'a GeneratorSettings,
        replacements: &'a ReplacementRegistry,
        targets: impl IntoIterator<Item = &'t str>,
    ) -> Self {
        Self {
            settings,
            replacements,
            run_targets: targets
                .into_iter()
                .map(|t| (TypeName::normalize(t).to_string(), FxHashSet::default()))
                .collect(),
        }
    }

    /// Record members a run target's proxy leaves out
    pub fn ignore_members<'m>(&mut self, target: &str, members: impl IntoIterator<Item = &'m String>) {
        if let Some(ignored) = self.run_targets.get_mut(TypeName::normalize(target)) {
            ignored.extend(members.into_iter().cloned());
        }
    }

    /// Whether a run target's proxy declares a member of this name
    pub fn proxy_declares(&self, target: &str, member: &str) -> bool {
        self.run_targets
            .get(TypeName::normalize(target))
            .is_some_and(|ignored| !ignored.contains(member))
    }

    /// Translate a member type, recording a gap warning when one is found
    pub fn translate(
        &self,
        ty: &str,
        target: &str,
        member: &str,
        warnings: &mut Vec<GenerateError>,
    ) -> Translated {
        let translated = self.replacements.translate(ty);
        if !translated.replaced && self.replacements.is_gap(ty) {
            let gap = GenerateError::TranslationGap {
                target: target.to_string(),
                member: member.to_string(),
                ty: ty.to_string(),
            };
            if !warnings.contains(&gap) {
                warnings.push(gap);
            }
        }
        translated
    }

    /// `global::Veneer.Adapter.Adapt<T>(expr)`
    pub fn adapt(&self, ty: &str, expr: &str) -> String {
        format!("{}<{}>({})", self.settings.adapter_call(), ty, expr)
    }
}

/// Whether a parameter's value crosses the boundary through a temporary
pub(crate) fn uses_temporary(kind: ParameterKind) -> bool {
    kind != ParameterKind::Ref
}
