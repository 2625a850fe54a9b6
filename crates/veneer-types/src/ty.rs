//! Type handles and type-name helpers

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix used for fully-qualified references in emitted code
pub const GLOBAL_PREFIX: &str = "global::";

/// Kind of a resolved type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// A class (may have a base class)
    Class,
    /// An interface
    Interface,
    /// A value type
    Struct,
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeKind::Class => write!(f, "class"),
            TypeKind::Interface => write!(f, "interface"),
            TypeKind::Struct => write!(f, "struct"),
        }
    }
}

/// A type the oracle was able to resolve
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeHandle {
    /// Fully-qualified name, without the `global::` prefix
    pub full_name: String,
    /// Kind of the type
    pub kind: TypeKind,
}

impl TypeHandle {
    /// Create a new handle
    pub fn new(full_name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            full_name: TypeName::normalize(&full_name.into()).to_string(),
            kind,
        }
    }

    /// Whether this handle refers to a class
    pub fn is_class(&self) -> bool {
        self.kind == TypeKind::Class
    }

    /// Whether this handle refers to an interface
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }
}

/// Helpers for dotted, possibly generic, type names
pub struct TypeName;

impl TypeName {
    /// Strip a leading `global::` qualifier
    pub fn normalize(name: &str) -> &str {
        name.trim().strip_prefix(GLOBAL_PREFIX).unwrap_or(name.trim())
    }

    /// Last dotted segment of a name, ignoring generic arguments
    ///
    /// `Acme.Shapes.Widget` becomes `Widget`, `Acme.Box<Acme.Item>` becomes `Box`.
    pub fn short_name(name: &str) -> &str {
        let name = Self::normalize(name);
        let head = Self::without_type_args(name);
        match head.rfind('.') {
            Some(idx) => &head[idx + 1..],
            None => head,
        }
    }

    /// Everything before the last dotted segment, or an empty string
    pub fn namespace_of(name: &str) -> &str {
        let name = Self::normalize(name);
        let head = Self::without_type_args(name);
        match head.rfind('.') {
            Some(idx) => &head[..idx],
            None => "",
        }
    }

    /// Name with any `<...>` argument list removed
    pub fn without_type_args(name: &str) -> &str {
        match name.find('<') {
            Some(idx) => &name[..idx],
            None => name,
        }
    }

    /// Join a namespace and a simple name
    pub fn join(namespace: &str, name: &str) -> String {
        if namespace.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", namespace, name)
        }
    }

    /// Fully-qualified reference for emitted code (`global::Acme.Widget`)
    pub fn qualified(name: &str) -> String {
        let name = Self::normalize(name);
        if Self::is_keyword_type(name) {
            name.to_string()
        } else {
            format!("{}{}", GLOBAL_PREFIX, name)
        }
    }

    /// Split a trailing nullable marker: `Color?` becomes (`Color`, true)
    pub fn split_nullable(name: &str) -> (&str, bool) {
        match name.strip_suffix('?') {
            Some(inner) => (inner, true),
            None => (name, false),
        }
    }

    /// Whether the name is a built-in keyword type such as `string` or `int`
    pub fn is_keyword_type(name: &str) -> bool {
        matches!(
            Self::split_nullable(name).0,
            "void"
                | "object"
                | "string"
                | "bool"
                | "byte"
                | "sbyte"
                | "char"
                | "decimal"
                | "double"
                | "float"
                | "int"
                | "uint"
                | "long"
                | "ulong"
                | "short"
                | "ushort"
                | "nint"
                | "nuint"
                | "dynamic"
        )
    }

    /// Reject names the emitter could never write
    pub fn is_valid(name: &str) -> bool {
        let name = Self::normalize(name);
        !name.is_empty()
            && !name.starts_with('.')
            && !name.ends_with('.')
            && !name.contains("..")
            && !name.chars().any(char::is_whitespace)
    }
}
