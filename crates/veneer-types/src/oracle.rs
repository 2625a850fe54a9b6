//! Type oracle
//!
//! The generator's only window onto the host type system. [`MetadataOracle`]
//! answers from a JSON description of the types involved, which is what the
//! command-line tool and the tests use.

use crate::error::TypeError;
use crate::member::MemberDescriptor;
use crate::ty::{TypeHandle, TypeKind, TypeName};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Read-only access to type metadata
pub trait TypeOracle {
    /// Resolve a possibly unqualified name against a list of imported namespaces
    fn resolve_type(&self, name: &str, imports: &[String]) -> Option<TypeHandle>;

    /// Members declared directly on a type, in declaration order
    fn get_members(&self, full_name: &str) -> Vec<MemberDescriptor>;

    /// Direct supertypes of a type: the base class first, then interfaces
    fn get_base_types(&self, full_name: &str) -> Vec<String>;
}

/// Description of one type in the metadata file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeMetadata {
    /// Fully-qualified name
    pub name: String,
    /// Class, interface or struct
    pub kind: TypeKind,
    /// Direct supertypes, base class first
    #[serde(default)]
    pub bases: Vec<String>,
    /// Declared members
    #[serde(default)]
    pub members: Vec<MemberDescriptor>,
}

impl TypeMetadata {
    /// An empty type description
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            bases: Vec::new(),
            members: Vec::new(),
        }
    }

    /// Same type with another supertype
    pub fn extends(mut self, base: impl Into<String>) -> Self {
        self.bases.push(base.into());
        self
    }

    /// Same type with another member
    pub fn member(mut self, member: impl Into<MemberDescriptor>) -> Self {
        self.members.push(member.into());
        self
    }
}

#[derive(Debug, Deserialize)]
struct MetadataFile {
    #[serde(default)]
    types: Vec<TypeMetadata>,
}

/// In-memory oracle built from [`TypeMetadata`] values
#[derive(Debug, Default)]
pub struct MetadataOracle {
    types: FxHashMap<String, TypeMetadata>,
}

impl MetadataOracle {
    /// Create an empty oracle
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an oracle from type descriptions
    pub fn from_types(types: impl IntoIterator<Item = TypeMetadata>) -> Result<Self, TypeError> {
        let mut oracle = Self::new();
        for ty in types {
            oracle.insert(ty)?;
        }
        Ok(oracle)
    }

    /// Parse `{ "types": [...] }` JSON
    pub fn from_json(json: &str) -> Result<Self, TypeError> {
        let file: MetadataFile = serde_json::from_str(json)?;
        Self::from_types(file.types)
    }

    /// Read and parse a metadata file
    pub fn from_file(path: &Path) -> Result<Self, TypeError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Add a type description
    pub fn insert(&mut self, ty: TypeMetadata) -> Result<(), TypeError> {
        if !TypeName::is_valid(&ty.name) {
            return Err(TypeError::InvalidName { name: ty.name });
        }
        let key = TypeName::normalize(&ty.name).to_string();
        if self.types.contains_key(&key) {
            return Err(TypeError::DuplicateType { name: key });
        }
        self.types.insert(key, ty);
        Ok(())
    }

    /// Number of described types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no types are described
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn lookup(&self, full_name: &str) -> Option<&TypeMetadata> {
        self.types.get(TypeName::normalize(full_name))
    }
}

impl TypeOracle for MetadataOracle {
    fn resolve_type(&self, name: &str, imports: &[String]) -> Option<TypeHandle> {
        let name = TypeName::normalize(name);
        let found = self.lookup(name).or_else(|| {
            imports
                .iter()
                .find_map(|ns| self.lookup(&TypeName::join(ns, name)))
        })?;
        Some(TypeHandle::new(found.name.clone(), found.kind))
    }

    fn get_members(&self, full_name: &str) -> Vec<MemberDescriptor> {
        self.lookup(full_name)
            .map(|t| t.members.clone())
            .unwrap_or_default()
    }

    fn get_base_types(&self, full_name: &str) -> Vec<String> {
        self.lookup(full_name)
            .map(|t| t.bases.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::PropertyMember;

    fn oracle() -> MetadataOracle {
        MetadataOracle::from_types([
            TypeMetadata::new("Acme.Widget", TypeKind::Class)
                .extends("System.Object")
                .member(PropertyMember::new("Name", "string")),
            TypeMetadata::new("System.Object", TypeKind::Class),
        ])
        .unwrap()
    }

    #[test]
    fn test_resolve_fully_qualified() {
        let handle = oracle().resolve_type("global::Acme.Widget", &[]).unwrap();
        assert_eq!(handle.full_name, "Acme.Widget");
        assert!(handle.is_class());
    }

    #[test]
    fn test_resolve_through_imports() {
        let imports = vec!["System".to_string(), "Acme".to_string()];
        let handle = oracle().resolve_type("Widget", &imports).unwrap();
        assert_eq!(handle.full_name, "Acme.Widget");
    }

    #[test]
    fn test_resolve_unknown() {
        assert!(oracle().resolve_type("Acme.Gadget", &[]).is_none());
        assert!(oracle().get_members("Acme.Gadget").is_empty());
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let result = MetadataOracle::from_types([
            TypeMetadata::new("Acme.Widget", TypeKind::Class),
            TypeMetadata::new("global::Acme.Widget", TypeKind::Class),
        ]);
        assert!(matches!(result, Err(TypeError::DuplicateType { .. })));
    }

    #[test]
    fn test_invalid_name_rejected() {
        let result = MetadataOracle::from_types([TypeMetadata::new("Acme..Widget", TypeKind::Class)]);
        assert!(matches!(result, Err(TypeError::InvalidName { .. })));
    }
}
