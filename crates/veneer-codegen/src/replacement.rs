//! Replacement registry
//!
//! Maps foreign member types to local surrogates. Emitted signatures use the
//! surrogate; forwarding code crosses the boundary through the adapter in both
//! directions.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use veneer_types::TypeName;

/// One foreign → local substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementEntry {
    pub foreign: String,
    pub local: String,
}

/// Result of passing a type through the registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translated {
    /// Type to write in the emitted signature
    pub ty: String,
    /// Whether the boundary needs an adapter call
    pub replaced: bool,
}

/// Foreign → local type substitutions, populated before emission
#[derive(Debug, Clone, Default)]
pub struct ReplacementRegistry {
    entries: Vec<ReplacementEntry>,
    by_foreign: FxHashMap<String, usize>,
    by_local: FxHashMap<String, usize>,
    foreign_namespaces: FxHashSet<String>,
}

impl ReplacementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from configured pairs; later duplicates are ignored
    pub fn from_pairs<I, F, L>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (F, L)>,
        F: AsRef<str>,
        L: AsRef<str>,
    {
        let mut registry = Self::new();
        for (foreign, local) in pairs {
            registry.register(foreign.as_ref(), local.as_ref());
        }
        registry
    }

    /// Register a substitution. Returns `false` if `foreign` was already registered.
    ///
    /// The foreign type's namespace is remembered so that other types from it
    /// can be reported as translation gaps.
    pub fn register(&mut self, foreign: &str, local: &str) -> bool {
        if !self.insert(foreign, local) {
            return false;
        }
        let ns = TypeName::namespace_of(foreign);
        if !ns.is_empty() {
            self.foreign_namespaces.insert(ns.to_string());
        }
        true
    }

    /// Register a proxied target so members typed with it surface as its descriptor
    pub fn register_target(&mut self, target: &str, descriptor: &str) -> bool {
        self.insert(target, &TypeName::qualified(descriptor))
    }

    fn insert(&mut self, foreign: &str, local: &str) -> bool {
        let key = Self::key(foreign);
        if self.by_foreign.contains_key(&key) {
            return false;
        }
        let idx = self.entries.len();
        self.entries.push(ReplacementEntry {
            foreign: foreign.trim().to_string(),
            local: local.trim().to_string(),
        });
        self.by_foreign.insert(key, idx);
        self.by_local.entry(Self::key(local)).or_insert(idx);
        true
    }

    fn key(ty: &str) -> String {
        let (inner, _) = TypeName::split_nullable(ty.trim());
        TypeName::normalize(inner).to_string()
    }

    /// Local surrogate for a type, keeping a nullable marker
    pub fn lookup(&self, ty: &str) -> Option<String> {
        let (_, nullable) = TypeName::split_nullable(ty.trim());
        let entry = &self.entries[*self.by_foreign.get(&Self::key(ty))?];
        if nullable && !entry.local.ends_with('?') {
            Some(format!("{}?", entry.local))
        } else {
            Some(entry.local.clone())
        }
    }

    pub fn is_replaced(&self, ty: &str) -> bool {
        self.by_foreign.contains_key(&Self::key(ty))
    }

    /// Foreign type a surrogate stands for
    pub fn foreign_of(&self, local: &str) -> Option<&str> {
        self.by_local
            .get(&Self::key(local))
            .map(|&idx| self.entries[idx].foreign.as_str())
    }

    /// Pass a type through the registry
    pub fn translate(&self, ty: &str) -> Translated {
        match self.lookup(ty) {
            Some(local) => Translated {
                ty: local,
                replaced: true,
            },
            None => Translated {
                ty: ty.to_string(),
                replaced: false,
            },
        }
    }

    /// Whether a type comes from a foreign namespace but has no surrogate
    pub fn is_gap(&self, ty: &str) -> bool {
        if self.is_replaced(ty) {
            return false;
        }
        let key = Self::key(ty);
        if TypeName::is_keyword_type(&key) {
            return false;
        }
        self.foreign_namespaces
            .contains(TypeName::namespace_of(&key))
    }

    pub fn entries(&self) -> &[ReplacementEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
