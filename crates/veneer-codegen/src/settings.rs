//! Run-wide generator settings

use serde::{Deserialize, Serialize};

/// Settings shared by every target of one generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GeneratorSettings {
    /// Wrap emitted files in `#nullable enable` / `#nullable restore`
    pub supports_nullable: bool,
    /// Namespace of the emitted registry and adapter
    pub runtime_namespace: String,
    /// Object-mapping call behind the emitted null-safe adapter
    pub object_mapper: String,
    /// Ancestor classes where base-class walking stops
    pub root_types: Vec<String>,
    /// Tool name written into the auto-generated banner
    pub generator_name: String,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            supports_nullable: true,
            runtime_namespace: "Veneer".to_string(),
            object_mapper: "global::Mapster.TypeAdapter.Adapt".to_string(),
            root_types: vec!["System.Object".to_string(), "object".to_string()],
            generator_name: "veneer".to_string(),
        }
    }
}

impl GeneratorSettings {
    /// Whether a type name is one of the configured roots
    pub fn is_root(&self, name: &str) -> bool {
        let name = veneer_types::TypeName::normalize(name);
        self.root_types.iter().any(|r| r == name)
    }

    /// Fully-qualified adapter entry point used in emitted forwarding code
    pub fn adapter_call(&self) -> String {
        format!("global::{}.Adapter.Adapt", self.runtime_namespace)
    }

    /// Name of the emitted registry file
    pub fn registry_file_name(&self) -> String {
        format!("{}.Extra.g.cs", self.runtime_namespace)
    }
}
