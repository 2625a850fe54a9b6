//! Target configuration
//!
//! A [`TargetSpec`] names one type to wrap and how to wrap it. Specs are
//! supplied up front by the caller and never change during generation.

use crate::ty::TypeName;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Accessibility of the emitted descriptor and proxy declarations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProxyAccessibility {
    /// `public`
    #[default]
    Public,
    /// `internal`
    Internal,
}

impl ProxyAccessibility {
    /// Keyword written in emitted declarations
    pub fn keyword(self) -> &'static str {
        match self {
            ProxyAccessibility::Public => "public",
            ProxyAccessibility::Internal => "internal",
        }
    }
}

/// Generation switches for one target
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ImplementationOptions {
    /// Also surface members declared on ancestor classes
    pub proxy_base_classes: bool,
    /// List implemented interfaces as super-capabilities of the descriptor
    pub proxy_interfaces: bool,
    /// Compose the parent target's descriptor instead of redeclaring its members
    pub use_extended_interfaces: bool,
    /// Surface members of implemented interfaces on the proxy itself
    pub proxy_for_base_interface: bool,
    /// Declare static members in the descriptor as `static abstract`
    pub expose_statics: bool,
}

/// One configured target type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct TargetSpec {
    /// Fully-qualified name of the type to wrap
    pub target: String,
    /// Descriptor name; defaults to `I{ShortName}`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interface_name: Option<String>,
    /// Namespace for emitted declarations; defaults to the target's namespace
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Namespaces consulted when resolving names
    #[serde(default)]
    pub imports: Vec<String>,
    /// Generation switches
    #[serde(default)]
    pub options: ImplementationOptions,
    /// Member names never surfaced
    #[serde(default)]
    pub members_to_ignore: BTreeSet<String>,
    /// Accessibility of emitted declarations
    #[serde(default)]
    pub accessibility: ProxyAccessibility,
    /// Explicit parent target; inferred from the class hierarchy when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_proxy: Option<String>,
}

impl TargetSpec {
    /// A spec with default options
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            interface_name: None,
            namespace: None,
            imports: Vec::new(),
            options: ImplementationOptions::default(),
            members_to_ignore: BTreeSet::new(),
            accessibility: ProxyAccessibility::Public,
            base_proxy: None,
        }
    }

    /// Replace the generation switches
    pub fn with_options(mut self, options: ImplementationOptions) -> Self {
        self.options = options;
        self
    }

    /// Override the descriptor name
    pub fn with_interface_name(mut self, name: impl Into<String>) -> Self {
        self.interface_name = Some(name.into());
        self
    }

    /// Add names to the ignore list
    pub fn ignoring<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.members_to_ignore.extend(names.into_iter().map(Into::into));
        self
    }

    /// Declare the parent target explicitly
    pub fn with_base_proxy(mut self, parent: impl Into<String>) -> Self {
        self.base_proxy = Some(parent.into());
        self
    }

    /// Target name without `global::`
    pub fn target_name(&self) -> &str {
        TypeName::normalize(&self.target)
    }

    /// Last segment of the target name
    pub fn short_name(&self) -> &str {
        TypeName::short_name(&self.target)
    }

    /// Namespace the descriptor and proxy are emitted into
    pub fn namespace(&self) -> String {
        match &self.namespace {
            Some(ns) => ns.clone(),
            None => TypeName::namespace_of(&self.target).to_string(),
        }
    }

    /// Simple name of the descriptor
    pub fn descriptor_name(&self) -> String {
        match &self.interface_name {
            Some(name) => TypeName::short_name(name).to_string(),
            None => format!("I{}", self.short_name()),
        }
    }

    /// Fully-qualified name of the descriptor
    pub fn descriptor_full_name(&self) -> String {
        TypeName::join(&self.namespace(), &self.descriptor_name())
    }

    /// Simple name of the proxy class
    pub fn proxy_name(&self) -> String {
        format!("{}Proxy", self.short_name())
    }

    /// Fully-qualified name of the proxy class
    pub fn proxy_full_name(&self) -> String {
        TypeName::join(&self.namespace(), &self.proxy_name())
    }

    /// Whether a member name is on the ignore list
    pub fn ignores(&self, member: &str) -> bool {
        self.members_to_ignore.contains(member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let spec = TargetSpec::new("Acme.Shapes.Widget");
        assert_eq!(spec.descriptor_name(), "IWidget");
        assert_eq!(spec.descriptor_full_name(), "Acme.Shapes.IWidget");
        assert_eq!(spec.proxy_full_name(), "Acme.Shapes.WidgetProxy");
    }

    #[test]
    fn test_explicit_names() {
        let mut spec = TargetSpec::new("global::Acme.Widget").with_interface_name("IWidgetFacade");
        spec.namespace = Some("Acme.Facades".to_string());
        assert_eq!(spec.target_name(), "Acme.Widget");
        assert_eq!(spec.descriptor_full_name(), "Acme.Facades.IWidgetFacade");
        assert_eq!(spec.proxy_full_name(), "Acme.Facades.WidgetProxy");
    }

    #[test]
    fn test_ignoring() {
        let spec = TargetSpec::new("Acme.Widget").ignoring(["Dispose", "ToString"]);
        assert!(spec.ignores("Dispose"));
        assert!(!spec.ignores("Name"));
    }
}
