//! Member descriptors
//!
//! One [`MemberDescriptor`] per public-surface member of a type: properties
//! (including indexers), methods, events and operators. Descriptors are plain
//! immutable data; the generator only pattern-matches over them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared accessibility of a member or accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accessibility {
    /// Visible everywhere
    #[default]
    Public,
    /// Visible inside the declaring assembly
    Internal,
    /// Visible to derived types
    Protected,
    /// `protected internal`
    ProtectedInternal,
    /// Visible only inside the declaring type
    Private,
}

impl Accessibility {
    /// Whether this accessibility is `public`
    pub fn is_public(self) -> bool {
        self == Accessibility::Public
    }
}

/// How a parameter is passed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// By value
    #[default]
    Value,
    /// `ref`
    Ref,
    /// `out`
    Out,
    /// `in` (readonly reference)
    In,
    /// `params` array
    Params,
}

impl ParameterKind {
    /// Keyword written before the parameter type in a declaration
    pub fn declaration_prefix(self) -> &'static str {
        match self {
            ParameterKind::Value => "",
            ParameterKind::Ref => "ref ",
            ParameterKind::Out => "out ",
            ParameterKind::In => "in ",
            ParameterKind::Params => "params ",
        }
    }

    /// Keyword written before the argument at a call site
    pub fn argument_prefix(self) -> &'static str {
        match self {
            ParameterKind::Ref => "ref ",
            ParameterKind::Out => "out ",
            ParameterKind::In => "in ",
            ParameterKind::Value | ParameterKind::Params => "",
        }
    }
}

/// A method, indexer or operator parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    /// Parameter name
    pub name: String,
    /// Parameter type as written
    #[serde(rename = "type")]
    pub ty: String,
    /// Passing mode
    #[serde(default)]
    pub kind: ParameterKind,
    /// Default value expression, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl Parameter {
    /// A by-value parameter
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            kind: ParameterKind::Value,
            default: None,
        }
    }

    /// Same parameter with another passing mode
    pub fn with_kind(mut self, kind: ParameterKind) -> Self {
        self.kind = kind;
        self
    }

    /// Same parameter with a default value
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A generic type parameter of a method
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenericParam {
    /// Parameter name (`T`)
    pub name: String,
    /// Constraint clauses (`class`, `new()`, `global::System.IDisposable`)
    #[serde(default)]
    pub constraints: Vec<String>,
}

impl GenericParam {
    /// An unconstrained type parameter
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
        }
    }
}

/// Inheritance-related flags of a member
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    /// `static`
    pub is_static: bool,
    /// `virtual`
    pub is_virtual: bool,
    /// `override`
    pub is_override: bool,
    /// `abstract`
    pub is_abstract: bool,
    /// Declaring type of the member this one overrides
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overridden_from: Option<String>,
}

/// A property or indexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyMember {
    /// Property name (`this` for indexers)
    pub name: String,
    /// Property type
    #[serde(rename = "type")]
    pub ty: String,
    /// Indexer parameters; empty for ordinary properties
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Getter accessibility, `None` when there is no getter
    #[serde(default)]
    pub getter: Option<Accessibility>,
    /// Setter accessibility, `None` when there is no setter
    #[serde(default)]
    pub setter: Option<Accessibility>,
    /// Declared accessibility of the property itself
    #[serde(default)]
    pub accessibility: Accessibility,
    /// Inheritance flags
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Attribute text copied verbatim (`[Obsolete]`)
    #[serde(default)]
    pub attributes: Vec<String>,
}

impl PropertyMember {
    /// A public get/set property
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            parameters: Vec::new(),
            getter: Some(Accessibility::Public),
            setter: Some(Accessibility::Public),
            accessibility: Accessibility::Public,
            modifiers: Modifiers::default(),
            attributes: Vec::new(),
        }
    }

    /// Whether this property is an indexer
    pub fn is_indexer(&self) -> bool {
        !self.parameters.is_empty()
    }

    /// Whether the getter is present and public
    pub fn has_public_getter(&self) -> bool {
        self.getter.is_some_and(Accessibility::is_public)
    }

    /// Whether the setter is present and public
    pub fn has_public_setter(&self) -> bool {
        self.setter.is_some_and(Accessibility::is_public)
    }
}

/// A method
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodMember {
    /// Method name
    pub name: String,
    /// Generic type parameters
    #[serde(default)]
    pub type_params: Vec<GenericParam>,
    /// Parameters in declaration order
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Return type (`void` when nothing is returned)
    #[serde(default = "void_type")]
    pub return_type: String,
    /// Declared accessibility
    #[serde(default)]
    pub accessibility: Accessibility,
    /// Inheritance flags
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Attribute text copied verbatim
    #[serde(default)]
    pub attributes: Vec<String>,
}

fn void_type() -> String {
    "void".to_string()
}

impl MethodMember {
    /// A public, non-generic method
    pub fn new(name: impl Into<String>, return_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_params: Vec::new(),
            parameters: Vec::new(),
            return_type: return_type.into(),
            accessibility: Accessibility::Public,
            modifiers: Modifiers::default(),
            attributes: Vec::new(),
        }
    }

    /// Whether the method returns nothing
    pub fn returns_void(&self) -> bool {
        self.return_type == "void"
    }

    /// Name with generic parameters appended (`Convert<T>`)
    pub fn name_with_type_params(&self) -> String {
        if self.type_params.is_empty() {
            self.name.clone()
        } else {
            let params: Vec<&str> = self.type_params.iter().map(|p| p.name.as_str()).collect();
            format!("{}<{}>", self.name, params.join(", "))
        }
    }
}

/// An event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMember {
    /// Event name
    pub name: String,
    /// Delegate type of the handler
    pub handler_type: String,
    /// Whether an `add` accessor exists
    #[serde(default = "enabled")]
    pub has_add: bool,
    /// Whether a `remove` accessor exists
    #[serde(default = "enabled")]
    pub has_remove: bool,
    /// Declared accessibility
    #[serde(default)]
    pub accessibility: Accessibility,
    /// Inheritance flags
    #[serde(default)]
    pub modifiers: Modifiers,
    /// Attribute text copied verbatim
    #[serde(default)]
    pub attributes: Vec<String>,
}

fn enabled() -> bool {
    true
}

/// Kind of a user-defined operator
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperatorKind {
    /// `implicit operator`
    Implicit,
    /// `explicit operator`
    Explicit,
    /// A binary operator such as `+` or `==`
    Binary(String),
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperatorKind::Implicit => write!(f, "implicit"),
            OperatorKind::Explicit => write!(f, "explicit"),
            OperatorKind::Binary(symbol) => write!(f, "operator {}", symbol),
        }
    }
}

/// A static user-defined operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatorMember {
    /// Operator kind
    pub operator: OperatorKind,
    /// Operand parameters
    #[serde(default)]
    pub parameters: Vec<Parameter>,
    /// Result type
    pub return_type: String,
    /// Declared accessibility
    #[serde(default)]
    pub accessibility: Accessibility,
    /// Attribute text copied verbatim
    #[serde(default)]
    pub attributes: Vec<String>,
}

/// Any member of a type's public surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MemberDescriptor {
    /// Property or indexer
    Property(PropertyMember),
    /// Method
    Method(MethodMember),
    /// Event
    Event(EventMember),
    /// Operator
    Operator(OperatorMember),
}

impl MemberDescriptor {
    /// Member name as seen by name-based filters
    pub fn name(&self) -> &str {
        match self {
            MemberDescriptor::Property(p) => &p.name,
            MemberDescriptor::Method(m) => &m.name,
            MemberDescriptor::Event(e) => &e.name,
            MemberDescriptor::Operator(o) => match &o.operator {
                OperatorKind::Implicit => "op_Implicit",
                OperatorKind::Explicit => "op_Explicit",
                OperatorKind::Binary(_) => "op_Binary",
            },
        }
    }

    /// Declared accessibility of the member
    pub fn accessibility(&self) -> Accessibility {
        match self {
            MemberDescriptor::Property(p) => p.accessibility,
            MemberDescriptor::Method(m) => m.accessibility,
            MemberDescriptor::Event(e) => e.accessibility,
            MemberDescriptor::Operator(o) => o.accessibility,
        }
    }

    /// Attribute text attached to the member
    pub fn attributes(&self) -> &[String] {
        match self {
            MemberDescriptor::Property(p) => &p.attributes,
            MemberDescriptor::Method(m) => &m.attributes,
            MemberDescriptor::Event(e) => &e.attributes,
            MemberDescriptor::Operator(o) => &o.attributes,
        }
    }

    /// Whether the member is static; operators always are
    pub fn is_static(&self) -> bool {
        match self {
            MemberDescriptor::Property(p) => p.modifiers.is_static,
            MemberDescriptor::Method(m) => m.modifiers.is_static,
            MemberDescriptor::Event(e) => e.modifiers.is_static,
            MemberDescriptor::Operator(_) => true,
        }
    }

    /// Whether the member is reachable from outside the type
    ///
    /// Properties count as public when either accessor is public.
    pub fn is_public(&self) -> bool {
        match self {
            MemberDescriptor::Property(p) => {
                p.accessibility.is_public() && (p.has_public_getter() || p.has_public_setter())
            }
            other => other.accessibility().is_public(),
        }
    }

    /// Identity used for deduplication: name plus parameter signature
    ///
    /// Two members with the same key cannot both appear in one surface.
    pub fn signature_key(&self) -> String {
        fn params(ps: &[Parameter]) -> String {
            let parts: Vec<String> = ps
                .iter()
                .map(|p| format!("{}{}", p.kind.argument_prefix(), p.ty))
                .collect();
            parts.join(",")
        }

        match self {
            MemberDescriptor::Property(p) if p.is_indexer() => {
                format!("this[{}]", params(&p.parameters))
            }
            MemberDescriptor::Property(p) => p.name.clone(),
            MemberDescriptor::Event(e) => format!("event {}", e.name),
            MemberDescriptor::Method(m) => format!(
                "{}`{}({})",
                m.name,
                m.type_params.len(),
                params(&m.parameters)
            ),
            MemberDescriptor::Operator(o) => format!(
                "{}({})->{}",
                o.operator,
                params(&o.parameters),
                o.return_type
            ),
        }
    }

    /// Inheritance flags, when the member kind has them
    pub fn modifiers(&self) -> Option<&Modifiers> {
        match self {
            MemberDescriptor::Property(p) => Some(&p.modifiers),
            MemberDescriptor::Method(m) => Some(&m.modifiers),
            MemberDescriptor::Event(e) => Some(&e.modifiers),
            MemberDescriptor::Operator(_) => None,
        }
    }
}

impl From<PropertyMember> for MemberDescriptor {
    fn from(p: PropertyMember) -> Self {
        MemberDescriptor::Property(p)
    }
}

impl From<MethodMember> for MemberDescriptor {
    fn from(m: MethodMember) -> Self {
        MemberDescriptor::Method(m)
    }
}

impl From<EventMember> for MemberDescriptor {
    fn from(e: EventMember) -> Self {
        MemberDescriptor::Event(e)
    }
}

impl From<OperatorMember> for MemberDescriptor {
    fn from(o: OperatorMember) -> Self {
        MemberDescriptor::Operator(o)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_public_if_either_accessor_public() {
        let mut prop = PropertyMember::new("Name", "string");
        prop.setter = Some(Accessibility::Private);
        assert!(MemberDescriptor::from(prop.clone()).is_public());

        prop.getter = Some(Accessibility::Internal);
        assert!(!MemberDescriptor::from(prop).is_public());
    }

    #[test]
    fn test_signature_key_distinguishes_overloads() {
        let mut a = MethodMember::new("Move", "void");
        a.parameters.push(Parameter::new("dx", "int"));
        let mut b = MethodMember::new("Move", "void");
        b.parameters.push(Parameter::new("dx", "double"));
        let c = MethodMember::new("Move", "void");

        let ka = MemberDescriptor::from(a).signature_key();
        let kb = MemberDescriptor::from(b).signature_key();
        let kc = MemberDescriptor::from(c).signature_key();
        assert_ne!(ka, kb);
        assert_ne!(ka, kc);
    }

    #[test]
    fn test_signature_key_includes_ref_kind() {
        let mut a = MethodMember::new("TryGet", "bool");
        a.parameters.push(Parameter::new("value", "int").with_kind(ParameterKind::Out));
        let mut b = MethodMember::new("TryGet", "bool");
        b.parameters.push(Parameter::new("value", "int"));
        assert_ne!(
            MemberDescriptor::from(a).signature_key(),
            MemberDescriptor::from(b).signature_key()
        );
    }

    #[test]
    fn test_name_with_type_params() {
        let mut m = MethodMember::new("Convert", "T");
        m.type_params.push(GenericParam::new("T"));
        m.type_params.push(GenericParam::new("U"));
        assert_eq!(m.name_with_type_params(), "Convert<T, U>");
    }

    #[test]
    fn test_member_deserializes_from_tagged_json() {
        let json = r#"{
            "kind": "method",
            "name": "TryParse",
            "return_type": "bool",
            "parameters": [
                { "name": "text", "type": "string" },
                { "name": "value", "type": "Acme.Color", "kind": "out" }
            ],
            "modifiers": { "is_static": true }
        }"#;
        let member: MemberDescriptor = serde_json::from_str(json).unwrap();
        match member {
            MemberDescriptor::Method(m) => {
                assert_eq!(m.name, "TryParse");
                assert!(m.modifiers.is_static);
                assert_eq!(m.parameters[1].kind, ParameterKind::Out);
                assert_eq!(m.accessibility, Accessibility::Public);
            }
            other => panic!("expected method, got {:?}", other),
        }
    }

    #[test]
    fn test_operator_kind_deserializes() {
        let json = r#"{ "kind": "operator", "operator": { "binary": "+" }, "return_type": "Acme.Vec",
                        "parameters": [ { "name": "a", "type": "Acme.Vec" }, { "name": "b", "type": "Acme.Vec" } ] }"#;
        let member: MemberDescriptor = serde_json::from_str(json).unwrap();
        assert!(member.is_static());
        match member {
            MemberDescriptor::Operator(o) => assert_eq!(o.operator, OperatorKind::Binary("+".into())),
            other => panic!("expected operator, got {:?}", other),
        }
    }
}
