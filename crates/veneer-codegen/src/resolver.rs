//! Member resolution
//!
//! Turns a [`TargetSpec`] into the ordered list of members its proxy forwards
//! ([`ResolvedSurface`]) and, from that, the members its descriptor declares
//! ([`DescriptorSurface`]).

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::debug;
use veneer_types::{MemberDescriptor, TargetSpec, TypeHandle, TypeName, TypeOracle};

use crate::error::{GenerateError, GenerateResult};
use crate::settings::GeneratorSettings;

/// An ancestor class and the interfaces it declares directly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AncestorClass {
    pub handle: TypeHandle,
    pub interfaces: Vec<TypeHandle>,
}

/// Resolved supertypes of a target
#[derive(Debug, Clone)]
pub struct Ancestry {
    pub target: TypeHandle,
    /// Ancestor classes, nearest first, root types excluded
    pub classes: Vec<AncestorClass>,
    /// Interfaces the target declares directly
    pub direct_interfaces: Vec<TypeHandle>,
    /// Direct base interfaces of every reachable interface
    interface_bases: FxHashMap<String, Vec<TypeHandle>>,
}

impl Ancestry {
    /// Ancestor class names, nearest first
    pub fn class_names(&self) -> Vec<&str> {
        self.classes
            .iter()
            .map(|c| c.handle.full_name.as_str())
            .collect()
    }

    /// The given interfaces plus everything they extend, without repeats
    pub fn interface_closure(&self, roots: &[TypeHandle]) -> Vec<TypeHandle> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        let mut stack: Vec<&TypeHandle> = roots.iter().rev().collect();
        while let Some(iface) = stack.pop() {
            if !seen.insert(iface.full_name.as_str()) {
                continue;
            }
            out.push(iface.clone());
            if let Some(bases) = self.interface_bases.get(&iface.full_name) {
                stack.extend(bases.iter().rev());
            }
        }
        out
    }
}

/// Members a proxy forwards, in emission order
#[derive(Debug, Clone)]
pub struct ResolvedSurface {
    pub target: TypeHandle,
    pub members: Vec<MemberDescriptor>,
    /// Interfaces the descriptor may list as super-capabilities
    pub implemented_interfaces: Vec<TypeHandle>,
    /// Names of every member reachable through `implemented_interfaces`
    pub interface_member_names: FxHashSet<String>,
}

impl ResolvedSurface {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &MemberDescriptor> {
        self.members.iter()
    }
}

/// Members a descriptor declares, plus what it inherits
#[derive(Debug, Clone, Default)]
pub struct DescriptorSurface {
    /// Super-capabilities, fully qualified
    pub supers: Vec<String>,
    /// Members declared in the descriptor body
    pub members: Vec<MemberDescriptor>,
    /// Whether the parent target's descriptor is composed
    pub composes_parent: bool,
    /// Names supplied by the super-capabilities
    pub inherited_names: FxHashSet<String>,
}

/// What a child descriptor needs to know about its parent's descriptor
#[derive(Debug, Clone)]
pub struct ComposedDescriptor {
    pub full_name: String,
    /// Every member name reachable through the descriptor
    pub names: FxHashSet<String>,
    /// Every member the descriptor declares, including composed ones
    pub members: Vec<MemberDescriptor>,
}

impl ComposedDescriptor {
    pub fn new(
        spec: &TargetSpec,
        surface: &DescriptorSurface,
        parent: Option<&ComposedDescriptor>,
    ) -> Self {
        let mut names = surface.inherited_names.clone();
        names.extend(surface.members.iter().map(|m| m.name().to_string()));

        let mut members = surface.members.clone();
        if let (true, Some(parent)) = (surface.composes_parent, parent) {
            let mut keys: FxHashSet<String> = members.iter().map(|m| m.signature_key()).collect();
            for m in &parent.members {
                if keys.insert(m.signature_key()) {
                    members.push(m.clone());
                }
            }
        }

        Self {
            full_name: spec.descriptor_full_name(),
            names,
            members,
        }
    }
}

/// Accumulates public members, first occurrence of each signature wins
struct SurfaceCollector<'s> {
    spec: &'s TargetSpec,
    seen: FxHashSet<String>,
    members: Vec<MemberDescriptor>,
}

impl<'s> SurfaceCollector<'s> {
    fn new(spec: &'s TargetSpec) -> Self {
        Self {
            spec,
            seen: FxHashSet::default(),
            members: Vec::new(),
        }
    }

    fn extend(&mut self, members: Vec<MemberDescriptor>, include_operators: bool) {
        for member in members {
            if matches!(member, MemberDescriptor::Operator(_)) && !include_operators {
                continue;
            }
            if !member.is_public() || self.spec.ignores(member.name()) {
                continue;
            }
            let member = public_view(member);
            if self.seen.insert(member.signature_key()) {
                self.members.push(member);
            }
        }
    }
}

/// Drop accessors that are not public
fn public_view(member: MemberDescriptor) -> MemberDescriptor {
    match member {
        MemberDescriptor::Property(mut p) => {
            p.getter = p.getter.filter(|a| a.is_public());
            p.setter = p.setter.filter(|a| a.is_public());
            MemberDescriptor::Property(p)
        }
        other => other,
    }
}

/// Whether a member can be declared in a descriptor
fn declarable(member: &MemberDescriptor, expose_statics: bool) -> bool {
    match member {
        MemberDescriptor::Property(_) | MemberDescriptor::Method(_) => {
            !member.is_static() || expose_statics
        }
        MemberDescriptor::Event(_) | MemberDescriptor::Operator(_) => false,
    }
}

/// Walks target types through the oracle
pub struct MemberResolver<'a, O: TypeOracle + ?Sized> {
    oracle: &'a O,
    settings: &'a GeneratorSettings,
}

impl<'a, O: TypeOracle + ?Sized> MemberResolver<'a, O> {
    pub fn new(oracle: &'a O, settings: &'a GeneratorSettings) -> Self {
        Self { oracle, settings }
    }

    /// Reject configurations that can never generate
    pub fn validate(spec: &TargetSpec) -> GenerateResult<()> {
        let target = spec.target_name();
        if !TypeName::is_valid(target) {
            return Err(GenerateError::configuration(
                &spec.target,
                "target name is empty or malformed",
            ));
        }
        if target.contains('<') || target.contains('`') {
            return Err(GenerateError::configuration(
                target,
                "generic targets are not supported; configure a closed wrapper type instead",
            ));
        }
        if spec.options.proxy_interfaces && spec.options.proxy_for_base_interface {
            return Err(GenerateError::configuration(
                target,
                "'proxy-interfaces' and 'proxy-for-base-interface' cannot be combined",
            ));
        }
        if let Some(base) = &spec.base_proxy {
            if TypeName::normalize(base) == target {
                return Err(GenerateError::configuration(
                    target,
                    "target is declared as its own base proxy",
                ));
            }
        }
        Ok(())
    }

    /// Full surface of a target with no linked parent
    pub fn resolve(&self, spec: &TargetSpec) -> GenerateResult<ResolvedSurface> {
        Self::validate(spec)?;
        let ancestry = self.ancestry(spec)?;
        Ok(self.resolve_with(spec, &ancestry, None))
    }

    /// Resolve the target, its ancestor classes and every reachable interface
    pub fn ancestry(&self, spec: &TargetSpec) -> GenerateResult<Ancestry> {
        let target_name = spec.target_name();
        let target = self
            .oracle
            .resolve_type(target_name, &spec.imports)
            .ok_or_else(|| GenerateError::resolution(target_name, target_name))?;
        if target.is_interface() {
            return Err(GenerateError::configuration(
                target_name,
                "target is an interface; only classes and structs can be proxied",
            ));
        }

        let mut visited = FxHashSet::default();
        visited.insert(target.full_name.clone());

        let mut interface_bases = FxHashMap::default();
        let (mut next, direct_interfaces) = self.split_bases(spec, &target)?;
        self.walk_interfaces(spec, &direct_interfaces, &mut interface_bases)?;

        let mut classes = Vec::new();
        while let Some(class) = next {
            if !visited.insert(class.full_name.clone()) {
                return Err(GenerateError::configuration(
                    target_name,
                    format!("inheritance cycle through '{}'", class.full_name),
                ));
            }
            let (base, interfaces) = self.split_bases(spec, &class)?;
            self.walk_interfaces(spec, &interfaces, &mut interface_bases)?;
            classes.push(AncestorClass {
                handle: class,
                interfaces,
            });
            next = base;
        }

        debug!(
            target_type = target_name,
            ancestors = classes.len(),
            interfaces = interface_bases.len(),
            "resolved ancestry"
        );

        Ok(Ancestry {
            target,
            classes,
            direct_interfaces,
            interface_bases,
        })
    }

    /// Base class and interfaces of one type, roots skipped
    fn split_bases(
        &self,
        spec: &TargetSpec,
        ty: &TypeHandle,
    ) -> GenerateResult<(Option<TypeHandle>, Vec<TypeHandle>)> {
        let mut base = None;
        let mut interfaces = Vec::new();
        for name in self.oracle.get_base_types(&ty.full_name) {
            if self.settings.is_root(&name) {
                continue;
            }
            let handle = self
                .oracle
                .resolve_type(&name, &spec.imports)
                .ok_or_else(|| GenerateError::resolution(spec.target_name(), &name))?;
            if handle.is_interface() {
                interfaces.push(handle);
            } else if base.is_none() {
                base = Some(handle);
            }
        }
        Ok((base, interfaces))
    }

    fn walk_interfaces(
        &self,
        spec: &TargetSpec,
        roots: &[TypeHandle],
        bases: &mut FxHashMap<String, Vec<TypeHandle>>,
    ) -> GenerateResult<()> {
        let mut stack: Vec<TypeHandle> = roots.to_vec();
        while let Some(iface) = stack.pop() {
            if bases.contains_key(&iface.full_name) {
                continue;
            }
            let (_, parents) = self.split_bases(spec, &iface)?;
            stack.extend(parents.iter().cloned());
            bases.insert(iface.full_name, parents);
        }
        Ok(())
    }

    /// Collect the proxy surface
    ///
    /// `stop_at` names the linked parent target; its members and everything
    /// above it are forwarded by the parent proxy.
    pub fn resolve_with(
        &self,
        spec: &TargetSpec,
        ancestry: &Ancestry,
        stop_at: Option<&str>,
    ) -> ResolvedSurface {
        let mut collector = SurfaceCollector::new(spec);
        collector.extend(self.oracle.get_members(&ancestry.target.full_name), true);

        let mut implemented: Vec<TypeHandle> = ancestry.direct_interfaces.clone();
        if spec.options.proxy_base_classes {
            for class in &ancestry.classes {
                if stop_at.is_some_and(|s| TypeName::normalize(s) == class.handle.full_name) {
                    break;
                }
                collector.extend(self.oracle.get_members(&class.handle.full_name), false);
                for iface in &class.interfaces {
                    if !implemented.contains(iface) {
                        implemented.push(iface.clone());
                    }
                }
            }
        }

        let closure = ancestry.interface_closure(&implemented);
        if spec.options.proxy_for_base_interface {
            for iface in &closure {
                collector.extend(self.oracle.get_members(&iface.full_name), false);
            }
        }

        let mut interface_member_names = FxHashSet::default();
        for iface in &closure {
            for member in self.oracle.get_members(&iface.full_name) {
                interface_member_names.insert(member.name().to_string());
            }
        }

        debug!(
            target_type = spec.target_name(),
            members = collector.members.len(),
            "resolved surface"
        );

        ResolvedSurface {
            target: ancestry.target.clone(),
            members: collector.members,
            implemented_interfaces: implemented,
            interface_member_names,
        }
    }

    /// Members the descriptor declares
    ///
    /// Names supplied by super-capabilities are never redeclared. Without
    /// `use-extended-interfaces`, the parent descriptor's members are
    /// redeclared after the target's own.
    pub fn descriptor_surface(
        &self,
        spec: &TargetSpec,
        surface: &ResolvedSurface,
        parent: Option<&ComposedDescriptor>,
    ) -> DescriptorSurface {
        let mut supers = Vec::new();
        let mut inherited_names = FxHashSet::default();
        let mut redeclared: &[MemberDescriptor] = &[];
        let mut composes_parent = false;

        if let Some(parent) = parent {
            if spec.options.use_extended_interfaces {
                supers.push(TypeName::qualified(&parent.full_name));
                inherited_names.extend(parent.names.iter().cloned());
                composes_parent = true;
            } else {
                redeclared = &parent.members;
            }
        }

        if spec.options.proxy_interfaces {
            for iface in &surface.implemented_interfaces {
                supers.push(TypeName::qualified(&iface.full_name));
            }
            inherited_names.extend(surface.interface_member_names.iter().cloned());
        }

        let expose_statics = spec.options.expose_statics;
        let mut members: Vec<MemberDescriptor> = surface
            .members
            .iter()
            .filter(|m| declarable(m, expose_statics) && !inherited_names.contains(m.name()))
            .cloned()
            .collect();

        let mut keys: FxHashSet<String> = members.iter().map(|m| m.signature_key()).collect();
        for m in redeclared {
            if !inherited_names.contains(m.name()) && keys.insert(m.signature_key()) {
                members.push(m.clone());
            }
        }

        DescriptorSurface {
            supers,
            members,
            composes_parent,
            inherited_names,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use veneer_types::{
        Accessibility, ImplementationOptions, MetadataOracle, MethodMember, PropertyMember,
        TypeKind, TypeMetadata,
    };

    fn names(members: &[MemberDescriptor]) -> Vec<&str> {
        members.iter().map(|m| m.name()).collect()
    }

    fn oracle() -> MetadataOracle {
        let mut hidden = PropertyMember::new("Secret", "string");
        hidden.accessibility = Accessibility::Private;
        let mut readonly = PropertyMember::new("Id", "int");
        readonly.setter = Some(Accessibility::Private);

        MetadataOracle::from_types([
            TypeMetadata::new("Acme.Base", TypeKind::Class)
                .extends("System.Object")
                .member(PropertyMember::new("Name", "string"))
                .member(MethodMember::new("Describe", "string")),
            TypeMetadata::new("Acme.Widget", TypeKind::Class)
                .extends("Acme.Base")
                .extends("Acme.IHasName")
                .member(PropertyMember::new("Name", "string"))
                .member(readonly)
                .member(hidden)
                .member(MethodMember::new("Spin", "void")),
            TypeMetadata::new("Acme.IHasName", TypeKind::Interface)
                .extends("Acme.INamed"),
            TypeMetadata::new("Acme.INamed", TypeKind::Interface)
                .member(PropertyMember::new("Name", "string")),
            TypeMetadata::new("Acme.Broken", TypeKind::Class).extends("Acme.Missing"),
        ])
        .unwrap()
    }

    #[test]
    fn test_own_members_only_by_default() {
        let oracle = oracle();
        let settings = GeneratorSettings::default();
        let resolver = MemberResolver::new(&oracle, &settings);

        let surface = resolver.resolve(&TargetSpec::new("Acme.Widget")).unwrap();
        assert_eq!(names(&surface.members), vec!["Name", "Id", "Spin"]);
    }

    #[test]
    fn test_non_public_setter_dropped() {
        let oracle = oracle();
        let settings = GeneratorSettings::default();
        let resolver = MemberResolver::new(&oracle, &settings);

        let surface = resolver.resolve(&TargetSpec::new("Acme.Widget")).unwrap();
        match &surface.members[1] {
            MemberDescriptor::Property(p) => {
                assert!(p.getter.is_some());
                assert!(p.setter.is_none());
            }
            other => panic!("expected property, got {:?}", other),
        }
    }

    #[test]
    fn test_base_classes_derived_wins() {
        let oracle = oracle();
        let settings = GeneratorSettings::default();
        let resolver = MemberResolver::new(&oracle, &settings);
        let spec = TargetSpec::new("Acme.Widget").with_options(ImplementationOptions {
            proxy_base_classes: true,
            ..Default::default()
        });

        let surface = resolver.resolve(&spec).unwrap();
        assert_eq!(names(&surface.members), vec!["Name", "Id", "Spin", "Describe"]);
    }

    #[test]
    fn test_members_to_ignore() {
        let oracle = oracle();
        let settings = GeneratorSettings::default();
        let resolver = MemberResolver::new(&oracle, &settings);

        let spec = TargetSpec::new("Acme.Widget").ignoring(["Spin"]);
        let surface = resolver.resolve(&spec).unwrap();
        assert_eq!(names(&surface.members), vec!["Name", "Id"]);
    }

    #[test]
    fn test_interface_filter_uses_ancestor_interfaces() {
        let oracle = oracle();
        let settings = GeneratorSettings::default();
        let resolver = MemberResolver::new(&oracle, &settings);
        let spec = TargetSpec::new("Acme.Widget").with_options(ImplementationOptions {
            proxy_interfaces: true,
            ..Default::default()
        });

        let surface = resolver.resolve(&spec).unwrap();
        assert!(surface.interface_member_names.contains("Name"));

        let descriptor = resolver.descriptor_surface(&spec, &surface, None);
        assert_eq!(descriptor.supers, vec!["global::Acme.IHasName".to_string()]);
        assert_eq!(names(&descriptor.members), vec!["Id", "Spin"]);
    }

    #[test]
    fn test_unresolvable_base_is_resolution_error() {
        let oracle = oracle();
        let settings = GeneratorSettings::default();
        let resolver = MemberResolver::new(&oracle, &settings);

        let err = resolver.resolve(&TargetSpec::new("Acme.Broken")).unwrap_err();
        assert_eq!(
            err,
            GenerateError::Resolution {
                target: "Acme.Broken".into(),
                name: "Acme.Missing".into()
            }
        );
    }

    #[test]
    fn test_contradictory_options() {
        let spec = TargetSpec::new("Acme.Widget").with_options(ImplementationOptions {
            proxy_interfaces: true,
            proxy_for_base_interface: true,
            ..Default::default()
        });
        let err = MemberResolver::<MetadataOracle>::validate(&spec).unwrap_err();
        assert!(matches!(err, GenerateError::Configuration { .. }));
    }

    #[test]
    fn test_generic_target_rejected() {
        for name in ["Acme.Box<T>", "global::Acme.Pair<Acme.Item, T>", "Acme.Box`1"] {
            let err = MemberResolver::<MetadataOracle>::validate(&TargetSpec::new(name)).unwrap_err();
            assert!(matches!(err, GenerateError::Configuration { .. }), "{}", name);
        }
    }

    #[test]
    fn test_interface_target_rejected() {
        let oracle = oracle();
        let settings = GeneratorSettings::default();
        let resolver = MemberResolver::new(&oracle, &settings);

        let err = resolver.resolve(&TargetSpec::new("Acme.INamed")).unwrap_err();
        assert!(matches!(err, GenerateError::Configuration { .. }));
    }

    #[test]
    fn test_ancestry_cycle_is_configuration_error() {
        let oracle = MetadataOracle::from_types([
            TypeMetadata::new("Acme.A", TypeKind::Class).extends("Acme.B"),
            TypeMetadata::new("Acme.B", TypeKind::Class).extends("Acme.A"),
        ])
        .unwrap();
        let settings = GeneratorSettings::default();
        let resolver = MemberResolver::new(&oracle, &settings);

        let err = resolver.ancestry(&TargetSpec::new("Acme.A")).unwrap_err();
        assert!(matches!(err, GenerateError::Configuration { .. }));
    }
}
