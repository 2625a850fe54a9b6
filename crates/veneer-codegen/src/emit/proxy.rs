//! Proxy class emission
//!
//! A proxy holds one target instance, handed in through its only
//! constructor, and forwards every surface member to it. Translation through
//! the adapter happens at each boundary crossing:
//!
//! - parameters in: local → foreign, through a `name_` temporary
//! - results and `out` values: foreign → local, after the wrapped call
//! - `ref` parameters: passed through untouched
//!
//! Conversion operators become named static functions: `FromTarget` wraps a
//! value converted to the target type, `IntoTarget` casts the held instance.

use veneer_types::{
    EventMember, MemberDescriptor, MethodMember, Modifiers, OperatorKind, OperatorMember,
    ParameterKind, PropertyMember, TargetSpec, TypeName,
};

use super::{
    declare_parameter, sanitize_identifier, uses_temporary, where_clause, write_epilogue,
    write_preamble, CodeWriter, EmitContext, Emitted,
};
use crate::error::GenerateError;
use crate::resolver::ResolvedSurface;

/// Emits `partial class {Target}Proxy` declarations
pub struct ProxySynthesizer<'a> {
    ctx: &'a EmitContext<'a>,
}

/// Per-proxy emission state
struct ProxyScope<'s> {
    spec: &'s TargetSpec,
    target_q: String,
    proxy: String,
    unwrap_conversions: usize,
    warnings: Vec<GenerateError>,
}

impl ProxyScope<'_> {
    fn target(&self) -> &str {
        self.spec.target_name()
    }

    fn instance(&self, is_static: bool) -> &str {
        if is_static {
            &self.target_q
        } else {
            "_Instance"
        }
    }

    fn is_target(&self, ty: &str) -> bool {
        same_type(ty, self.spec.target_name())
    }
}

impl<'a> ProxySynthesizer<'a> {
    pub fn new(ctx: &'a EmitContext<'a>) -> Self {
        Self { ctx }
    }

    /// Emit the proxy for one target
    ///
    /// `parent` is the linked parent target, whose proxy this one derives from.
    pub fn emit(
        &self,
        spec: &TargetSpec,
        surface: &ResolvedSurface,
        parent: Option<&TargetSpec>,
    ) -> Emitted {
        let mut scope = ProxyScope {
            spec,
            target_q: TypeName::qualified(spec.target_name()),
            proxy: spec.proxy_name(),
            unwrap_conversions: 0,
            warnings: Vec::new(),
        };
        scope.unwrap_conversions = surface
            .iter()
            .filter(|m| match m {
                MemberDescriptor::Operator(o) => is_unwrap(&scope, o),
                _ => false,
            })
            .count();

        let namespace = spec.namespace();
        let mut w = CodeWriter::new();
        write_preamble(&mut w, self.ctx.settings, &namespace);

        let extends = parent
            .map(|p| format!("{}, ", TypeName::qualified(&p.proxy_full_name())))
            .unwrap_or_default();
        w.open(format!(
            "{} partial class {} : {}{}",
            spec.accessibility.keyword(),
            scope.proxy,
            extends,
            TypeName::qualified(&spec.descriptor_full_name())
        ));

        let hide = if parent.is_some() { "new " } else { "" };
        w.line(format!("public {}{} _Instance {{ get; }}", hide, scope.target_q));
        w.blank();

        for member in surface.iter() {
            let emitted = match member {
                MemberDescriptor::Property(p) => self.property(&mut w, &mut scope, p),
                MemberDescriptor::Method(m) => self.method(&mut w, &mut scope, m),
                MemberDescriptor::Event(e) => self.event(&mut w, &scope, e),
                MemberDescriptor::Operator(o) => self.operator(&mut w, &mut scope, o),
            };
            if emitted {
                w.blank();
            }
        }

        let base_call = if parent.is_some() { " : base(instance)" } else { "" };
        w.open(format!(
            "public {}({} instance){}",
            scope.proxy, scope.target_q, base_call
        ));
        w.line("_Instance = instance;");
        w.close();

        w.close();
        write_epilogue(&mut w, self.ctx.settings, &namespace);

        Emitted {
            text: w.finish(),
            warnings: scope.warnings,
        }
    }

    /// `override` only when a proxy generated in this run declares the member
    fn inheritance_modifier(&self, name: &str, modifiers: &Modifiers) -> &'static str {
        if modifiers.is_static {
            "static "
        } else if modifiers.is_override {
            match &modifiers.overridden_from {
                Some(base) if self.ctx.proxy_declares(base, name) => "override ",
                _ => "",
            }
        } else if modifiers.is_virtual || modifiers.is_abstract {
            "virtual "
        } else {
            ""
        }
    }

    fn attributes(w: &mut CodeWriter, attributes: &[String]) {
        for attribute in attributes {
            w.line(attribute);
        }
    }

    fn property(&self, w: &mut CodeWriter, scope: &mut ProxyScope<'_>, p: &PropertyMember) -> bool {
        let target = scope.target().to_string();
        let translated = self.ctx.translate(&p.ty, &target, &p.name, &mut scope.warnings);
        let instance = scope.instance(p.modifiers.is_static).to_string();

        let (name, access) = if p.is_indexer() {
            let mut decls = Vec::new();
            let mut args = Vec::new();
            for param in &p.parameters {
                let pt = self.ctx.translate(&param.ty, &target, &p.name, &mut scope.warnings);
                let arg = sanitize_identifier(&param.name);
                args.push(if pt.replaced {
                    self.ctx.adapt(&param.ty, &arg)
                } else {
                    arg
                });
                decls.push(declare_parameter(param, &pt.ty));
            }
            (
                format!("this[{}]", decls.join(", ")),
                format!("{}[{}]", instance, args.join(", ")),
            )
        } else {
            let name = sanitize_identifier(&p.name);
            let access = format!("{}.{}", instance, name);
            (name, access)
        };

        let mut accessors = String::new();
        if p.has_public_getter() {
            let value = if translated.replaced {
                self.ctx.adapt(&translated.ty, &access)
            } else {
                access.clone()
            };
            accessors.push_str(&format!("get => {}; ", value));
        }
        if p.has_public_setter() {
            let value = if translated.replaced {
                self.ctx.adapt(&p.ty, "value")
            } else {
                "value".to_string()
            };
            accessors.push_str(&format!("set => {} = {}; ", access, value));
        }

        Self::attributes(w, &p.attributes);
        w.line(format!(
            "public {}{} {} {{ {}}}",
            self.inheritance_modifier(&p.name, &p.modifiers),
            translated.ty,
            name,
            accessors
        ));
        true
    }

    fn method(&self, w: &mut CodeWriter, scope: &mut ProxyScope<'_>, m: &MethodMember) -> bool {
        let target = scope.target().to_string();
        let ret = self.ctx.translate(&m.return_type, &target, &m.name, &mut scope.warnings);
        let modifier = self.inheritance_modifier(&m.name, &m.modifiers);

        let mut decls = Vec::new();
        let mut replaced = Vec::new();
        for param in &m.parameters {
            if param.kind == ParameterKind::Ref {
                decls.push(declare_parameter(param, &param.ty));
                replaced.push(None);
            } else {
                let t = self.ctx.translate(&param.ty, &target, &m.name, &mut scope.warnings);
                decls.push(declare_parameter(param, &t.ty));
                replaced.push(t.replaced.then_some(t.ty));
            }
        }

        // Overrides inherit their constraints and may not restate them.
        let constraints = if modifier == "override " {
            String::new()
        } else {
            where_clause(m)
        };
        let name = sanitize_identifier(&m.name_with_type_params());

        Self::attributes(w, &m.attributes);
        w.open(format!(
            "public {}{} {}({}){}",
            modifier,
            ret.ty,
            name,
            decls.join(", "),
            constraints
        ));

        let mut args = Vec::new();
        for (param, local) in m.parameters.iter().zip(&replaced) {
            let arg = sanitize_identifier(&param.name);
            if !uses_temporary(param.kind) {
                args.push(format!("{}{}", param.kind.argument_prefix(), arg));
                continue;
            }
            let temp = format!("{}_", param.name);
            if param.kind == ParameterKind::Out {
                w.line(format!("{} {};", param.ty, temp));
            } else {
                let value = match local {
                    Some(_) => self.ctx.adapt(&param.ty, &arg),
                    None => arg,
                };
                w.line(format!("{} {} = {};", param.ty, temp, value));
            }
            args.push(format!("{}{}", param.kind.argument_prefix(), temp));
        }

        let call = format!(
            "{}.{}({})",
            scope.instance(m.modifiers.is_static),
            name,
            args.join(", ")
        );
        let result = format!("result_{:08X}", crc32fast::hash(m.name_with_type_params().as_bytes()));
        if m.returns_void() {
            w.line(format!("{};", call));
        } else {
            w.line(format!("var {} = {};", result, call));
        }

        for (param, local) in m.parameters.iter().zip(&replaced) {
            if param.kind != ParameterKind::Out {
                continue;
            }
            let temp = format!("{}_", param.name);
            let value = match local {
                Some(local_ty) => self.ctx.adapt(local_ty, &temp),
                None => temp,
            };
            w.line(format!("{} = {};", sanitize_identifier(&param.name), value));
        }

        if !m.returns_void() {
            if ret.replaced {
                w.line(format!("return {};", self.ctx.adapt(&ret.ty, &result)));
            } else {
                w.line(format!("return {};", result));
            }
        }

        w.close();
        true
    }

    fn event(&self, w: &mut CodeWriter, scope: &ProxyScope<'_>, e: &EventMember) -> bool {
        let name = sanitize_identifier(&e.name);
        let instance = scope.instance(e.modifiers.is_static);

        let mut line = format!(
            "public {}event {} {} {{",
            self.inheritance_modifier(&e.name, &e.modifiers),
            e.handler_type,
            name
        );
        if e.has_add {
            line.push_str(&format!(" add {{ {}.{} += value; }}", instance, name));
        }
        if e.has_remove {
            line.push_str(&format!(" remove {{ {}.{} -= value; }}", instance, name));
        }
        line.push_str(" }");

        Self::attributes(w, &e.attributes);
        w.line(line);
        true
    }

    fn operator(&self, w: &mut CodeWriter, scope: &mut ProxyScope<'_>, o: &OperatorMember) -> bool {
        match &o.operator {
            OperatorKind::Implicit | OperatorKind::Explicit => self.conversion(w, scope, o),
            OperatorKind::Binary(symbol) => self.binary(w, scope, o, symbol),
        }
    }

    fn conversion(&self, w: &mut CodeWriter, scope: &mut ProxyScope<'_>, o: &OperatorMember) -> bool {
        let Some(param) = o.parameters.first() else {
            return false;
        };
        let arg = sanitize_identifier(&param.name);

        if scope.is_target(&o.return_type) {
            let target = scope.target().to_string();
            let source = self
                .ctx
                .translate(&param.ty, &target, "FromTarget", &mut scope.warnings);
            let value = if source.replaced {
                self.ctx.adapt(&param.ty, &arg)
            } else {
                arg.clone()
            };
            Self::attributes(w, &o.attributes);
            w.open(format!(
                "public static {} FromTarget({} {})",
                scope.proxy, source.ty, arg
            ));
            w.line(format!("return new {}(({}) {});", scope.proxy, scope.target_q, value));
            w.close();
            true
        } else if is_unwrap(scope, o) {
            let name = if scope.unwrap_conversions == 1 {
                "IntoTarget".to_string()
            } else {
                format!("Into{}", conversion_suffix(&o.return_type))
            };
            Self::attributes(w, &o.attributes);
            w.open(format!(
                "public static {} {}({} {})",
                o.return_type, name, scope.proxy, arg
            ));
            w.line(format!("return ({}) {}._Instance;", o.return_type, arg));
            w.close();
            true
        } else {
            false
        }
    }

    fn binary(
        &self,
        w: &mut CodeWriter,
        scope: &mut ProxyScope<'_>,
        o: &OperatorMember,
        symbol: &str,
    ) -> bool {
        let (Some(name), [left, right]) = (binary_operator_name(symbol), o.parameters.as_slice()) else {
            scope.warnings.push(GenerateError::UnknownOperator {
                target: scope.target().to_string(),
                symbol: symbol.to_string(),
            });
            return false;
        };

        let mut decls = Vec::new();
        let mut operands = Vec::new();
        for param in [left, right] {
            let arg = sanitize_identifier(&param.name);
            if scope.is_target(&param.ty) {
                decls.push(format!("{} {}", scope.proxy, arg));
                operands.push(format!("{}._Instance", arg));
            } else {
                decls.push(declare_parameter(param, &param.ty));
                operands.push(arg);
            }
        }

        let expr = format!("{} {} {}", operands[0], symbol, operands[1]);
        let (ret, body) = if scope.is_target(&o.return_type) {
            (scope.proxy.clone(), format!("new {}({})", scope.proxy, expr))
        } else {
            (o.return_type.clone(), expr)
        };

        Self::attributes(w, &o.attributes);
        w.open(format!("public static {} Op{}({})", ret, name, decls.join(", ")));
        w.line(format!("return {};", body));
        w.close();
        true
    }
}

fn is_unwrap(scope: &ProxyScope<'_>, o: &OperatorMember) -> bool {
    matches!(o.operator, OperatorKind::Implicit | OperatorKind::Explicit)
        && !scope.is_target(&o.return_type)
        && o.parameters.first().is_some_and(|p| scope.is_target(&p.ty))
}

fn same_type(a: &str, b: &str) -> bool {
    let a = TypeName::normalize(TypeName::split_nullable(a.trim()).0);
    let b = TypeName::normalize(TypeName::split_nullable(b.trim()).0);
    a == b
}

/// `string` → `String`, `byte[]` → `ByteArray`, `Acme.Size?` → `Size`
fn conversion_suffix(ty: &str) -> String {
    let (ty, _) = TypeName::split_nullable(ty.trim());
    let (ty, array) = match ty.strip_suffix("[]") {
        Some(inner) => (inner, true),
        None => (ty, false),
    };
    let short = TypeName::short_name(ty);
    let mut chars = short.chars();
    let mut suffix = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    };
    if array {
        suffix.push_str("Array");
    }
    suffix
}

fn binary_operator_name(symbol: &str) -> Option<&'static str> {
    Some(match symbol {
        "+" => "Addition",
        "-" => "Subtraction",
        "*" => "Multiply",
        "/" => "Division",
        "%" => "Modulus",
        "&" => "BitwiseAnd",
        "|" => "BitwiseOr",
        "^" => "ExclusiveOr",
        "<<" => "LeftShift",
        ">>" => "RightShift",
        "==" => "Equality",
        "!=" => "Inequality",
        "<" => "LessThan",
        ">" => "GreaterThan",
        "<=" => "LessThanOrEqual",
        ">=" => "GreaterThanOrEqual",
        _ => return None,
    })
}
