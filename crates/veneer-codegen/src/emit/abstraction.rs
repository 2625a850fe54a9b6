//! Capability descriptor emission

use veneer_types::{MemberDescriptor, MethodMember, PropertyMember, TargetSpec, TypeName};

use super::{
    declare_parameter, sanitize_identifier, where_clause, write_epilogue, write_preamble,
    CodeWriter, EmitContext, Emitted,
};
use crate::error::GenerateError;
use crate::resolver::DescriptorSurface;

/// Emits `partial interface I{Target}` declarations
pub struct AbstractionSynthesizer<'a> {
    ctx: &'a EmitContext<'a>,
}

impl<'a> AbstractionSynthesizer<'a> {
    pub fn new(ctx: &'a EmitContext<'a>) -> Self {
        Self { ctx }
    }

    pub fn emit(&self, spec: &TargetSpec, surface: &DescriptorSurface) -> Emitted {
        let mut warnings = Vec::new();
        let mut w = CodeWriter::new();
        let namespace = spec.namespace();

        write_preamble(&mut w, self.ctx.settings, &namespace);

        let supers = if surface.supers.is_empty() {
            String::new()
        } else {
            format!(" : {}", surface.supers.join(", "))
        };
        w.open(format!(
            "{} partial interface {}{}",
            spec.accessibility.keyword(),
            spec.descriptor_name(),
            supers
        ));

        // The parent descriptor already declares a wider `_Instance`.
        let hide = if surface.composes_parent { "new " } else { "" };
        w.line(format!(
            "{}{} _Instance {{ get; }}",
            hide,
            TypeName::qualified(spec.target_name())
        ));
        w.blank();

        for member in &surface.members {
            for attribute in member.attributes() {
                w.line(attribute);
            }
            match member {
                MemberDescriptor::Property(p) => {
                    w.line(self.property(spec, p, &mut warnings));
                }
                MemberDescriptor::Method(m) => {
                    w.line(self.method(spec, m, &mut warnings));
                }
                MemberDescriptor::Event(_) | MemberDescriptor::Operator(_) => continue,
            }
            w.blank();
        }

        w.close();
        write_epilogue(&mut w, self.ctx.settings, &namespace);

        Emitted {
            text: w.finish(),
            warnings,
        }
    }

    fn property(
        &self,
        spec: &TargetSpec,
        p: &PropertyMember,
        warnings: &mut Vec<GenerateError>,
    ) -> String {
        let target = spec.target_name();
        let ty = self.ctx.translate(&p.ty, target, &p.name, warnings).ty;
        let name = if p.is_indexer() {
            let params: Vec<String> = p
                .parameters
                .iter()
                .map(|param| {
                    let pty = self.ctx.translate(&param.ty, target, &p.name, warnings).ty;
                    declare_parameter(param, &pty)
                })
                .collect();
            format!("this[{}]", params.join(", "))
        } else {
            sanitize_identifier(&p.name)
        };

        let mut accessors = String::new();
        if p.has_public_getter() {
            accessors.push_str("get; ");
        }
        if p.has_public_setter() {
            accessors.push_str("set; ");
        }

        format!("{}{} {} {{ {}}}", static_prefix(p.modifiers.is_static), ty, name, accessors)
    }

    fn method(
        &self,
        spec: &TargetSpec,
        m: &MethodMember,
        warnings: &mut Vec<GenerateError>,
    ) -> String {
        let target = spec.target_name();
        let ret = self.ctx.translate(&m.return_type, target, &m.name, warnings).ty;
        let params: Vec<String> = m
            .parameters
            .iter()
            .map(|param| {
                let ty = if param.kind == veneer_types::ParameterKind::Ref {
                    param.ty.clone()
                } else {
                    self.ctx.translate(&param.ty, target, &m.name, warnings).ty
                };
                declare_parameter(param, &ty)
            })
            .collect();

        format!(
            "{}{} {}({}){};",
            static_prefix(m.modifiers.is_static),
            ret,
            sanitize_identifier(&m.name_with_type_params()),
            params.join(", "),
            where_clause(m)
        )
    }
}

fn static_prefix(is_static: bool) -> &'static str {
    if is_static {
        "static abstract "
    } else {
        ""
    }
}
