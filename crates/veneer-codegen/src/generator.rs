//! Generation driver
//!
//! Runs the whole pipeline for a list of targets:
//!
//! 1. validate each target and resolve its ancestry through the oracle
//! 2. link targets whose ancestors are also targets
//! 3. register every surviving target as a replacement for its descriptor
//! 4. emit descriptor and proxy per target, parents first
//! 5. emit the registry from the collected triples
//!
//! A target that fails any step is reported and skipped; the rest of the run
//! continues without it.

use rustc_hash::FxHashSet;
use tracing::{debug, info, warn};
use veneer_types::{TargetSpec, TypeOracle};

use crate::emit::{
    AbstractionSynthesizer, EmitContext, ProxySynthesizer, RegistryEmitter, RegistryTriple,
};
use crate::error::GenerateError;
use crate::linker::{InheritanceLinker, LinkNode};
use crate::replacement::ReplacementRegistry;
use crate::resolver::{Ancestry, ComposedDescriptor, MemberResolver};
use crate::settings::GeneratorSettings;

/// One emitted source file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    /// File name, e.g. `Acme.IWidget.g.cs`
    pub name: String,
    pub contents: String,
}

/// Everything a run produced
#[derive(Debug, Clone, Default)]
pub struct GenerationOutput {
    /// Descriptors and proxies in emission order, registry last
    pub files: Vec<GeneratedFile>,
    /// Errors and warnings, in the order they were found
    pub diagnostics: Vec<GenerateError>,
    /// Registered `(target, descriptor, proxy)` triples
    pub triples: Vec<RegistryTriple>,
}

impl GenerationOutput {
    pub fn file(&self, name: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(GenerateError::is_fatal)
    }

    pub fn errors(&self) -> impl Iterator<Item = &GenerateError> {
        self.diagnostics.iter().filter(|d| d.is_fatal())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &GenerateError> {
        self.diagnostics.iter().filter(|d| !d.is_fatal())
    }
}

/// Drives one generation run against a type oracle
pub struct Generator<'a, O: TypeOracle + ?Sized> {
    oracle: &'a O,
    settings: &'a GeneratorSettings,
    replacements: &'a ReplacementRegistry,
}

impl<'a, O: TypeOracle + ?Sized> Generator<'a, O> {
    pub fn new(
        oracle: &'a O,
        settings: &'a GeneratorSettings,
        replacements: &'a ReplacementRegistry,
    ) -> Self {
        Self {
            oracle,
            settings,
            replacements,
        }
    }

    /// Generate every artifact for the given targets
    pub fn generate(&self, specs: &[TargetSpec]) -> GenerationOutput {
        let mut output = GenerationOutput::default();
        let resolver = MemberResolver::new(self.oracle, self.settings);

        let accepted = self.accept(&resolver, specs, &mut output.diagnostics);

        let nodes: Vec<LinkNode<'_>> = accepted
            .iter()
            .map(|(spec, ancestry)| LinkNode {
                spec: *spec,
                ancestors: ancestry.class_names().into_iter().map(String::from).collect(),
            })
            .collect();
        let forest = InheritanceLinker::link(&nodes);
        for (idx, error) in forest.errors() {
            warn!(target_type = nodes[*idx].spec.target_name(), "{}", error);
            output.diagnostics.push(error.clone());
        }
        for link in forest.links() {
            debug!(child = %link.child, parent = %link.parent, "linked proxies");
        }

        let mut replacements = self.replacements.clone();
        for &idx in forest.order() {
            let spec = nodes[idx].spec;
            replacements.register_target(spec.target_name(), &spec.descriptor_full_name());
        }

        let mut ctx = EmitContext::new(
            self.settings,
            &replacements,
            forest.order().iter().map(|&idx| nodes[idx].spec.target_name()),
        );
        for &idx in forest.order() {
            let spec = nodes[idx].spec;
            ctx.ignore_members(spec.target_name(), &spec.members_to_ignore);
        }
        let abstractions = AbstractionSynthesizer::new(&ctx);
        let proxies = ProxySynthesizer::new(&ctx);

        let mut composed: Vec<Option<ComposedDescriptor>> = vec![None; nodes.len()];
        for &idx in forest.order() {
            let spec = nodes[idx].spec;
            let ancestry = &accepted[idx].1;
            let parent = forest.parent(idx);
            let parent_spec = parent.map(|p| nodes[p].spec);
            let parent_descriptor = parent.and_then(|p| composed[p].as_ref());

            let surface =
                resolver.resolve_with(spec, ancestry, parent_spec.map(TargetSpec::target_name));
            let descriptor = resolver.descriptor_surface(spec, &surface, parent_descriptor);

            let abstraction = abstractions.emit(spec, &descriptor);
            let proxy = proxies.emit(spec, &surface, parent_spec);
            let next = ComposedDescriptor::new(spec, &descriptor, parent_descriptor);
            composed[idx] = Some(next);

            for warning in abstraction.warnings.into_iter().chain(proxy.warnings) {
                if !output.diagnostics.contains(&warning) {
                    warn!(target_type = spec.target_name(), "{}", warning);
                    output.diagnostics.push(warning);
                }
            }

            output.files.push(GeneratedFile {
                name: format!("{}.g.cs", spec.descriptor_full_name()),
                contents: abstraction.text,
            });
            output.files.push(GeneratedFile {
                name: format!("{}Proxy.g.cs", spec.target_name()),
                contents: proxy.text,
            });
            output.triples.push(RegistryTriple::new(
                spec.target_name(),
                spec.descriptor_full_name(),
                spec.proxy_full_name(),
            ));

            debug!(
                target_type = spec.target_name(),
                members = surface.len(),
                declared = descriptor.members.len(),
                "emitted target"
            );
        }

        output.files.push(GeneratedFile {
            name: self.settings.registry_file_name(),
            contents: RegistryEmitter::new(self.settings).emit(&output.triples),
        });

        info!(
            targets = output.triples.len(),
            files = output.files.len(),
            errors = output.errors().count(),
            warnings = output.warnings().count(),
            "generation finished"
        );
        output
    }

    /// Validate targets and resolve their ancestry, dropping the ones that fail
    fn accept<'s>(
        &self,
        resolver: &MemberResolver<'_, O>,
        specs: &'s [TargetSpec],
        diagnostics: &mut Vec<GenerateError>,
    ) -> Vec<(&'s TargetSpec, Ancestry)> {
        let mut seen = FxHashSet::default();
        let mut accepted = Vec::new();

        for spec in specs {
            let result = MemberResolver::<O>::validate(spec)
                .and_then(|()| {
                    if seen.insert(spec.target_name()) {
                        Ok(())
                    } else {
                        Err(GenerateError::configuration(
                            spec.target_name(),
                            "target is configured more than once",
                        ))
                    }
                })
                .and_then(|()| resolver.ancestry(spec));

            match result {
                Ok(ancestry) => accepted.push((spec, ancestry)),
                Err(error) => {
                    warn!(target_type = spec.target_name(), "skipping target: {}", error);
                    diagnostics.push(error);
                }
            }
        }

        accepted
    }
}
