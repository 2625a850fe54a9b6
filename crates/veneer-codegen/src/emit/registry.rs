//! Registry emission
//!
//! One file per run holding the `ProxyMap` lookup tables, an explicit
//! `Initialize()` that registers every generated triple, and the null-safe
//! `Adapter` the forwarding code calls.

use rustc_hash::FxHashSet;
use veneer_types::TypeName;

use super::{write_epilogue, write_preamble, CodeWriter};
use crate::settings::GeneratorSettings;

/// A target with its generated descriptor and proxy, all fully qualified
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RegistryTriple {
    pub target: String,
    pub abstraction: String,
    pub wrapper: String,
}

impl RegistryTriple {
    pub fn new(
        target: impl Into<String>,
        abstraction: impl Into<String>,
        wrapper: impl Into<String>,
    ) -> Self {
        Self {
            target: target.into(),
            abstraction: abstraction.into(),
            wrapper: wrapper.into(),
        }
    }
}

const DICTIONARY: &str = "global::System.Collections.Concurrent.ConcurrentDictionary";

pub struct RegistryEmitter<'a> {
    settings: &'a GeneratorSettings,
}

impl<'a> RegistryEmitter<'a> {
    pub fn new(settings: &'a GeneratorSettings) -> Self {
        Self { settings }
    }

    /// Emit the registry; repeated triples are registered once
    pub fn emit(&self, triples: &[RegistryTriple]) -> String {
        let namespace = self.settings.runtime_namespace.as_str();
        let nullable = if self.settings.supports_nullable { "?" } else { "" };
        let mut w = CodeWriter::new();
        write_preamble(&mut w, self.settings, namespace);

        w.open("public static class ProxyMap");
        for field in ["s_hostToMapped", "s_proxyToMapped", "s_mappedToHost"] {
            w.line(format!(
                "private static readonly {}<Type, Type> {} = new();",
                DICTIONARY, field
            ));
        }
        w.line(format!(
            "private static readonly {}<Type, Func<object, object>> s_factories = new();",
            DICTIONARY
        ));
        w.line("private static readonly object s_initLock = new();");
        w.line("private static volatile bool s_initialized;");
        w.blank();

        self.initialize(&mut w, triples);
        w.blank();

        w.open("public static void Add<TTarget, TAbstraction, TProxy>(Func<TTarget, TProxy> factory)");
        w.line("s_hostToMapped.TryAdd(typeof(TTarget), typeof(TAbstraction));");
        w.line("s_proxyToMapped.TryAdd(typeof(TProxy), typeof(TAbstraction));");
        w.line("s_mappedToHost.TryAdd(typeof(TAbstraction), typeof(TTarget));");
        w.line("s_factories.TryAdd(typeof(TAbstraction), instance => factory((TTarget) instance)!);");
        w.close();
        w.blank();

        for (name, table, param) in [
            ("GetMappedTypeFromHostType", "s_hostToMapped", "hostType"),
            ("GetMappedTypeFromProxyType", "s_proxyToMapped", "proxyType"),
            ("GetHostTypeFromMappedType", "s_mappedToHost", "mappedType"),
        ] {
            w.open(format!("public static Type{} {}(Type {})", nullable, name, param));
            w.line(format!(
                "return {}.TryGetValue({}, out var mapped) ? mapped : null;",
                table, param
            ));
            w.close();
            w.blank();
        }

        w.open(format!(
            "public static Func<object, object>{} GetFactory(Type mappedType)",
            nullable
        ));
        w.line("return s_factories.TryGetValue(mappedType, out var factory) ? factory : null;");
        w.close();
        w.blank();

        w.open("public static object CreateProxy(Type mappedType, object instance)");
        w.open("if (!s_factories.TryGetValue(mappedType, out var factory))");
        w.line("throw new InvalidOperationException(\"No proxy factory registered for '\" + mappedType + \"'.\");");
        w.close();
        w.line("return factory(instance);");
        w.close();
        w.blank();

        w.open("public static T CreateProxy<T>(object instance) where T : class");
        w.line("return (T) CreateProxy(typeof(T), instance);");
        w.close();
        w.close();
        w.blank();

        w.open("public static class Adapter");
        w.open(format!("public static T{} Adapt<T>(object{} source)", nullable, nullable));
        w.open("if (source is null)");
        w.line("return default;");
        w.close();
        w.line(format!("return {}<T>(source);", self.settings.object_mapper));
        w.close();
        w.close();

        write_epilogue(&mut w, self.settings, namespace);
        w.finish()
    }

    fn initialize(&self, w: &mut CodeWriter, triples: &[RegistryTriple]) {
        w.open("public static void Initialize()");
        w.open("if (s_initialized)");
        w.line("return;");
        w.close();
        w.open("lock (s_initLock)");
        w.open("if (s_initialized)");
        w.line("return;");
        w.close();

        let mut seen = FxHashSet::default();
        for triple in triples.iter().filter(|t| seen.insert(*t)) {
            let target = TypeName::qualified(&triple.target);
            let abstraction = TypeName::qualified(&triple.abstraction);
            let wrapper = TypeName::qualified(&triple.wrapper);
            w.line(format!(
                "Add<{}, {}, {}>(instance => new {}(instance));",
                target, abstraction, wrapper, wrapper
            ));
        }

        w.line("s_initialized = true;");
        w.close();
        w.close();
    }
}
