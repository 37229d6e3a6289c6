//! Generation pipeline.
//!
//! `Discover -> Classify -> Map -> Render -> Emit`, once per call to
//! [`Generator::generate`]. Every run builds a fresh [`SymbolModel`] over the
//! oracle it is given, so nothing leaks between runs.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::api::ApiGenerator;
use crate::binding::{Binder, MappedInterface};
use crate::config::{ConfigManager, Options};
use crate::descriptor::{discover, InterfaceDescriptor};
use crate::diagnostics::Diagnostic;
use crate::error::GenerateResult;
use crate::mapper::{MapperChain, OverrideMapper, TypeMapper};
use crate::special::SpecialSymbols;
use crate::symbols::{DeclarationScope, SymbolModel, TypeOracle};
use crate::transpiler::InterfaceTranspiler;

/// One output file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedUnit {
    /// Path relative to the output root, `/`-separated.
    pub path: String,
    pub content: String,
}

/// Everything a run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GenerationOutput {
    /// Interface files sorted by namespace, then the aggregate file.
    pub units: Vec<GeneratedUnit>,
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationOutput {
    /// Find a unit by its relative path.
    pub fn unit(&self, path: &str) -> Option<&GeneratedUnit> {
        self.units.iter().find(|u| u.path == path)
    }

    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Client binding generator.
///
/// # Example
///
/// ```rust
/// use hubgen::symbols::{MethodDecl, SymbolGraph, TypeDecl};
/// use hubgen::{Generator, Options};
///
/// let mut graph = SymbolGraph::with_core_library();
/// let hub = graph.declare(TypeDecl::class("TypedSignalR.Client", "HubAttribute"));
/// graph.declare(TypeDecl::class("TypedSignalR.Client", "ReceiverAttribute"));
/// graph.declare(TypeDecl::class("Tapper", "TranspilationSourceAttribute"));
///
/// let task = graph.lookup("System.Threading.Tasks.Task").unwrap();
/// graph.declare(
///     TypeDecl::interface("App", "IChatHub")
///         .with_attribute(hub)
///         .with_method(MethodDecl::new("Leave", task)),
/// );
///
/// let output = Generator::new(Options::default()).generate(&graph).unwrap();
/// let index = output.unit("hubs/index.ts").unwrap();
/// assert!(index.content.contains("this.connection.invoke(\"Leave\")"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Generator {
    options: Options,
    mappers: MapperChain,
    fallbacks: MapperChain,
}

impl Generator {
    pub fn new(options: Options) -> Self {
        Self {
            options,
            mappers: MapperChain::new(),
            fallbacks: MapperChain::new(),
        }
    }

    /// Register a mapper that takes priority over the built-ins.
    ///
    /// Mappers registered earlier win over mappers registered later.
    /// Configured type overrides still come first.
    pub fn with_mapper(mut self, mapper: impl TypeMapper + 'static) -> Self {
        self.mappers.push(Arc::new(mapper));
        self
    }

    /// Register a mapper consulted only for types no built-in handles.
    pub fn with_fallback(mut self, mapper: impl TypeMapper + 'static) -> Self {
        self.fallbacks.push(Arc::new(mapper));
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The full chain: overrides, registered mappers, built-ins, fallbacks.
    pub fn mapper_chain(&self) -> MapperChain {
        let mut chain = MapperChain::new();

        let overrides = OverrideMapper::new(self.options.transpile.type_overrides.clone());
        if !overrides.is_empty() {
            chain.push(Arc::new(overrides));
        }
        chain.extend(&self.mappers);
        chain.extend(&MapperChain::builtin());
        chain.extend(&self.fallbacks);

        chain
    }

    /// Run the pipeline against `oracle`.
    ///
    /// Fails only when the options are invalid or a marker attribute cannot
    /// be resolved. Problems with individual interfaces or methods are
    /// returned as diagnostics next to the units that could be produced.
    pub fn generate(&self, oracle: &dyn TypeOracle) -> GenerateResult<GenerationOutput> {
        ConfigManager::validate(&self.options)?;

        let special = SpecialSymbols::resolve(oracle, &self.options.symbols)?;
        let model = SymbolModel::new(oracle);
        let scope = DeclarationScope::from_include_referenced(self.options.transpile.include_referenced_modules);

        let discovery = discover(&model, &special, scope, self.options.naming_policy());
        let mut diagnostics = discovery.diagnostics;

        let chain = self.mapper_chain();
        let binder = Binder::new(&model, &special, &chain);
        let bind_all = |interfaces: &[InterfaceDescriptor], diagnostics: &mut Vec<Diagnostic>| {
            interfaces
                .iter()
                .map(|interface| binder.bind(interface, diagnostics))
                .collect::<Vec<MappedInterface>>()
        };
        let hubs = bind_all(&discovery.hubs, &mut diagnostics);
        let receivers = bind_all(&discovery.receivers, &mut diagnostics);

        let all: Vec<MappedInterface> = hubs.iter().chain(receivers.iter()).cloned().collect();
        let mut units = InterfaceTranspiler::new(&self.options).transpile(&all);
        units.push(ApiGenerator::new(&self.options).generate(&hubs, &receivers));

        info!(
            units = units.len(),
            diagnostics = diagnostics.len(),
            "generation finished"
        );

        Ok(GenerationOutput { units, diagnostics })
    }
}
