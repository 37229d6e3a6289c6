//! # hubgen
//!
//! Generates typed TypeScript client bindings for real-time RPC hubs.
//!
//! Interfaces marked as hubs (called by the client) or receivers (called by
//! the server) are read from a compiled program's symbol graph through the
//! [`TypeOracle`] trait. Every method is classified as unary,
//! server-to-client streaming, or client-to-server streaming, its types are
//! rendered through an extensible [`MapperChain`], and the generator emits:
//!
//! - one interface file per namespace (`hubs/<namespace>.ts`)
//! - one aggregate file (`hubs/index.ts`) with proxy factories for hubs and
//!   listener binders for receivers, keyed by interface name
//!
//! ## Quick Start
//!
//! ```rust
//! use hubgen::symbols::{MethodDecl, SymbolGraph, TypeDecl};
//! use hubgen::{Generator, Options};
//!
//! let mut graph = SymbolGraph::with_core_library();
//! let hub = graph.declare(TypeDecl::class("TypedSignalR.Client", "HubAttribute"));
//! graph.declare(TypeDecl::class("TypedSignalR.Client", "ReceiverAttribute"));
//! graph.declare(TypeDecl::class("Tapper", "TranspilationSourceAttribute"));
//!
//! let int = graph.lookup("System.Int32").unwrap();
//! let task_int = graph.construct_named("System.Threading.Tasks.Task`1", &[int]).unwrap();
//! graph.declare(
//!     TypeDecl::interface("App", "ICalculatorHub")
//!         .with_attribute(hub)
//!         .with_method(MethodDecl::new("Add", task_int).param("x", int).param("y", int)),
//! );
//!
//! let output = Generator::new(Options::default()).generate(&graph).unwrap();
//! let file = output.unit("hubs/App.ts").unwrap();
//! assert!(file.content.contains("add(x: number, y: number): Promise<number>;"));
//! ```
//!
//! A host compiler plugin can also describe its program as JSON and load it
//! with [`SymbolGraph::from_json_str`](symbols::SymbolGraph::from_json_str).

pub mod api;
pub mod binding;
pub mod classify;
pub mod config;
pub mod descriptor;
pub mod diagnostics;
pub mod error;
pub mod generator;
pub mod mapper;
pub mod naming;
pub mod special;
pub mod symbols;
pub mod transpiler;
pub mod writer;

pub use classify::{InterfaceRole, MethodShape};
pub use config::{ConfigManager, NewLine, Options, SerializerMode};
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use error::{ConfigError, GenerateError, GenerateResult, MapError, SymbolError};
pub use generator::{GeneratedUnit, GenerationOutput, Generator};
pub use mapper::{MapContext, MapperChain, Position, TypeMapper};
pub use naming::{NamingPolicy, NamingStyle};
pub use symbols::{SymbolGraph, SymbolManifest, TypeOracle};
