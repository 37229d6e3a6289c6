//! Symbol model.
//!
//! The host compiler that owns the program's types is an external
//! collaborator. This module defines the narrow [`TypeOracle`] interface the
//! engine asks it questions through, plus:
//!
//! - [`SymbolGraph`] - an in-memory oracle (arena of type and method symbols)
//! - [`SymbolManifest`] - a JSON description a host plugin can dump and the
//!   graph can be loaded from
//! - [`SymbolModel`] - the per-run adapter that memoizes whole-program scans
//!   and flattens interface inheritance

mod corlib;
pub mod graph;
pub mod manifest;
pub mod model;

use std::fmt;

pub use graph::{MethodDecl, SymbolGraph, TypeDecl};
pub use manifest::SymbolManifest;
pub use model::SymbolModel;

/// Opaque reference to a type symbol.
///
/// Identity is the oracle's own equality. Oracles must intern constructed
/// generics and arrays so that structurally equal types share one handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeHandle(pub(crate) u32);

/// Opaque reference to a method symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MethodHandle(pub(crate) u32);

impl TypeHandle {
    /// Build a handle from a raw index. Only meaningful to the oracle that
    /// issued the index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// The raw index behind this handle.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl MethodHandle {
    /// Build a handle from a raw index.
    pub fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// The raw index behind this handle.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type#{}", self.0)
    }
}

/// Kind of a type symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    /// Single-dimensional array; the element type is available through
    /// [`TypeOracle::array_element`].
    Array,
}

/// Where a declared type comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Declared in the program being transpiled.
    #[default]
    Source,
    /// Declared in a referenced module.
    Referenced,
}

/// Which declarations a whole-program scan covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationScope {
    /// Only types declared in the program's own sources.
    Source,
    /// Source types plus every type declared in referenced modules.
    SourceAndReferenced,
}

impl DeclarationScope {
    /// Select the scope matching the `include_referenced_modules` option.
    pub fn from_include_referenced(include_referenced: bool) -> Self {
        if include_referenced {
            Self::SourceAndReferenced
        } else {
            Self::Source
        }
    }
}

/// A method parameter as surfaced by the oracle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: String,
    pub ty: TypeHandle,
}

/// Read-only view of the host compiler's symbol table.
///
/// All queries are synchronous in-memory lookups. Handles passed in must have
/// been issued by the same oracle.
pub trait TypeOracle {
    /// Every named type declared in the given scope, in declaration order.
    ///
    /// A type declared through several partial fragments is reported once
    /// per fragment.
    fn declared_types(&self, scope: DeclarationScope) -> Vec<TypeHandle>;

    /// Resolve a type definition by its fully qualified metadata name
    /// (generic definitions carry a `` `N `` arity suffix).
    fn resolve_well_known(&self, metadata_name: &str) -> Option<TypeHandle>;

    /// Simple (unqualified) name of the type, without arity suffix.
    fn name(&self, ty: TypeHandle) -> &str;

    /// Containing namespace path, e.g. `App.Interfaces.Chat`.
    fn namespace(&self, ty: TypeHandle) -> &str;

    /// Fully qualified metadata name of the type's definition.
    fn metadata_name(&self, ty: TypeHandle) -> String;

    /// Human readable rendering of the type as the source language shows it.
    fn display_string(&self, ty: TypeHandle) -> String;

    fn kind(&self, ty: TypeHandle) -> TypeKind;

    /// Attribute classes applied to the type.
    fn attributes(&self, ty: TypeHandle) -> Vec<TypeHandle>;

    /// Directly declared base interfaces.
    fn base_interfaces(&self, ty: TypeHandle) -> Vec<TypeHandle>;

    /// Ordinary instance methods declared on the type itself. Static and
    /// compiler-synthesized members are never reported.
    fn methods(&self, ty: TypeHandle) -> Vec<MethodHandle>;

    /// Number of type parameters on a generic definition (zero otherwise).
    fn type_parameter_count(&self, ty: TypeHandle) -> usize;

    /// Generic definition of a constructed type; the type itself otherwise.
    fn original_definition(&self, ty: TypeHandle) -> TypeHandle;

    /// Type arguments of a constructed generic type.
    fn type_arguments(&self, ty: TypeHandle) -> Vec<TypeHandle>;

    /// Element type of an array type.
    fn array_element(&self, ty: TypeHandle) -> Option<TypeHandle>;

    fn method_name(&self, method: MethodHandle) -> &str;

    fn parameters(&self, method: MethodHandle) -> Vec<Parameter>;

    fn return_type(&self, method: MethodHandle) -> TypeHandle;

    /// Whether the type is a generic definition or a constructed generic.
    fn is_generic(&self, ty: TypeHandle) -> bool {
        self.type_parameter_count(ty) > 0 || !self.type_arguments(ty).is_empty()
    }

    /// Namespace-qualified name of the type's definition, used to merge
    /// partial fragments.
    fn qualified_name(&self, ty: TypeHandle) -> String {
        let namespace = self.namespace(ty);
        if namespace.is_empty() {
            self.name(ty).to_string()
        } else {
            format!("{}.{}", namespace, self.name(ty))
        }
    }
}
