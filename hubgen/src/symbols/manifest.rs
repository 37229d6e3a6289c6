//! JSON symbol manifests.
//!
//! A host-compiler plugin can dump the parts of its symbol table the
//! generator needs as JSON; [`SymbolGraph::from_json_str`] loads it back into
//! an in-memory oracle.
//!
//! Type references are written as:
//!
//! | JSON | Meaning |
//! |------|---------|
//! | `"System.Int32"` | named type by metadata name |
//! | `{ "definition": "System.Threading.Tasks.Task`1", "arguments": ["System.Int32"] }` | constructed generic |
//! | `{ "array": "System.String" }` | single-dimensional array |

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::graph::{MethodDecl, MethodKind, SymbolGraph, TypeDecl};
use super::{Origin, TypeHandle, TypeKind, TypeOracle};
use crate::error::SymbolError;

/// Serializable description of a symbol graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SymbolManifest {
    /// Seed the host runtime's standard types before loading `types`.
    pub core_library: bool,

    /// Declared types in declaration order. Repeating a qualified name
    /// declares another partial fragment.
    pub types: Vec<TypeEntry>,
}

impl Default for SymbolManifest {
    fn default() -> Self {
        Self {
            core_library: true,
            types: Vec::new(),
        }
    }
}

/// A declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeEntry {
    pub name: String,
    #[serde(default)]
    pub namespace: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub origin: Origin,
    #[serde(default)]
    pub type_parameters: usize,
    /// Metadata names of the applied attribute classes.
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub bases: Vec<TypeRef>,
    #[serde(default)]
    pub methods: Vec<MethodEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodEntry {
    pub name: String,
    #[serde(default)]
    pub kind: MethodKind,
    #[serde(default)]
    pub parameters: Vec<ParameterEntry>,
    pub returns: TypeRef,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: TypeRef,
}

/// Reference to a type from inside a manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeRef {
    Named(String),
    Generic {
        definition: String,
        arguments: Vec<TypeRef>,
    },
    Array {
        array: Box<TypeRef>,
    },
}

impl SymbolGraph {
    /// Parse a JSON manifest and build the graph it describes.
    pub fn from_json_str(json: &str) -> Result<Self, SymbolError> {
        let manifest: SymbolManifest = serde_json::from_str(json)?;
        Self::from_manifest(&manifest)
    }

    /// Build a graph from a manifest.
    ///
    /// Every type is declared before any reference is resolved, so entries
    /// may refer to types that appear later in the list.
    pub fn from_manifest(manifest: &SymbolManifest) -> Result<Self, SymbolError> {
        let mut graph = if manifest.core_library {
            Self::with_core_library()
        } else {
            Self::new()
        };

        let mut handles = Vec::with_capacity(manifest.types.len());
        for entry in &manifest.types {
            let handle = graph.declare(
                TypeDecl::new(entry.kind, entry.namespace.clone(), entry.name.clone())
                    .with_origin(entry.origin)
                    .with_type_parameters(entry.type_parameters),
            );

            let metadata_name = graph.metadata_name(handle);
            if let Some(first) = graph.lookup(&metadata_name) {
                if graph.kind(first) != entry.kind {
                    return Err(SymbolError::DuplicateDefinition {
                        name: metadata_name,
                        first: format!("{:?}", graph.kind(first)).to_lowercase(),
                        second: format!("{:?}", entry.kind).to_lowercase(),
                    });
                }
            }
            handles.push(handle);
        }

        for (entry, handle) in manifest.types.iter().zip(handles) {
            for attribute in &entry.attributes {
                let attribute = graph.require(attribute)?;
                graph.add_attribute(handle, attribute);
            }

            for base in &entry.bases {
                let base = graph.resolve(base)?;
                graph.add_base(handle, base);
            }

            for method in &entry.methods {
                let return_type = graph.resolve(&method.returns)?;
                let mut decl = MethodDecl::new(method.name.clone(), return_type).with_kind(method.kind);
                for parameter in &method.parameters {
                    let ty = graph.resolve(&parameter.ty)?;
                    decl = decl.param(parameter.name.clone(), ty);
                }
                graph.add_method(handle, decl);
            }
        }

        debug!(
            declared = manifest.types.len(),
            symbols = graph.type_count(),
            "loaded symbol manifest"
        );

        Ok(graph)
    }

    /// Resolve a manifest type reference, constructing generics and arrays
    /// as needed.
    pub fn resolve(&mut self, reference: &TypeRef) -> Result<TypeHandle, SymbolError> {
        match reference {
            TypeRef::Named(name) => self.require(name),
            TypeRef::Generic {
                definition,
                arguments,
            } => {
                let definition = self.require(definition)?;
                let arguments = arguments
                    .iter()
                    .map(|arg| self.resolve(arg))
                    .collect::<Result<Vec<_>, _>>()?;
                self.construct(definition, &arguments)
            }
            TypeRef::Array { array } => {
                let element = self.resolve(array)?;
                Ok(self.array_of(element))
            }
        }
    }
}
