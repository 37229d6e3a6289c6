//! In-memory type oracle.
//!
//! [`SymbolGraph`] is an arena of type and method symbols addressed by
//! [`TypeHandle`] and [`MethodHandle`]. Named types are declared through
//! [`TypeDecl`]; constructed generics and arrays are interned on demand so
//! structurally equal types always resolve to the same handle.
//!
//! # Example
//!
//! ```rust
//! use hubgen::symbols::{MethodDecl, SymbolGraph, TypeDecl, TypeOracle};
//!
//! let mut graph = SymbolGraph::with_core_library();
//! let hub = graph.declare(TypeDecl::class("TypedSignalR.Client", "HubAttribute"));
//! let task = graph.lookup("System.Threading.Tasks.Task").unwrap();
//! let chat = graph.declare(
//!     TypeDecl::interface("App.Chat", "IChatHub")
//!         .with_attribute(hub)
//!         .with_method(MethodDecl::new("Leave", task)),
//! );
//!
//! assert_eq!(graph.methods(chat).len(), 1);
//! ```

use std::collections::HashMap;

use super::corlib;
use super::{DeclarationScope, MethodHandle, Origin, Parameter, TypeHandle, TypeKind, TypeOracle};
use crate::error::SymbolError;

/// Kind of a method symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MethodKind {
    /// Ordinary instance method.
    #[default]
    Ordinary,
    /// Static member; never part of an RPC contract.
    Static,
    /// Compiler-generated member (accessors, constructors, ...).
    Synthesized,
}

#[derive(Debug, Clone)]
struct TypeSymbol {
    name: String,
    namespace: String,
    kind: TypeKind,
    origin: Origin,
    type_parameters: usize,
    keyword: Option<String>,
    attributes: Vec<TypeHandle>,
    bases: Vec<TypeHandle>,
    methods: Vec<MethodHandle>,
    definition: Option<TypeHandle>,
    arguments: Vec<TypeHandle>,
    element: Option<TypeHandle>,
}

#[derive(Debug, Clone)]
struct MethodSymbol {
    name: String,
    kind: MethodKind,
    parameters: Vec<Parameter>,
    return_type: TypeHandle,
}

/// Declaration of a named type.
#[derive(Debug, Clone)]
pub struct TypeDecl {
    name: String,
    namespace: String,
    kind: TypeKind,
    origin: Origin,
    type_parameters: usize,
    keyword: Option<String>,
    attributes: Vec<TypeHandle>,
    bases: Vec<TypeHandle>,
    methods: Vec<MethodDecl>,
}

impl TypeDecl {
    /// Start a declaration of the given kind.
    pub fn new(kind: TypeKind, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            kind,
            origin: Origin::Source,
            type_parameters: 0,
            keyword: None,
            attributes: Vec::new(),
            bases: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn class(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(TypeKind::Class, namespace, name)
    }

    pub fn structure(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(TypeKind::Struct, namespace, name)
    }

    pub fn interface(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(TypeKind::Interface, namespace, name)
    }

    pub fn enumeration(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(TypeKind::Enum, namespace, name)
    }

    /// Mark the type as coming from a referenced module.
    pub fn referenced(mut self) -> Self {
        self.origin = Origin::Referenced;
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Declare a generic definition with `count` type parameters.
    pub fn with_type_parameters(mut self, count: usize) -> Self {
        self.type_parameters = count;
        self
    }

    /// Language keyword used when displaying the type (`int`, `string`, ...).
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_attribute(mut self, attribute: TypeHandle) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn with_base(mut self, base: TypeHandle) -> Self {
        self.bases.push(base);
        self
    }

    pub fn with_method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }
}

/// Declaration of a method.
#[derive(Debug, Clone)]
pub struct MethodDecl {
    name: String,
    kind: MethodKind,
    parameters: Vec<Parameter>,
    return_type: TypeHandle,
}

impl MethodDecl {
    /// Ordinary instance method with no parameters.
    pub fn new(name: impl Into<String>, return_type: TypeHandle) -> Self {
        Self {
            name: name.into(),
            kind: MethodKind::Ordinary,
            parameters: Vec::new(),
            return_type,
        }
    }

    /// Append a parameter; declaration order is preserved.
    pub fn param(mut self, name: impl Into<String>, ty: TypeHandle) -> Self {
        self.parameters.push(Parameter {
            name: name.into(),
            ty,
        });
        self
    }

    pub fn with_kind(mut self, kind: MethodKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Arena-backed symbol table implementing [`TypeOracle`].
#[derive(Debug, Clone, Default)]
pub struct SymbolGraph {
    types: Vec<TypeSymbol>,
    methods: Vec<MethodSymbol>,
    /// Metadata name -> first declared fragment.
    definitions: HashMap<String, TypeHandle>,
    constructed: HashMap<(TypeHandle, Vec<TypeHandle>), TypeHandle>,
    arrays: HashMap<TypeHandle, TypeHandle>,
    declaration_order: Vec<TypeHandle>,
}

impl SymbolGraph {
    /// Create an empty graph. Not even the host runtime's types exist.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph seeded with the host runtime's standard types:
    /// primitives, collections, tasks, streams, and the cancellation token.
    /// Marker attributes are not part of the runtime and must be declared.
    pub fn with_core_library() -> Self {
        let mut graph = Self::new();
        corlib::seed(&mut graph);
        graph
    }

    /// Number of type symbols, including constructed generics and arrays.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Declare a named type and its methods.
    ///
    /// Declaring the same qualified name twice creates a second partial
    /// fragment with its own handle; lookups by metadata name keep returning
    /// the first fragment.
    pub fn declare(&mut self, decl: TypeDecl) -> TypeHandle {
        let handle = TypeHandle(self.types.len() as u32);
        let TypeDecl {
            name,
            namespace,
            kind,
            origin,
            type_parameters,
            keyword,
            attributes,
            bases,
            methods,
        } = decl;

        self.types.push(TypeSymbol {
            name,
            namespace,
            kind,
            origin,
            type_parameters,
            keyword,
            attributes,
            bases,
            methods: Vec::new(),
            definition: None,
            arguments: Vec::new(),
            element: None,
        });

        for method in methods {
            self.add_method(handle, method);
        }

        let metadata_name = self.metadata_name(handle);
        self.definitions.entry(metadata_name).or_insert(handle);
        self.declaration_order.push(handle);

        handle
    }

    /// Attach a method to an already declared type.
    pub fn add_method(&mut self, ty: TypeHandle, method: MethodDecl) -> MethodHandle {
        let handle = MethodHandle(self.methods.len() as u32);
        self.methods.push(MethodSymbol {
            name: method.name,
            kind: method.kind,
            parameters: method.parameters,
            return_type: method.return_type,
        });
        self.types[ty.index()].methods.push(handle);
        handle
    }

    pub fn add_attribute(&mut self, ty: TypeHandle, attribute: TypeHandle) {
        self.types[ty.index()].attributes.push(attribute);
    }

    pub fn add_base(&mut self, ty: TypeHandle, base: TypeHandle) {
        self.types[ty.index()].bases.push(base);
    }

    /// Look up a type definition by metadata name.
    pub fn lookup(&self, metadata_name: &str) -> Option<TypeHandle> {
        self.definitions.get(metadata_name).copied()
    }

    /// Look up a type definition by metadata name, failing if it is absent.
    pub fn require(&self, metadata_name: &str) -> Result<TypeHandle, SymbolError> {
        self.lookup(metadata_name)
            .ok_or_else(|| SymbolError::unresolved(metadata_name))
    }

    /// Construct (or fetch the interned) generic instantiation of a
    /// definition.
    pub fn construct(
        &mut self,
        definition: TypeHandle,
        arguments: &[TypeHandle],
    ) -> Result<TypeHandle, SymbolError> {
        let definition = self.original_definition(definition);
        let expected = self.types[definition.index()].type_parameters;
        if expected != arguments.len() {
            return Err(SymbolError::ArityMismatch {
                name: self.metadata_name(definition),
                expected,
                found: arguments.len(),
            });
        }

        let key = (definition, arguments.to_vec());
        if let Some(existing) = self.constructed.get(&key) {
            return Ok(*existing);
        }

        let def = &self.types[definition.index()];
        let symbol = TypeSymbol {
            name: def.name.clone(),
            namespace: def.namespace.clone(),
            kind: def.kind,
            origin: def.origin,
            type_parameters: 0,
            keyword: None,
            attributes: Vec::new(),
            bases: Vec::new(),
            methods: Vec::new(),
            definition: Some(definition),
            arguments: arguments.to_vec(),
            element: None,
        };

        let handle = TypeHandle(self.types.len() as u32);
        self.types.push(symbol);
        self.constructed.insert(key, handle);
        Ok(handle)
    }

    /// Construct by metadata name, e.g. ``construct_named("System.Threading.Tasks.Task`1", &[int])``.
    pub fn construct_named(
        &mut self,
        metadata_name: &str,
        arguments: &[TypeHandle],
    ) -> Result<TypeHandle, SymbolError> {
        let definition = self.require(metadata_name)?;
        self.construct(definition, arguments)
    }

    /// Single-dimensional array of `element`.
    pub fn array_of(&mut self, element: TypeHandle) -> TypeHandle {
        if let Some(existing) = self.arrays.get(&element) {
            return *existing;
        }

        let origin = self.symbol(element).origin;
        let handle = TypeHandle(self.types.len() as u32);
        self.types.push(TypeSymbol {
            name: String::new(),
            namespace: String::new(),
            kind: TypeKind::Array,
            origin,
            type_parameters: 0,
            keyword: None,
            attributes: Vec::new(),
            bases: Vec::new(),
            methods: Vec::new(),
            definition: None,
            arguments: Vec::new(),
            element: Some(element),
        });
        self.arrays.insert(element, handle);
        handle
    }

    fn symbol(&self, ty: TypeHandle) -> &TypeSymbol {
        &self.types[ty.index()]
    }

    fn definition_symbol(&self, ty: TypeHandle) -> &TypeSymbol {
        self.symbol(self.original_definition(ty))
    }
}

impl TypeOracle for SymbolGraph {
    fn declared_types(&self, scope: DeclarationScope) -> Vec<TypeHandle> {
        self.declaration_order
            .iter()
            .copied()
            .filter(|ty| match scope {
                DeclarationScope::Source => self.symbol(*ty).origin == Origin::Source,
                DeclarationScope::SourceAndReferenced => true,
            })
            .collect()
    }

    fn resolve_well_known(&self, metadata_name: &str) -> Option<TypeHandle> {
        self.lookup(metadata_name)
    }

    fn name(&self, ty: TypeHandle) -> &str {
        match self.symbol(ty).element {
            Some(element) => self.name(element),
            None => &self.symbol(ty).name,
        }
    }

    fn namespace(&self, ty: TypeHandle) -> &str {
        match self.symbol(ty).element {
            Some(element) => self.namespace(element),
            None => &self.symbol(ty).namespace,
        }
    }

    fn metadata_name(&self, ty: TypeHandle) -> String {
        if let Some(element) = self.symbol(ty).element {
            return format!("{}[]", self.metadata_name(element));
        }

        let def = self.definition_symbol(ty);
        let mut name = if def.namespace.is_empty() {
            def.name.clone()
        } else {
            format!("{}.{}", def.namespace, def.name)
        };
        if def.type_parameters > 0 {
            name.push_str(&format!("`{}", def.type_parameters));
        }
        name
    }

    fn display_string(&self, ty: TypeHandle) -> String {
        let symbol = self.symbol(ty);

        if let Some(element) = symbol.element {
            return format!("{}[]", self.display_string(element));
        }

        if let Some(keyword) = &symbol.keyword {
            return keyword.clone();
        }

        let qualified = self.qualified_name(ty);
        if symbol.arguments.is_empty() {
            return qualified;
        }

        let arguments: Vec<String> = symbol
            .arguments
            .iter()
            .map(|arg| self.display_string(*arg))
            .collect();
        format!("{}<{}>", qualified, arguments.join(", "))
    }

    fn kind(&self, ty: TypeHandle) -> TypeKind {
        self.symbol(ty).kind
    }

    fn attributes(&self, ty: TypeHandle) -> Vec<TypeHandle> {
        self.definition_symbol(ty).attributes.clone()
    }

    fn base_interfaces(&self, ty: TypeHandle) -> Vec<TypeHandle> {
        self.definition_symbol(ty).bases.clone()
    }

    fn methods(&self, ty: TypeHandle) -> Vec<MethodHandle> {
        self.definition_symbol(ty)
            .methods
            .iter()
            .copied()
            .filter(|m| self.methods[m.index()].kind == MethodKind::Ordinary)
            .collect()
    }

    fn type_parameter_count(&self, ty: TypeHandle) -> usize {
        self.symbol(ty).type_parameters
    }

    fn original_definition(&self, ty: TypeHandle) -> TypeHandle {
        self.symbol(ty).definition.unwrap_or(ty)
    }

    fn type_arguments(&self, ty: TypeHandle) -> Vec<TypeHandle> {
        self.symbol(ty).arguments.clone()
    }

    fn array_element(&self, ty: TypeHandle) -> Option<TypeHandle> {
        self.symbol(ty).element
    }

    fn method_name(&self, method: MethodHandle) -> &str {
        &self.methods[method.index()].name
    }

    fn parameters(&self, method: MethodHandle) -> Vec<Parameter> {
        self.methods[method.index()].parameters.clone()
    }

    fn return_type(&self, method: MethodHandle) -> TypeHandle {
        self.methods[method.index()].return_type
    }
}
