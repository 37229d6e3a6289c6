//! Per-run adapter over a [`TypeOracle`].
//!
//! Whole-program scans are expensive on a real compiler, so the model
//! memoizes them. The caches live on the model itself and the model lives
//! for exactly one generation run, which keeps separate runs against
//! separate oracles from ever observing each other's symbols.

use std::cell::OnceCell;
use std::collections::{HashMap, HashSet};

use tracing::trace;

use super::{DeclarationScope, MethodHandle, TypeHandle, TypeOracle};

pub struct SymbolModel<'o> {
    oracle: &'o dyn TypeOracle,
    source_types: OnceCell<Vec<TypeHandle>>,
    all_types: OnceCell<Vec<TypeHandle>>,
    /// Metadata name -> every declared fragment, in declaration order.
    fragments: OnceCell<HashMap<String, Vec<TypeHandle>>>,
}

impl<'o> SymbolModel<'o> {
    pub fn new(oracle: &'o dyn TypeOracle) -> Self {
        Self {
            oracle,
            source_types: OnceCell::new(),
            all_types: OnceCell::new(),
            fragments: OnceCell::new(),
        }
    }

    pub fn oracle(&self) -> &'o dyn TypeOracle {
        self.oracle
    }

    /// Declared types in the given scope. Scanned once per scope.
    pub fn declared_types(&self, scope: DeclarationScope) -> &[TypeHandle] {
        let cell = match scope {
            DeclarationScope::Source => &self.source_types,
            DeclarationScope::SourceAndReferenced => &self.all_types,
        };

        cell.get_or_init(|| {
            let types = self.oracle.declared_types(scope);
            trace!(?scope, count = types.len(), "cached declared types");
            types
        })
    }

    /// All fragments sharing the definition's metadata name.
    ///
    /// Types the oracle never reports as declared (constructed generics
    /// resolve to their definition first) come back as a single fragment.
    pub fn fragments_of(&self, ty: TypeHandle) -> Vec<TypeHandle> {
        let definition = self.oracle.original_definition(ty);
        let index = self.fragments.get_or_init(|| {
            let mut index: HashMap<String, Vec<TypeHandle>> = HashMap::new();
            for declared in self.declared_types(DeclarationScope::SourceAndReferenced) {
                index
                    .entry(self.oracle.metadata_name(*declared))
                    .or_default()
                    .push(*declared);
            }
            trace!(definitions = index.len(), "cached fragment index");
            index
        });

        index
            .get(&self.oracle.metadata_name(definition))
            .cloned()
            .unwrap_or_else(|| vec![definition])
    }

    /// Whether any fragment of the type's definition carries `attribute`.
    pub fn has_attribute(&self, ty: TypeHandle, attribute: TypeHandle) -> bool {
        self.fragments_of(ty)
            .into_iter()
            .any(|fragment| self.oracle.attributes(fragment).contains(&attribute))
    }

    /// Declared types in scope carrying `attribute`, in declaration order.
    /// Every fragment is reported, marked or not, once any of them is marked.
    pub fn annotated_types(&self, scope: DeclarationScope, attribute: TypeHandle) -> Vec<TypeHandle> {
        self.declared_types(scope)
            .iter()
            .copied()
            .filter(|ty| self.has_attribute(*ty, attribute))
            .collect()
    }

    /// Whether `ty` is a constructed generic of `definition`. An absent
    /// definition never matches.
    pub fn is_constructed_from(&self, ty: TypeHandle, definition: Option<TypeHandle>) -> bool {
        match definition {
            Some(definition) => {
                !self.oracle.type_arguments(ty).is_empty()
                    && self.oracle.original_definition(ty) == definition
            }
            None => false,
        }
    }

    pub fn first_type_argument(&self, ty: TypeHandle) -> Option<TypeHandle> {
        self.oracle.type_arguments(ty).first().copied()
    }

    /// Methods of an interface declared through `fragments`, with every
    /// inherited method flattened in.
    ///
    /// Own methods come first in fragment order, then each base interface
    /// depth-first in declaration order. A base reached through several
    /// paths contributes its methods once. A base method whose name was
    /// already contributed, by a more derived interface or an earlier base,
    /// is hidden.
    pub fn flattened_methods(&self, fragments: &[TypeHandle]) -> Vec<MethodHandle> {
        let mut visited = HashSet::new();
        if let Some(first) = fragments.first() {
            visited.insert(self.oracle.metadata_name(*first));
        }

        let mut seen = HashSet::new();
        let mut methods = Vec::new();
        self.flatten_into(fragments, &mut visited, &mut seen, &mut methods);
        methods
    }

    fn flatten_into(
        &self,
        fragments: &[TypeHandle],
        visited: &mut HashSet<String>,
        seen: &mut HashSet<MethodHandle>,
        methods: &mut Vec<MethodHandle>,
    ) {
        let taken: HashSet<&str> = methods
            .iter()
            .map(|method| self.oracle.method_name(*method))
            .collect();

        for fragment in fragments {
            for method in self.oracle.methods(*fragment) {
                let name = self.oracle.method_name(method);
                if taken.contains(name) {
                    trace!(method = %name, "base method hidden by derived member");
                    continue;
                }
                if seen.insert(method) {
                    methods.push(method);
                }
            }
        }

        for fragment in fragments {
            for base in self.oracle.base_interfaces(*fragment) {
                if visited.insert(self.oracle.metadata_name(base)) {
                    let base_fragments = self.fragments_of(base);
                    self.flatten_into(&base_fragments, visited, seen, methods);
                }
            }
        }
    }
}
