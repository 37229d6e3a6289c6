use std::collections::BTreeMap;

use super::{MapContext, TypeMapper};
use crate::error::MapError;
use crate::symbols::TypeHandle;

/// Configured literal renderings keyed by metadata name.
///
/// Overrides win over every other mapper. A constructed generic is matched
/// by its definition's metadata name and its type arguments are ignored.
#[derive(Debug, Clone, Default)]
pub struct OverrideMapper {
    overrides: BTreeMap<String, String>,
}

impl OverrideMapper {
    pub fn new(overrides: BTreeMap<String, String>) -> Self {
        Self { overrides }
    }

    /// Add a custom type override.
    pub fn add_override(&mut self, metadata_name: impl Into<String>, target: impl Into<String>) {
        self.overrides.insert(metadata_name.into(), target.into());
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    fn lookup(&self, ty: TypeHandle, cx: &MapContext<'_, '_>) -> Option<&String> {
        self.overrides.get(&cx.oracle().metadata_name(ty))
    }
}

impl TypeMapper for OverrideMapper {
    fn name(&self) -> &'static str {
        "override"
    }

    fn can_handle(&self, ty: TypeHandle, cx: &MapContext<'_, '_>) -> bool {
        self.lookup(ty, cx).is_some()
    }

    fn map_to(&self, ty: TypeHandle, cx: &mut MapContext<'_, '_>) -> Result<String, MapError> {
        self.lookup(ty, cx)
            .cloned()
            .ok_or_else(|| MapError::unsupported(cx.oracle().display_string(ty)))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::super::test_support::{graph, special};
    use super::super::{MapperChain, Position};
    use super::*;
    use crate::symbols::{SymbolModel, TypeDecl};

    #[test]
    fn test_override_wins_and_applies_nested() {
        let (mut graph, _) = graph();
        let big = graph.declare(TypeDecl::structure("System.Numerics", "BigInteger").referenced());
        let int = graph.lookup("System.Int32").unwrap();
        let list = graph
            .construct_named("System.Collections.Generic.List`1", &[big])
            .unwrap();

        let mut overrides = OverrideMapper::default();
        overrides.add_override("System.Numerics.BigInteger", "bigint");
        overrides.add_override("System.Int32", "Int32");

        let mut chain = MapperChain::builtin();
        chain.push_front(Arc::new(overrides));

        let special = special(&graph);
        let model = SymbolModel::new(&graph);

        let mapped = chain.map_type(&model, &special, list, Position::Argument).unwrap();
        assert_eq!(mapped.text, "bigint[]");
        let mapped = chain.map_type(&model, &special, int, Position::Argument).unwrap();
        assert_eq!(mapped.text, "Int32");
    }
}
