use super::{MapContext, TypeMapper};
use crate::error::MapError;
use crate::symbols::TypeHandle;

const SEQUENCES: &[&str] = &[
    "System.ArraySegment`1",
    "System.Collections.Generic.List`1",
    "System.Collections.Generic.LinkedList`1",
    "System.Collections.Generic.Queue`1",
    "System.Collections.Generic.Stack`1",
    "System.Collections.Generic.HashSet`1",
    "System.Collections.Generic.IEnumerable`1",
    "System.Collections.Generic.IReadOnlyCollection`1",
    "System.Collections.Generic.IReadOnlyList`1",
    "System.Collections.Generic.ICollection`1",
    "System.Collections.Generic.IList`1",
    "System.Collections.Generic.ISet`1",
];

const DICTIONARIES: &[&str] = &[
    "System.Collections.Generic.Dictionary`2",
    "System.Collections.Generic.IDictionary`2",
    "System.Collections.Generic.IReadOnlyDictionary`2",
];

const NULLABLE: &str = "System.Nullable`1";

enum Collection {
    Array(TypeHandle),
    Sequence,
    Dictionary,
    Nullable,
}

/// Arrays, sequences, dictionaries, and `Nullable<T>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionMapper;

impl CollectionMapper {
    fn classify(ty: TypeHandle, cx: &MapContext<'_, '_>) -> Option<Collection> {
        let oracle = cx.oracle();
        if let Some(element) = oracle.array_element(ty) {
            return Some(Collection::Array(element));
        }

        if oracle.type_arguments(ty).is_empty() {
            return None;
        }

        let name = oracle.metadata_name(ty);
        if SEQUENCES.contains(&name.as_str()) {
            Some(Collection::Sequence)
        } else if DICTIONARIES.contains(&name.as_str()) {
            Some(Collection::Dictionary)
        } else if name == NULLABLE {
            Some(Collection::Nullable)
        } else {
            None
        }
    }
}

impl TypeMapper for CollectionMapper {
    fn name(&self) -> &'static str {
        "collection"
    }

    fn can_handle(&self, ty: TypeHandle, cx: &MapContext<'_, '_>) -> bool {
        Self::classify(ty, cx).is_some()
    }

    fn map_to(&self, ty: TypeHandle, cx: &mut MapContext<'_, '_>) -> Result<String, MapError> {
        let arguments = cx.oracle().type_arguments(ty);

        match Self::classify(ty, cx) {
            Some(Collection::Array(element)) => Ok(format!("{}[]", cx.map_nested(element)?)),
            Some(Collection::Sequence) => {
                let element = cx.type_argument(ty)?;
                Ok(format!("{}[]", cx.map_nested(element)?))
            }
            Some(Collection::Dictionary) => match arguments.as_slice() {
                [key, value] => Ok(format!(
                    "{{ [key: {}]: {} }}",
                    cx.map_nested(*key)?,
                    cx.map_nested(*value)?
                )),
                _ => Err(MapError::missing_argument(cx.oracle().metadata_name(ty))),
            },
            Some(Collection::Nullable) => {
                let inner = cx.type_argument(ty)?;
                Ok(format!("({} | undefined)", cx.map_nested(inner)?))
            }
            None => Err(MapError::unsupported(cx.oracle().display_string(ty))),
        }
    }
}
