use super::{MapContext, TypeMapper};
use crate::error::MapError;
use crate::symbols::TypeHandle;

/// Types carrying the data-type marker render as their declared name.
///
/// The data-type transpiler emits their definitions; this mapper only
/// refers to them and records the reference for imports.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataTypeMapper;

impl TypeMapper for DataTypeMapper {
    fn name(&self) -> &'static str {
        "data-type"
    }

    fn can_handle(&self, ty: TypeHandle, cx: &MapContext<'_, '_>) -> bool {
        cx.oracle().array_element(ty).is_none()
            && cx
                .model()
                .has_attribute(ty, cx.special().transpilation_source_attribute)
    }

    fn map_to(&self, ty: TypeHandle, cx: &mut MapContext<'_, '_>) -> Result<String, MapError> {
        let oracle = cx.oracle();
        let name = oracle.name(ty).to_string();
        cx.note_data_type(ty);

        let arguments = oracle.type_arguments(ty);
        if arguments.is_empty() {
            return Ok(name);
        }

        let mapped = arguments
            .into_iter()
            .map(|arg| cx.map_nested(arg))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(format!("{}<{}>", name, mapped.join(", ")))
    }
}
