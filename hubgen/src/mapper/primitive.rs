use super::{MapContext, TypeMapper};
use crate::error::MapError;
use crate::symbols::TypeHandle;

/// Runtime primitives keyed by metadata name.
const PRIMITIVES: &[(&str, &str)] = &[
    ("System.Boolean", "boolean"),
    ("System.Byte", "number"),
    ("System.SByte", "number"),
    ("System.Int16", "number"),
    ("System.UInt16", "number"),
    ("System.Int32", "number"),
    ("System.UInt32", "number"),
    ("System.Int64", "number"),
    ("System.UInt64", "number"),
    ("System.Single", "number"),
    ("System.Double", "number"),
    ("System.Decimal", "number"),
    ("System.Char", "string"),
    ("System.String", "string"),
    ("System.Guid", "string"),
    ("System.Uri", "string"),
    ("System.DateTime", "(Date | string)"),
    ("System.DateTimeOffset", "(Date | string)"),
    ("System.Object", "any"),
];

/// Primitives, strings, dates, and `object`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PrimitiveMapper;

impl PrimitiveMapper {
    fn lookup(ty: TypeHandle, cx: &MapContext<'_, '_>) -> Option<&'static str> {
        let name = cx.oracle().metadata_name(ty);
        PRIMITIVES
            .iter()
            .find(|(source, _)| *source == name)
            .map(|(_, target)| *target)
    }
}

impl TypeMapper for PrimitiveMapper {
    fn name(&self) -> &'static str {
        "primitive"
    }

    fn can_handle(&self, ty: TypeHandle, cx: &MapContext<'_, '_>) -> bool {
        Self::lookup(ty, cx).is_some()
    }

    fn map_to(&self, ty: TypeHandle, cx: &mut MapContext<'_, '_>) -> Result<String, MapError> {
        Self::lookup(ty, cx)
            .map(str::to_string)
            .ok_or_else(|| MapError::unsupported(cx.oracle().display_string(ty)))
    }
}
