use super::{MapContext, Position, TransportWrapper, TypeMapper};
use crate::classify::is_stream;
use crate::error::MapError;
use crate::symbols::TypeHandle;

/// `Task` -> `Promise<void>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskMapper;

impl TypeMapper for TaskMapper {
    fn name(&self) -> &'static str {
        "task"
    }

    fn can_handle(&self, ty: TypeHandle, cx: &MapContext<'_, '_>) -> bool {
        cx.special().is_task(ty)
    }

    fn map_to(&self, _ty: TypeHandle, _cx: &mut MapContext<'_, '_>) -> Result<String, MapError> {
        Ok("Promise<void>".to_string())
    }
}

/// `Task<T>` -> `Promise<T>`.
///
/// As a hub return, `Task<IAsyncEnumerable<T>>` and `Task<ChannelReader<T>>`
/// are server-to-client streams and render as `IStreamResult<T>`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenericTaskMapper;

impl TypeMapper for GenericTaskMapper {
    fn name(&self) -> &'static str {
        "generic-task"
    }

    fn can_handle(&self, ty: TypeHandle, cx: &MapContext<'_, '_>) -> bool {
        cx.model().is_constructed_from(ty, cx.special().generic_task)
    }

    fn map_to(&self, ty: TypeHandle, cx: &mut MapContext<'_, '_>) -> Result<String, MapError> {
        let inner = cx.type_argument(ty)?;

        if cx.position() == Position::HubReturn && is_stream(cx.model(), cx.special(), inner) {
            let element = cx.type_argument(inner)?;
            cx.note_wrapper(TransportWrapper::StreamResult);
            return Ok(format!("IStreamResult<{}>", cx.map_nested(element)?));
        }

        Ok(format!("Promise<{}>", cx.map_nested(inner)?))
    }
}
