use super::{MapContext, Position, TransportWrapper, TypeMapper};
use crate::classify::is_stream;
use crate::error::MapError;
use crate::symbols::TypeHandle;

/// `IAsyncEnumerable<T>` and `ChannelReader<T>`.
///
/// Returned from a hub these are streams the caller consumes
/// (`IStreamResult<T>`); anywhere else they are streams the client pushes
/// into or the server pushes to a receiver (`Subject<T>`).
#[derive(Debug, Clone, Copy, Default)]
pub struct StreamMapper;

impl TypeMapper for StreamMapper {
    fn name(&self) -> &'static str {
        "stream"
    }

    fn can_handle(&self, ty: TypeHandle, cx: &MapContext<'_, '_>) -> bool {
        is_stream(cx.model(), cx.special(), ty)
    }

    fn map_to(&self, ty: TypeHandle, cx: &mut MapContext<'_, '_>) -> Result<String, MapError> {
        let element = cx.type_argument(ty)?;
        let wrapper = if cx.position() == Position::HubReturn {
            TransportWrapper::StreamResult
        } else {
            TransportWrapper::Subject
        };

        cx.note_wrapper(wrapper);
        Ok(format!("{}<{}>", wrapper.identifier(), cx.map_nested(element)?))
    }
}
