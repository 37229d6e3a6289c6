//! Source type to TypeScript type mapping.
//!
//! A [`MapperChain`] is an ordered list of [`TypeMapper`]s. For each type the
//! first mapper whose [`TypeMapper::can_handle`] returns true renders it,
//! recursing through [`MapContext::map_nested`] for type arguments.
//!
//! # Built-in Mappings
//!
//! | Source Type | TypeScript |
//! |-------------|------------|
//! | `Task` | `Promise<void>` |
//! | `Task<T>` | `Promise<T>` |
//! | `IAsyncEnumerable<T>`, `ChannelReader<T>` | `IStreamResult<T>` as a hub return, `Subject<T>` elsewhere |
//! | `bool` | `boolean` |
//! | numeric primitives | `number` |
//! | `char`, `string`, `Guid`, `Uri` | `string` |
//! | `DateTime`, `DateTimeOffset` | `(Date \| string)` |
//! | `object` | `any` |
//! | `T[]`, lists, sets | `T[]` |
//! | dictionaries | `{ [key: K]: V }` |
//! | `Nullable<T>` | `(T \| undefined)` |
//! | data-type marked types | declared name |

mod collection;
mod data_type;
mod overrides;
mod primitive;
mod stream;
mod task;

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

pub use collection::CollectionMapper;
pub use data_type::DataTypeMapper;
pub use overrides::OverrideMapper;
pub use primitive::PrimitiveMapper;
pub use stream::StreamMapper;
pub use task::{GenericTaskMapper, TaskMapper};

use crate::error::MapError;
use crate::special::SpecialSymbols;
use crate::symbols::{SymbolModel, TypeHandle, TypeOracle};

/// Where the type being mapped appears.
///
/// Stream types render differently as a hub method's return type than
/// anywhere else, so the caller states the position of the outermost type.
/// Type arguments are always mapped at [`Position::Nested`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    /// A method parameter.
    Argument,
    /// Return type of a hub method.
    HubReturn,
    /// Return type of a receiver method.
    ReceiverReturn,
    /// Type argument or array element of another type.
    Nested,
}

/// Transport types a rendered type refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TransportWrapper {
    /// `IStreamResult<T>`: server-to-client stream handed to the caller.
    StreamResult,
    /// `Subject<T>`: push-based stream the client feeds.
    Subject,
}

impl TransportWrapper {
    /// Identifier exported by the transport module.
    pub fn identifier(self) -> &'static str {
        match self {
            TransportWrapper::StreamResult => "IStreamResult",
            TransportWrapper::Subject => "Subject",
        }
    }
}

impl fmt::Display for TransportWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// Renders source types as TypeScript type expressions.
///
/// Implement this trait to teach the chain a new type. Register it with
/// [`Generator::with_mapper`](crate::Generator::with_mapper) to take
/// priority over the built-ins, or with
/// [`Generator::with_fallback`](crate::Generator::with_fallback) to only
/// see types nothing else claimed.
///
/// # Example
///
/// ```rust
/// use hubgen::error::MapError;
/// use hubgen::mapper::{MapContext, TypeMapper};
/// use hubgen::symbols::{TypeHandle, TypeOracle};
///
/// struct BigIntegerMapper;
///
/// impl TypeMapper for BigIntegerMapper {
///     fn name(&self) -> &'static str { "big-integer" }
///
///     fn can_handle(&self, ty: TypeHandle, cx: &MapContext<'_, '_>) -> bool {
///         cx.oracle().metadata_name(ty) == "System.Numerics.BigInteger"
///     }
///
///     fn map_to(&self, _ty: TypeHandle, _cx: &mut MapContext<'_, '_>) -> Result<String, MapError> {
///         Ok("bigint".to_string())
///     }
/// }
/// ```
pub trait TypeMapper: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Whether this mapper renders `ty`.
    fn can_handle(&self, ty: TypeHandle, cx: &MapContext<'_, '_>) -> bool;

    /// Render `ty`. Only called after `can_handle` returned true.
    fn map_to(&self, ty: TypeHandle, cx: &mut MapContext<'_, '_>) -> Result<String, MapError>;
}

/// Ordered list of mappers.
#[derive(Clone, Default)]
pub struct MapperChain {
    mappers: Vec<Arc<dyn TypeMapper>>,
}

impl MapperChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in mappers in priority order.
    pub fn builtin() -> Self {
        let mut chain = Self::new();
        chain.push(Arc::new(TaskMapper));
        chain.push(Arc::new(GenericTaskMapper));
        chain.push(Arc::new(StreamMapper));
        chain.push(Arc::new(PrimitiveMapper));
        chain.push(Arc::new(CollectionMapper));
        chain.push(Arc::new(DataTypeMapper));
        chain
    }

    /// Append a mapper with the lowest priority so far.
    pub fn push(&mut self, mapper: Arc<dyn TypeMapper>) {
        self.mappers.push(mapper);
    }

    /// Insert a mapper with the highest priority so far.
    pub fn push_front(&mut self, mapper: Arc<dyn TypeMapper>) {
        self.mappers.insert(0, mapper);
    }

    /// Append every mapper of `other`, keeping its order.
    pub fn extend(&mut self, other: &MapperChain) {
        self.mappers.extend(other.mappers.iter().cloned());
    }

    pub fn len(&self) -> usize {
        self.mappers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappers.is_empty()
    }

    /// Mapper names in priority order.
    pub fn names(&self) -> Vec<&'static str> {
        self.mappers.iter().map(|m| m.name()).collect()
    }

    fn find(&self, ty: TypeHandle, cx: &MapContext<'_, '_>) -> Option<&Arc<dyn TypeMapper>> {
        self.mappers.iter().find(|m| m.can_handle(ty, cx))
    }
}

impl fmt::Debug for MapperChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapperChain")
            .field("mappers", &self.names())
            .finish()
    }
}

/// State threaded through one top-level mapping.
///
/// Besides the rendered text, a mapping records which transport wrappers and
/// which data types the text refers to, so the emitter can import exactly
/// those.
pub struct MapContext<'a, 'o> {
    model: &'a SymbolModel<'o>,
    special: &'a SpecialSymbols,
    chain: &'a MapperChain,
    position: Position,
    wrappers: BTreeSet<TransportWrapper>,
    data_types: BTreeSet<TypeHandle>,
}

impl<'a, 'o> MapContext<'a, 'o> {
    pub fn new(
        model: &'a SymbolModel<'o>,
        special: &'a SpecialSymbols,
        chain: &'a MapperChain,
        position: Position,
    ) -> Self {
        Self {
            model,
            special,
            chain,
            position,
            wrappers: BTreeSet::new(),
            data_types: BTreeSet::new(),
        }
    }

    pub fn model(&self) -> &'a SymbolModel<'o> {
        self.model
    }

    pub fn oracle(&self) -> &'o dyn TypeOracle {
        self.model.oracle()
    }

    pub fn special(&self) -> &'a SpecialSymbols {
        self.special
    }

    /// Position of the type currently being mapped.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Map `ty` at the current position.
    pub fn map(&mut self, ty: TypeHandle) -> Result<String, MapError> {
        let chain = self.chain;
        match chain.find(ty, self) {
            Some(mapper) => {
                trace!(mapper = mapper.name(), %ty, "mapping type");
                mapper.map_to(ty, self)
            }
            None => Err(MapError::unsupported(self.oracle().display_string(ty))),
        }
    }

    /// Map a type argument or element type.
    pub fn map_nested(&mut self, ty: TypeHandle) -> Result<String, MapError> {
        let outer = std::mem::replace(&mut self.position, Position::Nested);
        let result = self.map(ty);
        self.position = outer;
        result
    }

    /// The single type argument of a one-parameter generic.
    pub fn type_argument(&self, ty: TypeHandle) -> Result<TypeHandle, MapError> {
        self.model
            .first_type_argument(ty)
            .ok_or_else(|| MapError::missing_argument(self.oracle().metadata_name(ty)))
    }

    /// Record that the rendered text refers to a transport wrapper.
    pub fn note_wrapper(&mut self, wrapper: TransportWrapper) {
        self.wrappers.insert(wrapper);
    }

    /// Record that the rendered text refers to a data type by name.
    pub fn note_data_type(&mut self, ty: TypeHandle) {
        let definition = self.oracle().original_definition(ty);
        self.data_types.insert(definition);
    }

    /// Finish the mapping, returning what the rendered text referred to.
    pub fn into_references(self) -> TypeReferences {
        TypeReferences {
            wrappers: self.wrappers,
            data_types: self.data_types,
        }
    }
}

/// Transport wrappers and data types a rendered type refers to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeReferences {
    pub wrappers: BTreeSet<TransportWrapper>,
    /// Data type definitions.
    pub data_types: BTreeSet<TypeHandle>,
}

impl TypeReferences {
    pub fn extend(&mut self, other: TypeReferences) {
        self.wrappers.extend(other.wrappers);
        self.data_types.extend(other.data_types);
    }
}

/// A rendered type plus what it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappedType {
    pub text: String,
    pub references: TypeReferences,
}

impl MapperChain {
    /// Map `ty` at `position`, collecting its references.
    pub fn map_type(
        &self,
        model: &SymbolModel<'_>,
        special: &SpecialSymbols,
        ty: TypeHandle,
        position: Position,
    ) -> Result<MappedType, MapError> {
        let mut cx = MapContext::new(model, special, self, position);
        let text = cx.map(ty)?;
        Ok(MappedType {
            text,
            references: cx.into_references(),
        })
    }
}
