//! RPC shape classification.
//!
//! Every hub method is exactly one of three shapes. Streaming return types
//! are checked first, then streaming parameters, then plain tasks:
//!
//! | Declaration | Shape |
//! |-------------|-------|
//! | `IAsyncEnumerable<T> M(..)` | server-to-client streaming |
//! | `Task<IAsyncEnumerable<T>> M(..)`, `Task<ChannelReader<T>> M(..)` | server-to-client streaming |
//! | `Task<T> M(..)`, `Task M(..)` | unary |
//! | `Task M(IAsyncEnumerable<T> s, ..)`, `Task M(ChannelReader<T> s, ..)` | client-to-server streaming |
//!
//! Anything else classifies as unary with its return type taken literally;
//! [`shape_violation`] reports it.

use serde::Serialize;
use tracing::trace;

use crate::special::SpecialSymbols;
use crate::symbols::{MethodHandle, SymbolModel, TypeHandle};

/// Transport shape of a hub method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum MethodShape {
    Unary,
    ServerToClientStreaming,
    ClientToServerStreaming,
}

/// Role a marked interface plays on the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum InterfaceRole {
    /// Called by the client, implemented by the server.
    Hub,
    /// Called by the server, implemented by the client.
    Receiver,
}

/// Shape plus the payload type it carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub shape: MethodShape,
    /// Element or result type; `None` for a no-value `Task`.
    pub payload: Option<TypeHandle>,
}

impl Classification {
    fn new(shape: MethodShape, payload: Option<TypeHandle>) -> Self {
        Self { shape, payload }
    }
}

/// Whether `ty` is an async sequence or channel reader.
pub fn is_stream(model: &SymbolModel<'_>, special: &SpecialSymbols, ty: TypeHandle) -> bool {
    model.is_constructed_from(ty, special.async_enumerable)
        || model.is_constructed_from(ty, special.channel_reader)
}

/// Classify a method. Total: every method gets exactly one shape.
pub fn classify(model: &SymbolModel<'_>, special: &SpecialSymbols, method: MethodHandle) -> Classification {
    let oracle = model.oracle();
    let return_type = oracle.return_type(method);

    let task_argument = if model.is_constructed_from(return_type, special.generic_task) {
        model.first_type_argument(return_type)
    } else {
        None
    };
    let stream_parameter = oracle
        .parameters(method)
        .into_iter()
        .find(|p| is_stream(model, special, p.ty));

    let returns_stream = model.is_constructed_from(return_type, special.async_enumerable)
        || task_argument.map_or(false, |inner| is_stream(model, special, inner));

    let classification = if returns_stream {
        Classification::new(
            MethodShape::ServerToClientStreaming,
            Some(featured_type(model, special, return_type)),
        )
    } else if let Some(stream) = stream_parameter {
        Classification::new(
            MethodShape::ClientToServerStreaming,
            Some(featured_type(model, special, stream.ty)),
        )
    } else if special.is_task(return_type) {
        Classification::new(MethodShape::Unary, None)
    } else {
        Classification::new(
            MethodShape::Unary,
            Some(featured_type(model, special, return_type)),
        )
    };

    trace!(
        method = oracle.method_name(method),
        shape = ?classification.shape,
        "classified method"
    );

    classification
}

/// Innermost payload type with task and stream wrappers stripped, to
/// depth two.
///
/// `IAsyncEnumerable<T>`, `ChannelReader<T>`, `Task<T>`,
/// `Task<IAsyncEnumerable<T>>` and `Task<ChannelReader<T>>` all yield `T`.
/// Every other type is its own featured type.
pub fn featured_type(model: &SymbolModel<'_>, special: &SpecialSymbols, ty: TypeHandle) -> TypeHandle {
    if is_stream(model, special, ty) {
        return model.first_type_argument(ty).unwrap_or(ty);
    }

    if model.is_constructed_from(ty, special.generic_task) {
        if let Some(inner) = model.first_type_argument(ty) {
            if is_stream(model, special, inner) {
                return model.first_type_argument(inner).unwrap_or(inner);
            }
            return inner;
        }
    }

    ty
}

/// Why a method's declared shape is not usable for its role, if it is not.
pub fn shape_violation(
    model: &SymbolModel<'_>,
    special: &SpecialSymbols,
    role: InterfaceRole,
    method: MethodHandle,
    classification: &Classification,
) -> Option<String> {
    let oracle = model.oracle();
    let return_type = oracle.return_type(method);
    let returns_task = special.is_task(return_type);
    let returns_generic_task = model.is_constructed_from(return_type, special.generic_task);

    match role {
        InterfaceRole::Hub => match classification.shape {
            MethodShape::ServerToClientStreaming => None,
            MethodShape::ClientToServerStreaming if returns_task => None,
            MethodShape::ClientToServerStreaming => Some(format!(
                "client-to-server streaming method must return Task, found {}",
                oracle.display_string(return_type)
            )),
            MethodShape::Unary if returns_task || returns_generic_task => None,
            MethodShape::Unary => Some(format!(
                "hub method must return Task, Task<T>, or IAsyncEnumerable<T>, found {}",
                oracle.display_string(return_type)
            )),
        },
        InterfaceRole::Receiver => {
            let streams_result = returns_generic_task
                && model
                    .first_type_argument(return_type)
                    .map(|inner| is_stream(model, special, inner))
                    .unwrap_or(false);

            if returns_task || (returns_generic_task && !streams_result) {
                None
            } else {
                Some(format!(
                    "receiver method must return Task or Task<T>, found {}",
                    oracle.display_string(return_type)
                ))
            }
        }
    }
}
