//! Well-known types that drive classification.

use tracing::debug;

use crate::config::WellKnownNames;
use crate::error::ConfigError;
use crate::symbols::{TypeHandle, TypeOracle};

/// Resolved handles of the well-known types for one run.
///
/// The task, stream, and cancellation types may be absent in a minimal host
/// environment; an absent handle simply never matches anything. The marker
/// attributes are mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpecialSymbols {
    pub task: Option<TypeHandle>,
    pub generic_task: Option<TypeHandle>,
    pub async_enumerable: Option<TypeHandle>,
    pub channel_reader: Option<TypeHandle>,
    pub cancellation_token: Option<TypeHandle>,
    pub hub_attribute: TypeHandle,
    pub receiver_attribute: TypeHandle,
    pub transpilation_source_attribute: TypeHandle,
}

impl SpecialSymbols {
    /// Resolve every well-known type by metadata name.
    pub fn resolve(oracle: &dyn TypeOracle, names: &WellKnownNames) -> Result<Self, ConfigError> {
        let marker = |name: &str| {
            oracle
                .resolve_well_known(name)
                .ok_or_else(|| ConfigError::missing_marker(name))
        };

        let symbols = Self {
            task: oracle.resolve_well_known(&names.task),
            generic_task: oracle.resolve_well_known(&names.generic_task),
            async_enumerable: oracle.resolve_well_known(&names.async_enumerable),
            channel_reader: oracle.resolve_well_known(&names.channel_reader),
            cancellation_token: oracle.resolve_well_known(&names.cancellation_token),
            hub_attribute: marker(&names.hub_attribute)?,
            receiver_attribute: marker(&names.receiver_attribute)?,
            transpilation_source_attribute: marker(&names.transpilation_source_attribute)?,
        };

        debug!(
            async_enumerable = symbols.async_enumerable.is_some(),
            channel_reader = symbols.channel_reader.is_some(),
            "resolved special symbols"
        );

        Ok(symbols)
    }

    /// Whether `ty` is exactly the no-value task.
    pub fn is_task(&self, ty: TypeHandle) -> bool {
        self.task == Some(ty)
    }

    pub fn is_cancellation_token(&self, ty: TypeHandle) -> bool {
        self.cancellation_token == Some(ty)
    }
}
