//! Per-call options.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::ParamError;

/// Settings read from the options object of a validation call.
///
/// Keys are camelCase. Unknown keys are ignored here; the whole object is
/// still forwarded to the constraint collaborator.
///
/// | Key            | Default |
/// |----------------|---------|
/// | `fullMessages` | `true`  |
/// | `stopAtFirst`  | `false` |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Prefix each message with `Parameter <n>` (1-based).
    pub full_messages: bool,
    /// Stop after the first parameter that fails.
    pub stop_at_first: bool,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            full_messages: true,
            stop_at_first: false,
        }
    }
}

impl ValidateOptions {
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, ParamError> {
        let defaults = Self::default();
        Ok(Self {
            full_messages: option(map, "fullMessages")?.unwrap_or(defaults.full_messages),
            stop_at_first: option(map, "stopAtFirst")?.unwrap_or(defaults.stop_at_first),
        })
    }
}

fn option<T: DeserializeOwned>(map: &Map<String, Value>, key: &str) -> Result<Option<T>, ParamError> {
    map.get(key)
        .map(|value| {
            serde_json::from_value(value.clone())
                .map_err(|e| ParamError::InvalidArgument(format!("invalid option `{key}`: {e}")))
        })
        .transpose()
}
