//! Constraint violation types.

use std::borrow::Cow;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single constraint a value failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    /// Constraint name, e.g. `presence` or `length`.
    pub constraint: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl ConstraintViolation {
    pub fn new(constraint: impl Into<String>, message: impl Into<String>, value: &Value) -> Self {
        Self {
            constraint: constraint.into(),
            message: message.into(),
            value: Some(value.clone()),
        }
    }
}

/// Lets callers that already report through `validator` reuse its error type.
impl From<ConstraintViolation> for validator::ValidationError {
    fn from(violation: ConstraintViolation) -> Self {
        let mut params = HashMap::new();
        if let Some(value) = violation.value {
            params.insert(Cow::Borrowed("value"), value);
        }
        validator::ValidationError {
            code: Cow::Owned(violation.constraint),
            message: Some(Cow::Owned(violation.message)),
            params,
        }
    }
}
