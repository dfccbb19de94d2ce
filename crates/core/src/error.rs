use serde::Serialize;

use crate::collaborator::rules::ConstraintViolation;
use crate::options::ValidateOptions;

#[derive(Debug, thiserror::Error)]
pub enum ParamError {
    /// The call itself was malformed: wrong shape for one of the three
    /// arguments, or an option of the wrong type.
    #[error("{0}")]
    InvalidArgument(String),

    /// One or more parameters were rejected by the constraint collaborator.
    #[error("{}", join_messages(.0))]
    Constraint(Vec<ParamFailure>),
}

impl ParamError {
    /// Failures reported by the collaborator, empty for structural errors.
    pub fn failures(&self) -> &[ParamFailure] {
        match self {
            ParamError::Constraint(failures) => failures,
            ParamError::InvalidArgument(_) => &[],
        }
    }
}

/// All violations reported for the parameter at `index` (zero-based).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamFailure {
    pub index: usize,
    pub messages: Vec<String>,
    pub violations: Vec<ConstraintViolation>,
}

impl ParamFailure {
    pub(crate) fn new(
        index: usize,
        violations: Vec<ConstraintViolation>,
        options: &ValidateOptions,
    ) -> Self {
        let messages = violations
            .iter()
            .map(|v| {
                if options.full_messages {
                    format!("Parameter {} {}", index + 1, v.message)
                } else {
                    v.message.clone()
                }
            })
            .collect();

        Self {
            index,
            messages,
            violations,
        }
    }
}

fn join_messages(failures: &[ParamFailure]) -> String {
    failures
        .iter()
        .flat_map(|f| f.messages.iter().map(String::as_str))
        .collect::<Vec<_>>()
        .join("; ")
}
