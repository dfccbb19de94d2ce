//! `paramcheck-core` -- validation of the arguments handed to a function.
//!
//! [`validate_params`] checks the shape of a call: an array (or captured
//! argument list) of parameters, an array of constraint descriptors, and an
//! optional plain options object. [`ParamValidator`] performs the same
//! checks and then validates each parameter through an injected
//! [`ConstraintValidator`].

pub mod collaborator;
pub mod error;
pub mod input;
pub mod options;
pub mod params;

pub use collaborator::{ConstraintValidator, ConstraintViolation, RuleValidator};
pub use error::{ParamError, ParamFailure};
pub use input::{is_arguments, Arguments, Input, Tag};
pub use options::ValidateOptions;
pub use params::{validate_params, ParamValidator};

#[doc(hidden)]
pub use serde_json as __serde_json;
