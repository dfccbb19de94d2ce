//! Parameter validation.
//!
//! A call is validated in two stages. The structural stage checks the shape
//! of the three arguments in a fixed order (params, constraints, options).
//! The per-parameter stage pairs parameter *i* with constraint *i* and asks
//! the collaborator to check each pair.

use serde_json::{Map, Value};

use crate::collaborator::{ConstraintValidator, RuleValidator};
use crate::error::{ParamError, ParamFailure};
use crate::input::{is_arguments, Input};
use crate::options::ValidateOptions;

pub const PARAMS_SHAPE_MESSAGE: &str =
    "first parameter must be an array of parameters to test, or an Arguments object";
pub const CONSTRAINTS_SHAPE_MESSAGE: &str =
    "second parameter must be an array of constraints to test against";
pub const OPTIONS_SHAPE_MESSAGE: &str = "if present, the third parameter must be a plain object";

static NULL: Value = Value::Null;

/// Check the shape of a validation call without evaluating any constraint.
///
/// Returns `Ok(true)` when `params` is an array or captured argument list,
/// `constraints` is an array, and `options` is either undefined or a plain
/// object.
pub fn validate_params(
    params: Input<'_>,
    constraints: Input<'_>,
    options: Input<'_>,
) -> Result<bool, ParamError> {
    check_shape(&RuleValidator, params, constraints, options)?;
    Ok(true)
}

/// The three arguments after the structural checks.
struct CallShape<'a> {
    params: &'a [Value],
    constraints: &'a [Value],
    options: Option<&'a Map<String, Value>>,
}

fn check_shape<'a, V: ConstraintValidator + ?Sized>(
    validator: &V,
    params: Input<'a>,
    constraints: Input<'a>,
    options: Input<'a>,
) -> Result<CallShape<'a>, ParamError> {
    let params = Some(params)
        .filter(|p| p.is_truthy() && (validator.is_array(*p) || is_arguments(*p)))
        .and_then(Input::as_slice)
        .ok_or_else(|| rejected("params", params, PARAMS_SHAPE_MESSAGE))?;

    let constraints = Some(constraints)
        .filter(|c| validator.is_array(*c))
        .and_then(Input::as_array)
        .ok_or_else(|| rejected("constraints", constraints, CONSTRAINTS_SHAPE_MESSAGE))?;

    let options = match options {
        Input::Undefined => None,
        present => Some(
            Some(present)
                .filter(|o| validator.is_plain_object(*o) && !validator.is_array(*o))
                .and_then(Input::as_object)
                .ok_or_else(|| rejected("options", present, OPTIONS_SHAPE_MESSAGE))?,
        ),
    };

    Ok(CallShape {
        params,
        constraints,
        options,
    })
}

fn rejected(check: &'static str, input: Input<'_>, message: &str) -> ParamError {
    tracing::debug!(check, tag = %input.tag(), "Rejected validation call");
    ParamError::InvalidArgument(message.to_string())
}

/// Validates call parameters against constraint descriptors through an
/// injected [`ConstraintValidator`].
///
/// ```
/// use paramcheck_core::{arguments, Input, ParamValidator};
/// use serde_json::json;
///
/// let validator = ParamValidator::default();
/// let args = arguments![1, 2];
/// let constraints = json!([{ "presence": true }, { "presence": true }]);
/// let ok = validator
///     .validate(Input::from(&args), Input::from(&constraints), Input::Undefined)
///     .unwrap();
/// assert!(ok);
/// ```
#[derive(Debug, Clone)]
pub struct ParamValidator<V = RuleValidator> {
    collaborator: V,
}

impl Default for ParamValidator {
    fn default() -> Self {
        Self::new(RuleValidator)
    }
}

impl<V: ConstraintValidator> ParamValidator<V> {
    pub fn new(collaborator: V) -> Self {
        Self { collaborator }
    }

    pub fn collaborator(&self) -> &V {
        &self.collaborator
    }

    /// Structural checks, then every parameter against its constraint.
    ///
    /// Returns `Ok(true)` when everything passes. Structural failures are
    /// [`ParamError::InvalidArgument`]; rejected parameters are reported
    /// together as [`ParamError::Constraint`].
    pub fn validate(
        &self,
        params: Input<'_>,
        constraints: Input<'_>,
        options: Input<'_>,
    ) -> Result<bool, ParamError> {
        let shape = check_shape(&self.collaborator, params, constraints, options)?;
        self.validate_typed(shape.params, shape.constraints, shape.options)
    }

    /// Per-parameter validation for callers whose argument shapes are
    /// already fixed by the type system.
    ///
    /// Parameters without a constraint are not checked. A constraint
    /// without a parameter is checked against `null`. A `null` constraint
    /// skips its parameter.
    pub fn validate_typed(
        &self,
        params: &[Value],
        constraints: &[Value],
        options: Option<&Map<String, Value>>,
    ) -> Result<bool, ParamError> {
        let empty = Map::new();
        let options = options.unwrap_or(&empty);
        let settings = ValidateOptions::from_map(options)?;

        let mut failures = Vec::new();
        for (index, constraint) in constraints.iter().enumerate() {
            if constraint.is_null() {
                continue;
            }

            let value = params.get(index).unwrap_or(&NULL);
            tracing::trace!(index, "Validating parameter");

            if let Err(violations) = self.collaborator.validate_single(value, constraint, options) {
                failures.push(ParamFailure::new(index, violations, &settings));
                if settings.stop_at_first {
                    break;
                }
            }
        }

        if failures.is_empty() {
            return Ok(true);
        }

        tracing::debug!(
            failed = failures.len(),
            checked = constraints.len(),
            "Parameter validation failed",
        );
        Err(ParamError::Constraint(failures))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arguments;
    use crate::collaborator::ConstraintViolation;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn shape_error(params: Input<'_>, constraints: Input<'_>, options: Input<'_>) -> String {
        match validate_params(params, constraints, options) {
            Err(ParamError::InvalidArgument(msg)) => msg,
            other => panic!("expected InvalidArgument, got {other:?}"),
        }
    }

    #[test]
    fn arrays_pass() {
        let params = json!([1, 2]);
        let constraints = json!([{ "presence": true }, { "presence": true }]);
        let result = validate_params(
            Input::from(&params),
            Input::from(&constraints),
            Input::Undefined,
        );
        assert_matches!(result, Ok(true));
    }

    #[test]
    fn empty_lists_pass() {
        let empty = json!([]);
        assert_matches!(
            validate_params(Input::from(&empty), Input::from(&empty), Input::Undefined),
            Ok(true)
        );
    }

    #[test]
    fn params_checked_before_constraints() {
        let bad = json!("not an array");
        assert_eq!(
            shape_error(Input::from(&bad), Input::from(&bad), Input::from(&bad)),
            PARAMS_SHAPE_MESSAGE
        );
    }

    #[test]
    fn arguments_rejected_as_constraints() {
        let params = json!([]);
        let args = arguments![{ "presence": true }];
        assert_eq!(
            shape_error(Input::from(&params), Input::from(&args), Input::Undefined),
            CONSTRAINTS_SHAPE_MESSAGE
        );
    }

    #[test]
    fn falsy_options_are_present() {
        let empty = json!([]);
        for options in [json!(null), json!(0), json!(""), json!(false)] {
            assert_eq!(
                shape_error(Input::from(&empty), Input::from(&empty), Input::from(&options)),
                OPTIONS_SHAPE_MESSAGE,
                "options {options} should be rejected"
            );
        }
    }

    #[test]
    fn arguments_rejected_as_options() {
        let empty = json!([]);
        let args = arguments![];
        assert_eq!(
            shape_error(Input::from(&empty), Input::from(&empty), Input::from(&args)),
            OPTIONS_SHAPE_MESSAGE
        );
    }

    #[test]
    fn missing_parameter_checked_as_null() {
        let validator = ParamValidator::default();
        let err = validator
            .validate_typed(&[json!(1)], &[json!({}), json!({ "presence": true })], None)
            .unwrap_err();
        let failures = err.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].index, 1);
        assert_eq!(failures[0].messages, ["Parameter 2 can't be blank"]);
    }

    #[test]
    fn extra_parameters_are_unchecked() {
        let validator = ParamValidator::default();
        let result = validator.validate_typed(&[json!(1), Value::Null], &[json!({ "presence": true })], None);
        assert_matches!(result, Ok(true));
    }

    #[test]
    fn null_constraint_skips_parameter() {
        let validator = ParamValidator::default();
        let result = validator.validate_typed(
            &[Value::Null, json!("x")],
            &[Value::Null, json!({ "presence": true })],
            None,
        );
        assert_matches!(result, Ok(true));
    }

    /// Accepts every value and treats any JSON value as an object.
    struct Lenient;

    impl ConstraintValidator for Lenient {
        fn validate_single(
            &self,
            _value: &Value,
            _constraints: &Value,
            _options: &Map<String, Value>,
        ) -> Result<(), Vec<ConstraintViolation>> {
            Ok(())
        }

        fn is_plain_object(&self, input: Input<'_>) -> bool {
            matches!(input, Input::Value(_))
        }
    }

    #[test]
    fn collaborator_predicates_drive_shape_checks() {
        let validator = ParamValidator::new(Lenient);
        let empty = json!([]);
        let number = json!(5);
        // The predicate accepts a number, but it still has no fields to read.
        let err = validator
            .validate(Input::from(&empty), Input::from(&empty), Input::from(&number))
            .unwrap_err();
        assert_eq!(err.to_string(), OPTIONS_SHAPE_MESSAGE);

        // Arrays stay excluded even when the predicate says otherwise.
        let err = validator
            .validate(Input::from(&empty), Input::from(&empty), Input::from(&empty))
            .unwrap_err();
        assert_eq!(err.to_string(), OPTIONS_SHAPE_MESSAGE);
    }

    #[test]
    fn boxed_collaborator() {
        let validator: ParamValidator<Box<dyn ConstraintValidator>> =
            ParamValidator::new(Box::new(RuleValidator));
        let result = validator.validate_typed(&[json!("a")], &[json!({ "presence": true })], None);
        assert_matches!(result, Ok(true));
    }
}
