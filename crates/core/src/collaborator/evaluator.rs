//! Rule evaluator backed by the `validator` crate.
//!
//! A constraint descriptor is a JSON object keyed by constraint name, e.g.
//! `{"presence": true, "length": {"minimum": 3}}`. A constraint set to
//! `false` or `null` is disabled. Unknown names pass.

use regex::Regex;
use serde_json::{Map, Value};
use validator::{ValidateEmail, ValidateLength, ValidateRange, ValidateUrl};

use super::rules::ConstraintViolation;
use super::ConstraintValidator;

/// The default collaborator.
///
/// Every constraint except `presence` lets `null` through, so optional
/// parameters only need `presence` to become required.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleValidator;

impl ConstraintValidator for RuleValidator {
    fn validate_single(
        &self,
        value: &Value,
        constraints: &Value,
        _options: &Map<String, Value>,
    ) -> Result<(), Vec<ConstraintViolation>> {
        let Some(rules) = constraints.as_object() else {
            return Ok(());
        };

        let violations: Vec<ConstraintViolation> = rules
            .iter()
            .filter(|(_, config)| !matches!(config, Value::Null | Value::Bool(false)))
            .filter_map(|(name, config)| evaluate_constraint(name, config, value))
            .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

fn evaluate_constraint(name: &str, config: &Value, value: &Value) -> Option<ConstraintViolation> {
    if name != "presence" && value.is_null() {
        return None;
    }

    match name {
        "presence" => evaluate_presence(config, value),
        "type" => evaluate_type(config, value),
        "length" => evaluate_length(config, value),
        "numericality" => evaluate_numericality(config, value),
        "email" => evaluate_email(config, value),
        "url" => evaluate_url(config, value),
        "format" => evaluate_format(config, value),
        "inclusion" => evaluate_inclusion(config, value),
        "exclusion" => evaluate_exclusion(config, value),
        _ => None,
    }
}

/// A `message` key in the descriptor overrides the default text.
fn violation(name: &str, config: &Value, default: String, value: &Value) -> ConstraintViolation {
    let message = config
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or(default);
    ConstraintViolation::new(name, message, value)
}

fn evaluate_presence(config: &Value, value: &Value) -> Option<ConstraintViolation> {
    let allow_empty = config
        .get("allowEmpty")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    let missing = match value {
        Value::Null => true,
        _ if allow_empty => false,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    };

    missing.then(|| violation("presence", config, "can't be blank".into(), value))
}

fn evaluate_type(config: &Value, value: &Value) -> Option<ConstraintViolation> {
    let expected = config
        .as_str()
        .or_else(|| config.get("type").and_then(Value::as_str))?;

    let matches = match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.as_f64().is_some_and(|n| n.fract() == 0.0),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        _ => true,
    };

    (!matches).then(|| violation("type", config, format!("must be of type {expected}"), value))
}

fn evaluate_length(config: &Value, value: &Value) -> Option<ConstraintViolation> {
    let bound = |key: &str| config.get(key).and_then(Value::as_u64);
    let (is, minimum, maximum) = (bound("is"), bound("minimum"), bound("maximum"));

    let (length, unit) = match value {
        Value::String(s) => (s.chars().count() as u64, "characters"),
        Value::Array(items) => (items.len() as u64, "items"),
        _ => {
            return Some(violation(
                "length",
                config,
                "has an incorrect length".into(),
                value,
            ))
        }
    };
    let passes = |min: Option<u64>, max: Option<u64>, eq: Option<u64>| match value {
        Value::String(s) => s.validate_length(min, max, eq),
        Value::Array(items) => items.validate_length(min, max, eq),
        _ => false,
    };

    let message = if is.is_some() && !passes(None, None, is) {
        format!("is the wrong length (should be {} {unit})", is.unwrap_or_default())
    } else if minimum.is_some() && !passes(minimum, None, None) {
        format!("is too short (minimum is {} {unit})", minimum.unwrap_or_default())
    } else if maximum.is_some() && !passes(None, maximum, None) {
        format!("is too long (maximum is {} {unit})", maximum.unwrap_or_default())
    } else {
        return None;
    };

    tracing::trace!(length, "length constraint failed");
    Some(violation("length", config, message, value))
}

fn evaluate_numericality(config: &Value, value: &Value) -> Option<ConstraintViolation> {
    let Some(number) = value.as_f64() else {
        return Some(violation("numericality", config, "is not a number".into(), value));
    };

    let only_integer = config
        .get("onlyInteger")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if only_integer && number.fract() != 0.0 {
        return Some(violation("numericality", config, "must be an integer".into(), value));
    }

    // (key, description, passes(number, bound))
    let checks: [(&str, &str, fn(f64, f64) -> bool); 5] = [
        ("greaterThan", "greater than", |n, b| n.validate_range(None, None, Some(b), None)),
        ("greaterThanOrEqualTo", "greater than or equal to", |n, b| {
            n.validate_range(Some(b), None, None, None)
        }),
        ("equalTo", "equal to", |n, b| n.validate_range(Some(b), Some(b), None, None)),
        ("lessThanOrEqualTo", "less than or equal to", |n, b| {
            n.validate_range(None, Some(b), None, None)
        }),
        ("lessThan", "less than", |n, b| n.validate_range(None, None, None, Some(b))),
    ];

    checks.iter().find_map(|(key, description, passes)| {
        let raw = config.get(*key)?;
        let bound = raw.as_f64()?;
        (!passes(number, bound)).then(|| {
            violation("numericality", config, format!("must be {description} {raw}"), value)
        })
    })
}

fn evaluate_email(config: &Value, value: &Value) -> Option<ConstraintViolation> {
    let valid = value.as_str().is_some_and(|s| s.validate_email());
    (!valid).then(|| violation("email", config, "is not a valid email".into(), value))
}

fn evaluate_url(config: &Value, value: &Value) -> Option<ConstraintViolation> {
    let valid = value.as_str().is_some_and(|s| s.validate_url());
    (!valid).then(|| violation("url", config, "is not a valid url".into(), value))
}

/// Whole-string regex match. `flags` may contain `i`, `m` or `s`.
fn evaluate_format(config: &Value, value: &Value) -> Option<ConstraintViolation> {
    let pattern = config
        .as_str()
        .or_else(|| config.get("pattern").and_then(Value::as_str))?;
    let flags: String = config
        .get("flags")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .chars()
        .filter(|c| matches!(c, 'i' | 'm' | 's'))
        .collect();

    let anchored = if flags.is_empty() {
        format!("^(?:{pattern})$")
    } else {
        format!("(?{flags})^(?:{pattern})$")
    };

    let matches = match (Regex::new(&anchored), value.as_str()) {
        (Ok(re), Some(s)) => re.is_match(s),
        (Ok(_), None) => false,
        (Err(e), _) => {
            // Invalid patterns pass.
            tracing::debug!(pattern, error = %e, "ignoring invalid format pattern");
            true
        }
    };

    (!matches).then(|| violation("format", config, "is invalid".into(), value))
}

fn within(config: &Value) -> Option<&Vec<Value>> {
    config
        .as_array()
        .or_else(|| config.get("within").and_then(Value::as_array))
}

fn evaluate_inclusion(config: &Value, value: &Value) -> Option<ConstraintViolation> {
    let allowed = within(config)?;
    (!allowed.contains(value))
        .then(|| violation("inclusion", config, "is not included in the list".into(), value))
}

fn evaluate_exclusion(config: &Value, value: &Value) -> Option<ConstraintViolation> {
    let restricted = within(config)?;
    restricted
        .contains(value)
        .then(|| violation("exclusion", config, "is restricted".into(), value))
}
