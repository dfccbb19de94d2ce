//! Constraint-validation collaborator.
//!
//! The parameter validator never evaluates constraints itself. It hands each
//! parameter and its descriptor to a [`ConstraintValidator`], injected at
//! construction time. [`RuleValidator`] is the stock implementation.

pub mod evaluator;
pub mod rules;

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::input::{Input, Tag};

pub use evaluator::RuleValidator;
pub use rules::ConstraintViolation;

/// Single-value validation plus the type predicates the structural checks use.
pub trait ConstraintValidator: Send + Sync {
    /// Check one value against one constraint descriptor.
    fn validate_single(
        &self,
        value: &Value,
        constraints: &Value,
        options: &Map<String, Value>,
    ) -> Result<(), Vec<ConstraintViolation>>;

    fn is_array(&self, input: Input<'_>) -> bool {
        input.tag() == Tag::Array
    }

    /// Plain key-value objects only; arrays and argument lists are excluded.
    fn is_plain_object(&self, input: Input<'_>) -> bool {
        input.tag() == Tag::Object
    }
}

impl<T: ConstraintValidator + ?Sized> ConstraintValidator for Box<T> {
    fn validate_single(
        &self,
        value: &Value,
        constraints: &Value,
        options: &Map<String, Value>,
    ) -> Result<(), Vec<ConstraintViolation>> {
        (**self).validate_single(value, constraints, options)
    }

    fn is_array(&self, input: Input<'_>) -> bool {
        (**self).is_array(input)
    }

    fn is_plain_object(&self, input: Input<'_>) -> bool {
        (**self).is_plain_object(input)
    }
}

impl<T: ConstraintValidator + ?Sized> ConstraintValidator for Arc<T> {
    fn validate_single(
        &self,
        value: &Value,
        constraints: &Value,
        options: &Map<String, Value>,
    ) -> Result<(), Vec<ConstraintViolation>> {
        (**self).validate_single(value, constraints, options)
    }

    fn is_array(&self, input: Input<'_>) -> bool {
        (**self).is_array(input)
    }

    fn is_plain_object(&self, input: Input<'_>) -> bool {
        (**self).is_plain_object(input)
    }
}
