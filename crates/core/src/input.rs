//! Tagged values at the untyped call boundary.
//!
//! Callers that hand over dynamically shaped input describe each argument
//! as an [`Input`]. Every input carries a runtime [`Tag`], which is the only
//! thing that tells a captured argument list apart from a plain array.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Runtime tag of an [`Input`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
    Arguments,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Undefined => "Undefined",
            Tag::Null => "Null",
            Tag::Boolean => "Boolean",
            Tag::Number => "Number",
            Tag::String => "String",
            Tag::Array => "Array",
            Tag::Object => "Object",
            Tag::Arguments => "Arguments",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[object {}]", self.as_str())
    }
}

/// The arguments a function was invoked with, captured as a list.
///
/// Holds the same data as an array but reports [`Tag::Arguments`].
/// Build one with [`Arguments::capture`] or the [`arguments!`](crate::arguments) macro.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Arguments(Vec<Value>);

impl Arguments {
    pub fn capture<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self(args.into_iter().map(Into::into).collect())
    }

    pub fn as_slice(&self) -> &[Value] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<Value> {
        self.0
    }
}

/// A JSON array becomes the argument list; any other value becomes a
/// single captured argument.
impl From<Value> for Arguments {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => Self(items),
            other => Self(vec![other]),
        }
    }
}

impl From<Vec<Value>> for Arguments {
    fn from(items: Vec<Value>) -> Self {
        Self(items)
    }
}

impl<'a> IntoIterator for &'a Arguments {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Capture a list of JSON-like values as [`Arguments`].
///
/// Accepts the same element syntax as `serde_json::json!` array literals.
///
/// ```
/// let args = paramcheck_core::arguments![1, "two", { "three": 3 }];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! arguments {
    () => {
        $crate::input::Arguments::default()
    };
    ($($tt:tt)+) => {
        $crate::input::Arguments::from($crate::__serde_json::json!([$($tt)+]))
    };
}

/// A borrowed view of one argument handed over by an untyped caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Input<'a> {
    /// The argument was not supplied at all.
    Undefined,
    Value(&'a Value),
    Arguments(&'a Arguments),
}

impl<'a> Input<'a> {
    pub fn tag(&self) -> Tag {
        match self {
            Input::Undefined => Tag::Undefined,
            Input::Arguments(_) => Tag::Arguments,
            Input::Value(value) => match value {
                Value::Null => Tag::Null,
                Value::Bool(_) => Tag::Boolean,
                Value::Number(_) => Tag::Number,
                Value::String(_) => Tag::String,
                Value::Array(_) => Tag::Array,
                Value::Object(_) => Tag::Object,
            },
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, Input::Undefined)
    }

    /// Loose truthiness: undefined, null, `false`, `0`, and `""` are falsy.
    /// Arrays, objects and argument lists are truthy even when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Input::Undefined => false,
            Input::Arguments(_) => true,
            Input::Value(value) => match value {
                Value::Null => false,
                Value::Bool(b) => *b,
                Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
                Value::String(s) => !s.is_empty(),
                Value::Array(_) | Value::Object(_) => true,
            },
        }
    }

    /// The elements of a genuine array or of a captured argument list.
    pub fn as_slice(self) -> Option<&'a [Value]> {
        match self {
            Input::Value(Value::Array(items)) => Some(items),
            Input::Arguments(args) => Some(args.as_slice()),
            _ => None,
        }
    }

    /// The elements of a genuine array only.
    pub fn as_array(self) -> Option<&'a [Value]> {
        match self {
            Input::Value(Value::Array(items)) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(self) -> Option<&'a Map<String, Value>> {
        match self {
            Input::Value(Value::Object(map)) => Some(map),
            _ => None,
        }
    }
}

impl<'a> From<&'a Value> for Input<'a> {
    fn from(value: &'a Value) -> Self {
        Input::Value(value)
    }
}

impl<'a> From<&'a Arguments> for Input<'a> {
    fn from(args: &'a Arguments) -> Self {
        Input::Arguments(args)
    }
}

impl<'a> From<Option<&'a Value>> for Input<'a> {
    fn from(value: Option<&'a Value>) -> Self {
        value.map_or(Input::Undefined, Input::Value)
    }
}

/// Whether `input` is a captured argument list.
///
/// Decided by the runtime tag alone. Never panics.
pub fn is_arguments(input: Input<'_>) -> bool {
    input.tag() == Tag::Arguments
}
