// courseflow-core/src/core/value.rs
// ============================================================================
// Module: CourseFlow Value Model
// Description: Closed runtime value union for operand comparison.
// Purpose: Give operators a typed, exhaustively matchable value domain.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Operand resolution produces values from this closed union: Boolean,
//! Number (64-bit float), Text, or List. Every operator matches exhaustively
//! over these kinds, so type-mismatch handling is a match arm rather than a
//! runtime cast failure. Wire JSON converts through [`Value::from_json`]:
//! `null` converts to an *absent* value (there is no null variant), and
//! objects are rejected as malformed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Value Union
// ============================================================================

/// Resolved operand value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Boolean value.
    Boolean(bool),
    /// Numeric value (64-bit float).
    Number(f64),
    /// Text value.
    Text(String),
    /// Ordered list of values.
    List(Vec<Value>),
}

impl Value {
    /// Returns the kind tag for this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Boolean(_) => ValueKind::Boolean,
            Self::Number(_) => ValueKind::Number,
            Self::Text(_) => ValueKind::Text,
            Self::List(_) => ValueKind::List,
        }
    }

    /// Returns the boolean payload when this value is a Boolean.
    #[must_use]
    pub const fn as_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the numeric payload when this value is a Number.
    #[must_use]
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the text payload when this value is Text.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    /// Returns the list payload when this value is a List.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    /// Converts a wire JSON value into a resolved value.
    ///
    /// JSON `null` converts to `None` (absent), which is what the
    /// per-operator null policy consumes. Objects and non-finite numbers are
    /// rejected as malformed; `null` inside a list is rejected as well.
    ///
    /// # Errors
    ///
    /// Returns [`ValueError`] when the JSON value has no representation in
    /// the closed union.
    pub fn from_json(json: &serde_json::Value) -> Result<Option<Self>, ValueError> {
        match json {
            serde_json::Value::Null => Ok(None),
            serde_json::Value::Bool(value) => Ok(Some(Self::Boolean(*value))),
            serde_json::Value::Number(number) => number
                .as_f64()
                .map(|value| Some(Self::Number(value)))
                .ok_or(ValueError::NonFiniteNumber),
            serde_json::Value::String(value) => Ok(Some(Self::Text(value.clone()))),
            serde_json::Value::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    match Self::from_json(item)? {
                        Some(value) => out.push(value),
                        None => return Err(ValueError::NullListElement),
                    }
                }
                Ok(Some(Self::List(out)))
            }
            serde_json::Value::Object(_) => Err(ValueError::UnsupportedObject),
        }
    }

    /// Converts this value back into wire JSON.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Boolean(value) => serde_json::Value::Bool(*value),
            Self::Number(value) => serde_json::Number::from_f64(*value)
                .map_or(serde_json::Value::Null, serde_json::Value::Number),
            Self::Text(value) => serde_json::Value::String(value.clone()),
            Self::List(values) => {
                serde_json::Value::Array(values.iter().map(Self::to_json).collect())
            }
        }
    }
}

// ============================================================================
// SECTION: Value Kinds
// ============================================================================

/// Kind tag for resolved values, used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Boolean kind.
    Boolean,
    /// Numeric kind.
    Number,
    /// Text kind.
    Text,
    /// List kind.
    List,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Text => "text",
            Self::List => "list",
        };
        f.write_str(label)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when converting wire JSON into the value union.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// JSON objects have no representation in the value union.
    #[error("json objects are not supported as operand values")]
    UnsupportedObject,
    /// JSON number is not representable as a finite 64-bit float.
    #[error("json number is not representable as a finite 64-bit float")]
    NonFiniteNumber,
    /// Lists may not contain null elements.
    #[error("json lists may not contain null elements")]
    NullListElement,
}
