// courseflow-core/src/core/operand.rs
// ============================================================================
// Module: CourseFlow Operand Model
// Description: Operand specifications, resolver variants, and resolution.
// Purpose: Turn literal or reference specifications into resolved values.
// Dependencies: crate::{core::value, interfaces}, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! An operand is a value to be compared. Its specification names *how* the
//! value is obtained: a `LITERAL` carries the value inline and never fails;
//! a `REFERENCE` names a dotted path into the runtime scope supplied by the
//! caller. New resolver kinds extend the variant set; there is no resolver
//! subclassing. Resolution is a pure read with no side effects, safe to
//! repeat and to run concurrently for independent operands, and it happens
//! strictly before any operator runs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::value::Value;
use crate::core::value::ValueError;
use crate::interfaces::RuntimeScope;
use crate::interfaces::ScopeError;

// ============================================================================
// SECTION: Operand Specification
// ============================================================================

/// Resolver discriminant used by operand specifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolverType {
    /// Value is carried inline in the specification.
    Literal,
    /// Value is fetched from the runtime scope by path.
    Reference,
}

/// Wire operand specification (`lhs` / `rhs` objects).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperandSpec {
    /// Resolver discriminant for this operand.
    #[serde(rename = "operandType")]
    pub operand_type: ResolverType,
    /// Literal payload or reference path, depending on the discriminant.
    #[serde(default)]
    pub value: serde_json::Value,
}

impl OperandSpec {
    /// Creates a literal operand specification.
    #[must_use]
    pub const fn literal(value: serde_json::Value) -> Self {
        Self {
            operand_type: ResolverType::Literal,
            value,
        }
    }

    /// Creates a reference operand specification for the given path.
    #[must_use]
    pub fn reference(path: impl Into<String>) -> Self {
        Self {
            operand_type: ResolverType::Reference,
            value: serde_json::Value::String(path.into()),
        }
    }

    /// Converts the wire specification into a resolver context.
    ///
    /// # Errors
    ///
    /// Returns [`OperandError`] when a reference payload is not a text path
    /// or a literal payload has no representation in the value union.
    pub fn to_resolver(&self) -> Result<ResolverSpec, OperandError> {
        match self.operand_type {
            ResolverType::Literal => {
                Value::from_json(&self.value).map_err(OperandError::MalformedLiteral)?;
                Ok(ResolverSpec::Literal {
                    value: self.value.clone(),
                })
            }
            ResolverType::Reference => match &self.value {
                serde_json::Value::String(path) if !path.trim().is_empty() => {
                    Ok(ResolverSpec::Reference {
                        path: path.clone(),
                    })
                }
                _ => Err(OperandError::InvalidReferencePath),
            },
        }
    }
}

// ============================================================================
// SECTION: Resolver Context
// ============================================================================

/// How a value is obtained at evaluation time.
///
/// This is the resolver context shared by operands and actions. Adding a
/// resolver kind means adding a variant here and a match arm in
/// [`ResolverSpec::resolve`]; concrete resolvers are never subclassed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolverSpec {
    /// Inline value; never fails to resolve.
    Literal {
        /// Literal wire payload; JSON `null` resolves to absent.
        #[serde(default)]
        value: serde_json::Value,
    },
    /// Dotted path into the runtime scope.
    Reference {
        /// Path into the caller-supplied scope.
        #[serde(rename = "value")]
        path: String,
    },
}

impl ResolverSpec {
    /// Returns the resolver discriminant.
    #[must_use]
    pub const fn resolver_type(&self) -> ResolverType {
        match self {
            Self::Literal {
                ..
            } => ResolverType::Literal,
            Self::Reference {
                ..
            } => ResolverType::Reference,
        }
    }

    /// Resolves this specification against a runtime scope snapshot.
    ///
    /// A reference whose path is not present in the scope is a resolution
    /// error; a path that resolves to an explicit JSON `null` (and a `null`
    /// literal) yields an absent value for the per-operator null policy.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when a reference target cannot be located
    /// or a fetched payload has no representation in the value union.
    pub fn resolve(&self, scope: &dyn RuntimeScope) -> Result<Option<Value>, ResolutionError> {
        match self {
            Self::Literal {
                value,
            } => Value::from_json(value).map_err(|source| ResolutionError::Malformed {
                path: None,
                source,
            }),
            Self::Reference {
                path,
            } => {
                let fetched =
                    scope.value_at(path).map_err(|source| ResolutionError::Scope {
                        path: path.clone(),
                        source,
                    })?;
                let Some(json) = fetched else {
                    return Err(ResolutionError::ReferenceNotFound {
                        path: path.clone(),
                    });
                };
                Value::from_json(&json).map_err(|source| ResolutionError::Malformed {
                    path: Some(path.clone()),
                    source,
                })
            }
        }
    }
}

// ============================================================================
// SECTION: Resolved Operand
// ============================================================================

/// Operand with its resolution outcome bound to one evaluation.
///
/// Operands are owned exclusively by the evaluator created for a single
/// evaluation request; they are never shared across concurrent evaluations.
/// Because resolution happens once at construction against an immutable
/// scope snapshot, re-reading the value is trivially idempotent.
#[derive(Debug, Clone, PartialEq)]
pub struct Operand {
    /// Resolver context this operand was built from.
    resolver: ResolverSpec,
    /// Resolved value; absent for null payloads.
    value: Option<Value>,
}

impl Operand {
    /// Resolves an operand from its resolver context and a scope snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when resolution fails.
    pub fn resolve_from(
        resolver: &ResolverSpec,
        scope: &dyn RuntimeScope,
    ) -> Result<Self, ResolutionError> {
        let value = resolver.resolve(scope)?;
        Ok(Self {
            resolver: resolver.clone(),
            value,
        })
    }

    /// Returns the resolver context this operand was built from.
    #[must_use]
    pub const fn resolver(&self) -> &ResolverSpec {
        &self.resolver
    }

    /// Returns the resolved value, if present.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when converting wire operand specifications.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperandError {
    /// Reference payload must be a non-empty text path.
    #[error("reference operand requires a non-empty text path")]
    InvalidReferencePath,
    /// Literal payload has no representation in the value union.
    #[error("malformed literal operand: {0}")]
    MalformedLiteral(#[source] ValueError),
}

/// Errors raised while resolving operands against a runtime scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    /// Reference path was not found in the runtime scope.
    #[error("reference not found in runtime scope: {path}")]
    ReferenceNotFound {
        /// Path that could not be located.
        path: String,
    },
    /// Runtime scope reported an error while fetching the path.
    #[error("runtime scope failed for {path}: {source}")]
    Scope {
        /// Path whose fetch failed.
        path: String,
        /// Underlying scope error.
        source: ScopeError,
    },
    /// Fetched or literal payload has no representation in the value union.
    #[error("malformed operand payload at {}: {source}", .path.as_deref().unwrap_or("literal"))]
    Malformed {
        /// Reference path, when the payload came from the scope.
        path: Option<String>,
        /// Underlying conversion error.
        source: ValueError,
    },
}
