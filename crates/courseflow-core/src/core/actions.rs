// courseflow-core/src/core/actions.rs
// ============================================================================
// Module: CourseFlow Action Model
// Description: Action type vocabulary, wire specifications, and outcomes.
// Purpose: Model the typed actions selected when a scenario matches.
// Dependencies: crate::core::{operand, value}, serde, serde_json
// ============================================================================

//! ## Overview
//! Actions are selected when a scenario's condition holds and are handed to
//! the external execution collaborator. The wire vocabulary is open: known
//! type names map to closed enum variants, and everything else maps to the
//! mandatory `Unsupported` catch-all, which carries its raw configuration
//! opaquely, participates in the resolution protocol with a LITERAL
//! resolver, and resolves to no value. An unsupported action is a silent
//! no-op, not an error; callers must not assume every configured action
//! type executes.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::operand::ResolverSpec;
use crate::core::value::Value;

// ============================================================================
// SECTION: Action Types
// ============================================================================

/// Action type vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionType {
    /// Show feedback text to the learner.
    Feedback,
    /// Navigate the learner to another courseware node.
    Navigate,
    /// Set a variable in the learner's runtime state.
    SetVariable,
    /// Notify an external channel about the match.
    Notify,
    /// Catch-all for action types this engine does not recognize.
    Unsupported(String),
}

impl ActionType {
    /// Maps a wire type name onto the vocabulary.
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "FEEDBACK" => Self::Feedback,
            "NAVIGATE" => Self::Navigate,
            "SET_VARIABLE" => Self::SetVariable,
            "NOTIFY" => Self::Notify,
            _ => Self::Unsupported(raw.to_string()),
        }
    }

    /// Returns the wire name for this action type.
    #[must_use]
    pub fn wire_name(&self) -> &str {
        match self {
            Self::Feedback => "FEEDBACK",
            Self::Navigate => "NAVIGATE",
            Self::SetVariable => "SET_VARIABLE",
            Self::Notify => "NOTIFY",
            Self::Unsupported(raw) => raw,
        }
    }

    /// Returns true when this type is the unsupported catch-all.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}

impl From<String> for ActionType {
    fn from(raw: String) -> Self {
        Self::from_wire(&raw)
    }
}

impl From<ActionType> for String {
    fn from(action_type: ActionType) -> Self {
        action_type.wire_name().to_string()
    }
}

// ============================================================================
// SECTION: Action Context
// ============================================================================

/// Opaque per-action configuration carried alongside the type tag.
///
/// Unrecognized wire keys of an action object land here, which is how the
/// unsupported catch-all keeps its raw configuration intact.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionContext {
    /// Context entries keyed by wire name.
    entries: BTreeMap<String, serde_json::Value>,
}

impl ActionContext {
    /// Creates an empty context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Inserts a context entry.
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.entries.insert(key.into(), value);
    }

    /// Returns the entry for a key, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.entries.get(key)
    }

    /// Returns the text entry for a key, if present and textual.
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(serde_json::Value::as_str)
    }

    /// Returns true when the context has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// SECTION: Action Specifications
// ============================================================================

/// Wire action specification attached to a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    /// Action type tag; unknown names map to the unsupported catch-all.
    #[serde(rename = "type")]
    pub action_type: ActionType,
    /// Resolver for the action value; required for recognized types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolver: Option<ResolverSpec>,
    /// Remaining configuration keys, kept opaquely.
    #[serde(flatten)]
    pub context: ActionContext,
}

/// Compiled action ready for per-request resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    /// Action type tag.
    pub action_type: ActionType,
    /// Opaque configuration for the handler.
    pub context: ActionContext,
    /// Resolver for the action value. Unsupported actions always carry a
    /// LITERAL null resolver so they participate in the resolution protocol
    /// without performing real work.
    pub resolver: ResolverSpec,
}

// ============================================================================
// SECTION: Resolved Actions
// ============================================================================

/// Action with its resolved value, handed to the execution collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedAction {
    /// Action type tag (wire name for unsupported types).
    #[serde(rename = "type")]
    pub action_type: ActionType,
    /// Opaque configuration for the executor.
    pub context: ActionContext,
    /// Resolved action value; always absent for unsupported types.
    pub value: Option<Value>,
}
