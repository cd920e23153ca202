// courseflow-core/src/runtime/dispatch.rs
// ============================================================================
// Module: CourseFlow Action Dispatch
// Description: Handler registry and builtin handlers for action resolution.
// Purpose: Route actions by type tag with policy checks and a silent fallback.
// Dependencies: crate::{core, interfaces}, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Action dispatch is a lookup into an extensible registry of handlers, one
//! handler per known type tag. Each action resolves independently and in
//! specification order. A type tag the registry does not recognize falls
//! back to the unsupported path: the resolved action carries no value and
//! no error is raised. Registered handlers validate their configuration and
//! resolve the action value through the same resolver protocol operands use.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use thiserror::Error;

use crate::core::actions::Action;
use crate::core::actions::ActionType;
use crate::core::actions::ResolvedAction;
use crate::core::operand::ResolutionError;
use crate::core::value::Value;
use crate::core::value::ValueKind;
use crate::interfaces::RuntimeScope;

// ============================================================================
// SECTION: Access Policy
// ============================================================================

/// Access policy controlling which action types may be dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionAccessPolicy {
    /// Optional allowlist of action type wire names.
    pub allowlist: Option<BTreeSet<String>>,
    /// Explicit denylist of action type wire names.
    pub denylist: BTreeSet<String>,
}

impl ActionAccessPolicy {
    /// Returns a policy that permits all action types.
    #[must_use]
    pub const fn allow_all() -> Self {
        Self {
            allowlist: None,
            denylist: BTreeSet::new(),
        }
    }

    /// Returns true when the action type is allowed by policy.
    #[must_use]
    pub fn is_allowed(&self, action_type: &str) -> bool {
        if self.denylist.contains(action_type) {
            return false;
        }
        if let Some(allowlist) = &self.allowlist {
            return allowlist.contains(action_type);
        }
        true
    }
}

impl Default for ActionAccessPolicy {
    fn default() -> Self {
        Self::allow_all()
    }
}

// ============================================================================
// SECTION: Handler Contract
// ============================================================================

/// Action resolution errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    /// Action type is blocked by the access policy.
    #[error("action type blocked by policy: {action_type}")]
    BlockedByPolicy {
        /// Wire name of the blocked action type.
        action_type: String,
    },
    /// Handler requires a context entry that is missing or not textual.
    #[error("action type {action_type} requires context entry {key}")]
    MissingContext {
        /// Wire name of the action type.
        action_type: String,
        /// Missing context key.
        key: String,
    },
    /// Handler rejected the resolved value kind.
    #[error("action type {action_type} requires a {expected} value")]
    InvalidValue {
        /// Wire name of the action type.
        action_type: String,
        /// Expected value kind.
        expected: ValueKind,
    },
    /// Operand resolution failed for the action value.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
}

/// Handler resolving the value of one known action type.
pub trait ActionHandler {
    /// Resolves the action value for dispatch.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] when the action configuration or resolved
    /// value is invalid.
    fn resolve(
        &self,
        action: &Action,
        scope: &dyn RuntimeScope,
    ) -> Result<Option<Value>, ActionError>;
}

// ============================================================================
// SECTION: Handler Registry
// ============================================================================

/// Action handler registry with policy enforcement.
pub struct ActionHandlerRegistry {
    /// Handler implementations keyed by action type wire name.
    handlers: BTreeMap<String, Box<dyn ActionHandler + Send + Sync>>,
    /// Access control policy for action dispatch.
    policy: ActionAccessPolicy,
}

impl ActionHandlerRegistry {
    /// Creates a new registry with the provided policy.
    #[must_use]
    pub fn new(policy: ActionAccessPolicy) -> Self {
        Self {
            handlers: BTreeMap::new(),
            policy,
        }
    }

    /// Creates a registry with builtin handlers registered.
    #[must_use]
    pub fn with_builtin_handlers() -> Self {
        let mut registry = Self::new(ActionAccessPolicy::default());
        registry.register_builtin_handlers();
        registry
    }

    /// Registers a handler under the given action type wire name.
    pub fn register_handler(
        &mut self,
        action_type: impl Into<String>,
        handler: impl ActionHandler + Send + Sync + 'static,
    ) {
        self.handlers.insert(action_type.into(), Box::new(handler));
    }

    /// Registers the builtin handlers.
    pub fn register_builtin_handlers(&mut self) {
        self.register_handler("FEEDBACK", FeedbackHandler);
        self.register_handler("NAVIGATE", NavigateHandler);
        self.register_handler("SET_VARIABLE", SetVariableHandler);
        self.register_handler("NOTIFY", NotifyHandler);
    }

    /// Returns the configured policy.
    #[must_use]
    pub const fn policy(&self) -> &ActionAccessPolicy {
        &self.policy
    }

    /// Resolves one action against a scope snapshot.
    ///
    /// A type tag without a registered handler resolves through the
    /// unsupported path: no value, no error.
    ///
    /// # Errors
    ///
    /// Returns [`ActionError`] when the type is blocked by policy or a
    /// registered handler rejects the action.
    pub fn resolve_action(
        &self,
        action: &Action,
        scope: &dyn RuntimeScope,
    ) -> Result<ResolvedAction, ActionError> {
        let wire_name = action.action_type.wire_name();

        // Recognition is registry-driven: a tag without a handler takes the
        // silent unsupported path, whatever the vocabulary says.
        let Some(handler) = self.handlers.get(wire_name) else {
            return Ok(unsupported_outcome(action));
        };
        if !self.policy.is_allowed(wire_name) {
            return Err(ActionError::BlockedByPolicy {
                action_type: wire_name.to_string(),
            });
        }

        let value = handler.resolve(action, scope)?;
        Ok(ResolvedAction {
            action_type: action.action_type.clone(),
            context: action.context.clone(),
            value,
        })
    }

    /// Resolves a scenario's actions independently, preserving order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ActionError`] encountered, in action order.
    pub fn resolve_actions(
        &self,
        actions: &[Action],
        scope: &dyn RuntimeScope,
    ) -> Result<Vec<ResolvedAction>, ActionError> {
        actions.iter().map(|action| self.resolve_action(action, scope)).collect()
    }
}

impl Default for ActionHandlerRegistry {
    fn default() -> Self {
        Self::with_builtin_handlers()
    }
}

/// Builds the unsupported outcome for an action: no value, not an error.
fn unsupported_outcome(action: &Action) -> ResolvedAction {
    let action_type = match &action.action_type {
        ActionType::Unsupported(raw) => ActionType::Unsupported(raw.clone()),
        known => ActionType::Unsupported(known.wire_name().to_string()),
    };
    ResolvedAction {
        action_type,
        context: action.context.clone(),
        value: None,
    }
}

// ============================================================================
// SECTION: Builtin Handlers
// ============================================================================

/// Handler for feedback actions; resolves the feedback text.
pub struct FeedbackHandler;

impl ActionHandler for FeedbackHandler {
    fn resolve(
        &self,
        action: &Action,
        scope: &dyn RuntimeScope,
    ) -> Result<Option<Value>, ActionError> {
        resolve_text_value(action, scope)
    }
}

/// Handler for navigation actions; resolves the target node identifier.
pub struct NavigateHandler;

impl ActionHandler for NavigateHandler {
    fn resolve(
        &self,
        action: &Action,
        scope: &dyn RuntimeScope,
    ) -> Result<Option<Value>, ActionError> {
        resolve_text_value(action, scope)
    }
}

/// Handler for variable assignment; requires a `name` context entry.
pub struct SetVariableHandler;

impl ActionHandler for SetVariableHandler {
    fn resolve(
        &self,
        action: &Action,
        scope: &dyn RuntimeScope,
    ) -> Result<Option<Value>, ActionError> {
        if action.context.get_text("name").is_none() {
            return Err(ActionError::MissingContext {
                action_type: action.action_type.wire_name().to_string(),
                key: "name".to_string(),
            });
        }
        Ok(action.resolver.resolve(scope)?)
    }
}

/// Handler for notifications; resolves the message text.
pub struct NotifyHandler;

impl ActionHandler for NotifyHandler {
    fn resolve(
        &self,
        action: &Action,
        scope: &dyn RuntimeScope,
    ) -> Result<Option<Value>, ActionError> {
        resolve_text_value(action, scope)
    }
}

/// Resolves an action value and requires it to be Text when present.
fn resolve_text_value(
    action: &Action,
    scope: &dyn RuntimeScope,
) -> Result<Option<Value>, ActionError> {
    let value = action.resolver.resolve(scope)?;
    if let Some(value) = &value
        && value.as_text().is_none()
    {
        return Err(ActionError::InvalidValue {
            action_type: action.action_type.wire_name().to_string(),
            expected: ValueKind::Text,
        });
    }
    Ok(value)
}
