// courseflow-core/tests/dispatch.rs
// ============================================================================
// Module: Action Dispatch Tests
// Description: Handler registry, policy, and fallback behavior tests.
// Purpose: Ensure actions resolve by type tag with a silent unsupported path.
// Dependencies: courseflow-core, serde_json
// ============================================================================
//! ## Overview
//! Validates the action handler registry: builtin handlers, registration of
//! custom handlers, policy gating, and the unsupported fallback that
//! resolves to no value without raising.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::collections::BTreeSet;

use courseflow_core::Action;
use courseflow_core::ActionAccessPolicy;
use courseflow_core::ActionContext;
use courseflow_core::ActionError;
use courseflow_core::ActionHandler;
use courseflow_core::ActionHandlerRegistry;
use courseflow_core::ActionType;
use courseflow_core::MapScope;
use courseflow_core::ResolverSpec;
use courseflow_core::RuntimeScope;
use courseflow_core::Value;
use courseflow_core::ValueKind;
use serde_json::json;

/// Builds an action with a literal resolver.
fn action(action_type: ActionType, value: serde_json::Value) -> Action {
    Action {
        action_type,
        context: ActionContext::new(),
        resolver: ResolverSpec::Literal {
            value,
        },
    }
}

// ============================================================================
// SECTION: Builtin Handlers
// ============================================================================

/// Verifies feedback actions resolve their text value.
#[test]
fn feedback_handler_resolves_text() {
    let registry = ActionHandlerRegistry::with_builtin_handlers();
    let scope = MapScope::new();
    let resolved = registry
        .resolve_action(&action(ActionType::Feedback, json!("Well done")), &scope)
        .unwrap();
    assert_eq!(resolved.action_type, ActionType::Feedback);
    assert_eq!(resolved.value, Some(Value::Text("Well done".to_string())));
}

/// Verifies handlers reject non-text values where text is required.
#[test]
fn feedback_handler_rejects_non_text_values() {
    let registry = ActionHandlerRegistry::with_builtin_handlers();
    let scope = MapScope::new();
    let err = registry
        .resolve_action(&action(ActionType::Feedback, json!(42)), &scope)
        .unwrap_err();
    assert_eq!(
        err,
        ActionError::InvalidValue {
            action_type: "FEEDBACK".to_string(),
            expected: ValueKind::Text,
        }
    );
}

/// Verifies variable assignment requires a name context entry.
#[test]
fn set_variable_handler_requires_a_name() {
    let registry = ActionHandlerRegistry::with_builtin_handlers();
    let scope = MapScope::new();

    let err = registry
        .resolve_action(&action(ActionType::SetVariable, json!(3)), &scope)
        .unwrap_err();
    assert_eq!(
        err,
        ActionError::MissingContext {
            action_type: "SET_VARIABLE".to_string(),
            key: "name".to_string(),
        }
    );

    let mut named = action(ActionType::SetVariable, json!(3));
    named.context.insert("name", json!("attempts"));
    let resolved = registry.resolve_action(&named, &scope).unwrap();
    assert_eq!(resolved.value, Some(Value::Number(3.0)));
}

/// Verifies action values resolve through the shared reference protocol.
#[test]
fn handlers_resolve_references_through_the_scope() {
    let registry = ActionHandlerRegistry::with_builtin_handlers();
    let mut scope = MapScope::new();
    scope.insert("feedback", json!({"passed": "Reviewed and approved"}));

    let reference_action = Action {
        action_type: ActionType::Notify,
        context: ActionContext::new(),
        resolver: ResolverSpec::Reference {
            path: "feedback.passed".to_string(),
        },
    };
    let resolved = registry.resolve_action(&reference_action, &scope).unwrap();
    assert_eq!(resolved.value, Some(Value::Text("Reviewed and approved".to_string())));
}

// ============================================================================
// SECTION: Unsupported Fallback
// ============================================================================

/// Verifies unsupported types resolve silently to no value.
#[test]
fn unsupported_action_resolves_to_no_value() {
    let registry = ActionHandlerRegistry::with_builtin_handlers();
    let scope = MapScope::new();
    let mut configured = action(ActionType::Unsupported("CONFETTI".to_string()), json!(null));
    configured.context.insert("intensity", json!("high"));

    let resolved = registry.resolve_action(&configured, &scope).unwrap();
    assert_eq!(resolved.action_type, ActionType::Unsupported("CONFETTI".to_string()));
    assert_eq!(resolved.value, None);
    assert_eq!(resolved.context.get_text("intensity"), Some("high"));
}

/// Verifies a recognized tag without a registered handler falls back.
#[test]
fn unregistered_known_tag_falls_back_to_unsupported() {
    let registry = ActionHandlerRegistry::new(ActionAccessPolicy::allow_all());
    let scope = MapScope::new();
    let resolved = registry
        .resolve_action(&action(ActionType::Feedback, json!("text")), &scope)
        .unwrap();
    assert_eq!(resolved.action_type, ActionType::Unsupported("FEEDBACK".to_string()));
    assert_eq!(resolved.value, None);
}

// ============================================================================
// SECTION: Policy
// ============================================================================

/// Verifies denylisted types are blocked.
#[test]
fn denylisted_action_is_blocked() {
    let mut denylist = BTreeSet::new();
    denylist.insert("NOTIFY".to_string());
    let mut registry = ActionHandlerRegistry::new(ActionAccessPolicy {
        allowlist: None,
        denylist,
    });
    registry.register_builtin_handlers();

    let scope = MapScope::new();
    let err = registry
        .resolve_action(&action(ActionType::Notify, json!("ping")), &scope)
        .unwrap_err();
    assert_eq!(
        err,
        ActionError::BlockedByPolicy {
            action_type: "NOTIFY".to_string(),
        }
    );
}

/// Verifies an allowlist restricts dispatch to listed types.
#[test]
fn allowlist_restricts_dispatch() {
    let mut allowlist = BTreeSet::new();
    allowlist.insert("FEEDBACK".to_string());
    let mut registry = ActionHandlerRegistry::new(ActionAccessPolicy {
        allowlist: Some(allowlist),
        denylist: BTreeSet::new(),
    });
    registry.register_builtin_handlers();

    let scope = MapScope::new();
    assert!(registry.resolve_action(&action(ActionType::Feedback, json!("ok")), &scope).is_ok());
    assert!(matches!(
        registry.resolve_action(&action(ActionType::Navigate, json!("node-2")), &scope),
        Err(ActionError::BlockedByPolicy { .. })
    ));
}

// ============================================================================
// SECTION: Custom Handlers
// ============================================================================

/// Handler used to exercise registry extension.
struct BadgeHandler;

impl ActionHandler for BadgeHandler {
    fn resolve(
        &self,
        action: &Action,
        scope: &dyn RuntimeScope,
    ) -> Result<Option<Value>, ActionError> {
        Ok(action.resolver.resolve(scope)?)
    }
}

/// Verifies custom handlers extend recognition by tag.
#[test]
fn custom_handlers_extend_the_registry() {
    let mut registry = ActionHandlerRegistry::with_builtin_handlers();
    let scope = MapScope::new();

    // Without a handler, BADGE takes the silent unsupported path.
    let parsed = ActionType::from_wire("BADGE");
    assert!(parsed.is_unsupported());
    let skipped =
        registry.resolve_action(&action(parsed.clone(), json!("gold")), &scope).unwrap();
    assert_eq!(skipped.value, None);

    // Registering a handler makes the tag recognized.
    registry.register_handler("BADGE", BadgeHandler);
    let resolved = registry.resolve_action(&action(parsed, json!("gold")), &scope).unwrap();
    assert_eq!(resolved.value, Some(Value::Text("gold".to_string())));
}

/// Verifies order preservation across a mixed action list.
#[test]
fn action_lists_resolve_in_order() {
    let registry = ActionHandlerRegistry::with_builtin_handlers();
    let scope = MapScope::new();
    let actions = vec![
        action(ActionType::Feedback, json!("first")),
        action(ActionType::Unsupported("CONFETTI".to_string()), json!(null)),
        action(ActionType::Navigate, json!("node-7")),
    ];
    let resolved = registry.resolve_actions(&actions, &scope).unwrap();
    assert_eq!(resolved.len(), 3);
    assert_eq!(resolved[0].value, Some(Value::Text("first".to_string())));
    assert_eq!(resolved[1].value, None);
    assert_eq!(resolved[2].value, Some(Value::Text("node-7".to_string())));
}
