// courseflow-core/tests/evaluator.rs
// ============================================================================
// Module: Evaluator Tests
// Description: Operand resolution and evaluator behavior tests.
// Purpose: Ensure the two-phase contract, negation, and idempotence hold.
// Dependencies: courseflow-core, serde_json
// ============================================================================
//! ## Overview
//! Validates operand resolution against scope snapshots, the post-hoc
//! negation decorator, and evaluator idempotence over resolved operands.

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

use std::collections::BTreeMap;

use courseflow_core::Evaluator;
use courseflow_core::EvaluatorDef;
use courseflow_core::MapScope;
use courseflow_core::Operand;
use courseflow_core::OperatorKind;
use courseflow_core::ResolutionError;
use courseflow_core::ResolverSpec;
use courseflow_core::Value;
use serde_json::json;

/// Builds a binary evaluator definition.
fn binary_def(
    operator: OperatorKind,
    lhs: ResolverSpec,
    rhs: ResolverSpec,
    negate: bool,
) -> EvaluatorDef {
    EvaluatorDef {
        index: 0,
        operator,
        lhs,
        rhs: Some(rhs),
        options: BTreeMap::new(),
        negate,
    }
}

/// Builds a literal resolver.
fn literal(value: serde_json::Value) -> ResolverSpec {
    ResolverSpec::Literal {
        value,
    }
}

/// Builds a reference resolver.
fn reference(path: &str) -> ResolverSpec {
    ResolverSpec::Reference {
        path: path.to_string(),
    }
}

// ============================================================================
// SECTION: Operand Resolution
// ============================================================================

/// Verifies literal resolution never touches the scope.
#[test]
fn literal_operands_resolve_without_a_scope_entry() {
    let scope = MapScope::new();
    let operand = Operand::resolve_from(&literal(json!(0.72)), &scope).unwrap();
    assert_eq!(operand.value(), Some(&Value::Number(0.72)));
}

/// Verifies a null literal resolves to an absent value.
#[test]
fn null_literal_resolves_to_absent() {
    let scope = MapScope::new();
    let operand = Operand::resolve_from(&literal(json!(null)), &scope).unwrap();
    assert_eq!(operand.value(), None);
}

/// Verifies reference resolution traverses dotted paths.
#[test]
fn reference_operands_traverse_dotted_paths() {
    let mut scope = MapScope::new();
    scope.insert("response", json!({"score": {"raw": 0.72}}));
    let operand = Operand::resolve_from(&reference("response.score.raw"), &scope).unwrap();
    assert_eq!(operand.value(), Some(&Value::Number(0.72)));
}

/// Verifies a missing reference is a resolution error.
#[test]
fn missing_reference_is_a_resolution_error() {
    let scope = MapScope::new();
    let err = Operand::resolve_from(&reference("missing.path"), &scope).unwrap_err();
    assert_eq!(
        err,
        ResolutionError::ReferenceNotFound {
            path: "missing.path".to_string(),
        }
    );
}

/// Verifies an explicit null in the scope resolves to absent, not an error.
#[test]
fn null_scope_entry_resolves_to_absent() {
    let mut scope = MapScope::new();
    scope.insert("answer", json!(null));
    let operand = Operand::resolve_from(&reference("answer"), &scope).unwrap();
    assert_eq!(operand.value(), None);
}

// ============================================================================
// SECTION: Evaluator Behavior
// ============================================================================

/// Verifies evaluation over resolved operands.
#[test]
fn evaluator_applies_the_bound_operator() {
    let scope = MapScope::new();
    let def = binary_def(
        OperatorKind::Gt,
        literal(json!(0.72)),
        literal(json!(0.5)),
        false,
    );
    let evaluator = Evaluator::resolve(&def, &scope).unwrap();
    assert_eq!(evaluator.evaluate(), Ok(true));
}

/// Verifies negation inverts the verdict after the operator runs.
#[test]
fn negate_inverts_after_the_operator_runs() {
    let scope = MapScope::new();
    let plain = binary_def(
        OperatorKind::Contains,
        literal(json!("nation-state")),
        literal(json!("state")),
        false,
    );
    let negated = binary_def(
        OperatorKind::Contains,
        literal(json!("nation-state")),
        literal(json!("state")),
        true,
    );
    assert_eq!(Evaluator::resolve(&plain, &scope).unwrap().evaluate(), Ok(true));
    assert_eq!(Evaluator::resolve(&negated, &scope).unwrap().evaluate(), Ok(false));
}

/// Verifies a resolved evaluator is idempotent.
#[test]
fn resolved_evaluators_are_idempotent() {
    let mut scope = MapScope::new();
    scope.insert("tags", json!(["reviewed", "final"]));
    let def = binary_def(
        OperatorKind::Contains,
        reference("tags"),
        literal(json!("reviewed")),
        false,
    );
    let evaluator = Evaluator::resolve(&def, &scope).unwrap();
    let first = evaluator.evaluate();
    let second = evaluator.evaluate();
    assert_eq!(first, Ok(true));
    assert_eq!(first, second);
}

/// Verifies resolution failures abort the evaluator before evaluation.
#[test]
fn resolution_failure_aborts_the_evaluator() {
    let scope = MapScope::new();
    let def = binary_def(
        OperatorKind::Gt,
        reference("score"),
        literal(json!(0.5)),
        false,
    );
    let err = Evaluator::resolve(&def, &scope).unwrap_err();
    assert_eq!(
        err,
        ResolutionError::ReferenceNotFound {
            path: "score".to_string(),
        }
    );
}
