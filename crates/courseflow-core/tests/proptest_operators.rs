// courseflow-core/tests/proptest_operators.rs
// ============================================================================
// Module: Operator Property-Based Tests
// Description: Property tests for operator correctness and stability.
// Purpose: Detect panics and invariant violations across wide input ranges.
// ============================================================================

//! Property-based tests for operator invariants.

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
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeMap;

use courseflow_core::OperatorError;
use courseflow_core::OperatorKind;
use courseflow_core::Value;
use courseflow_core::apply_operator;
use proptest::prelude::*;

/// Applies a binary operator without options.
fn apply(operator: OperatorKind, lhs: &Value, rhs: &Value) -> Result<bool, OperatorError> {
    apply_operator(operator, Some(lhs), Some(rhs), &BTreeMap::new())
}

/// Strategy producing arbitrary resolved values up to a small depth.
fn value_strategy() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Value::Boolean),
        any::<f64>().prop_filter("finite", |v| v.is_finite()).prop_map(Value::Number),
        "[a-z]{0,6}".prop_map(Value::Text),
    ];
    leaf.prop_recursive(2, 16, 4, |inner| {
        prop::collection::vec(inner, 0 .. 4).prop_map(Value::List)
    })
}

proptest! {
    #[test]
    fn not_equals_is_the_negation_of_equals(
        left in value_strategy(),
        right in value_strategy(),
    ) {
        let positive = apply(OperatorKind::Equals, &left, &right);
        let negated = apply(OperatorKind::NotEquals, &left, &right);
        match (positive, negated) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, !b),
            (Err(_), Err(_)) => {}
            (positive, negated) => {
                prop_assert!(false, "decorator diverged: {positive:?} vs {negated:?}");
            }
        }
    }

    #[test]
    fn is_not_is_the_negation_of_is(
        left in value_strategy(),
        right in value_strategy(),
    ) {
        let positive = apply(OperatorKind::Is, &left, &right);
        let negated = apply(OperatorKind::IsNot, &left, &right);
        match (positive, negated) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, !b),
            (Err(_), Err(_)) => {}
            (positive, negated) => {
                prop_assert!(false, "decorator diverged: {positive:?} vs {negated:?}");
            }
        }
    }

    #[test]
    fn equals_on_lists_ignores_permutation(
        items in prop::collection::vec(value_strategy(), 0 .. 5),
        seed in any::<u64>(),
    ) {
        let mut shuffled = items.clone();
        // Deterministic Fisher-Yates driven by the seed.
        let mut state = seed;
        for index in (1 .. shuffled.len()).rev() {
            state = state.wrapping_mul(6_364_136_223_846_793_005).wrapping_add(1);
            #[allow(clippy::cast_possible_truncation, reason = "Modulo bounds the index.")]
            let pick = (state % (index as u64 + 1)) as usize;
            shuffled.swap(index, pick);
        }
        let left = Value::List(items);
        let right = Value::List(shuffled);
        prop_assert_eq!(apply(OperatorKind::Equals, &left, &right), Ok(true));
    }

    #[test]
    fn every_operator_returns_without_panicking(
        left in value_strategy(),
        right in value_strategy(),
    ) {
        for operator in OperatorKind::all() {
            let _ = apply(operator, &left, &right);
            let _ = apply_operator(operator, Some(&left), None, &BTreeMap::new());
            let _ = apply_operator(operator, None, Some(&right), &BTreeMap::new());
            let _ = apply_operator(operator, None, None, &BTreeMap::new());
        }
    }

    #[test]
    fn ordering_is_consistent_with_float_comparison(a in any::<f64>(), b in any::<f64>()) {
        prop_assume!(a.is_finite() && b.is_finite());
        let left = Value::Number(a);
        let right = Value::Number(b);
        prop_assert_eq!(apply(OperatorKind::Gt, &left, &right), Ok(a > b));
        prop_assert_eq!(apply(OperatorKind::Ge, &left, &right), Ok(a >= b));
        prop_assert_eq!(apply(OperatorKind::Lt, &left, &right), Ok(a < b));
        prop_assert_eq!(apply(OperatorKind::Le, &left, &right), Ok(a <= b));
    }
}
