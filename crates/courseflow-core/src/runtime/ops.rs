// courseflow-core/src/runtime/ops.rs
// ============================================================================
// Module: CourseFlow Operator Evaluation
// Description: Pure operator application over resolved operand values.
// Purpose: Convert resolved operands into boolean verdicts per operator.
// Dependencies: crate::core::{operators, value}, thiserror
// ============================================================================

//! ## Overview
//! Operator evaluation is a pure function of resolved operand values and an
//! options map. Two policies are enforced per operator and preserved exactly
//! for existing authored content: the null-safe family evaluates to false
//! when either operand is absent, while every other operator raises a type
//! mismatch for absent or wrongly-kinded operands. The deprecated alias
//! operators route through their positive base and invert the verdict, so
//! the pair cannot drift apart.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use thiserror::Error;

use crate::core::operators::OperatorKind;
use crate::core::value::Value;

// ============================================================================
// SECTION: Options
// ============================================================================

/// Option key enabling case-insensitive text predicates.
pub const OPTION_IGNORE_CASE: &str = "IGNORE_CASE";

/// Returns true when the ignore-case option is enabled.
///
/// The option is enabled when its value equals `"true"` compared
/// case-insensitively.
fn ignore_case_enabled(options: &BTreeMap<String, String>) -> bool {
    options.get(OPTION_IGNORE_CASE).is_some_and(|value| value.eq_ignore_ascii_case("true"))
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by operator application.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OperatorError {
    /// Resolved operand values do not satisfy the operator's expectation.
    #[error("{operator} Operation not supported for operand types")]
    TypeMismatch {
        /// Operator whose expectation was violated.
        operator: OperatorKind,
    },
}

/// Builds the type-mismatch error for an operator.
const fn mismatch(operator: OperatorKind) -> OperatorError {
    OperatorError::TypeMismatch {
        operator,
    }
}

// ============================================================================
// SECTION: Operator Application
// ============================================================================

/// Applies an operator to resolved operand values.
///
/// `rhs` must be `None` for unary operators; the evaluator enforces arity
/// before resolution, so this function only distinguishes absent values.
///
/// # Errors
///
/// Returns [`OperatorError::TypeMismatch`] when operand kinds do not satisfy
/// the operator outside the null-safe family.
pub fn apply_operator(
    operator: OperatorKind,
    lhs: Option<&Value>,
    rhs: Option<&Value>,
    options: &BTreeMap<String, String>,
) -> Result<bool, OperatorError> {
    // Deprecated aliases are pure decorators over their positive base.
    if let Some(base) = operator.negation_base() {
        return apply_operator(base, lhs, rhs, options).map(|verdict| !verdict);
    }

    // Null-safe operators never raise for absent operands.
    if operator.is_null_safe() && (lhs.is_none() || rhs.is_none()) {
        return Ok(false);
    }

    match operator {
        OperatorKind::And | OperatorKind::Or => eval_connective(operator, lhs, rhs),
        OperatorKind::Not => eval_negation(lhs, rhs),
        OperatorKind::Is => eval_is(operator, lhs, rhs),
        OperatorKind::Equals => eval_equals(operator, lhs, rhs),
        OperatorKind::Ge | OperatorKind::Le | OperatorKind::Gt | OperatorKind::Lt => {
            eval_ordering(operator, lhs, rhs)
        }
        OperatorKind::StartsWith | OperatorKind::EndsWith => {
            eval_affix(operator, lhs, rhs, options)
        }
        OperatorKind::Contains => eval_contains(operator, lhs, rhs),
        OperatorKind::ContainsOneOf
        | OperatorKind::DoesNotContainOneOf
        | OperatorKind::ContainsAnyOf
        | OperatorKind::DoesNotContainAnyOf => eval_substring_family(operator, lhs, rhs),
        OperatorKind::IncludesAnyOf
        | OperatorKind::IncludesAllOf
        | OperatorKind::DoesNotInclude
        | OperatorKind::DoesNotIncludeAnyOf
        | OperatorKind::DoesNotIncludeAllOf => eval_inclusion_family(operator, lhs, rhs),
        OperatorKind::IsNot | OperatorKind::NotEquals | OperatorKind::DoesNotContain => {
            // Handled by the decorator branch above.
            Err(mismatch(operator))
        }
    }
}

// ============================================================================
// SECTION: Boolean Connectives
// ============================================================================

/// Evaluates AND/OR over two Boolean operands.
fn eval_connective(
    operator: OperatorKind,
    lhs: Option<&Value>,
    rhs: Option<&Value>,
) -> Result<bool, OperatorError> {
    let (Some(left), Some(right)) = (lhs, rhs) else {
        return Err(mismatch(operator));
    };
    let (Some(left), Some(right)) = (left.as_boolean(), right.as_boolean()) else {
        return Err(mismatch(operator));
    };
    Ok(match operator {
        OperatorKind::And => left && right,
        _ => left || right,
    })
}

/// Evaluates NOT over one Boolean operand.
fn eval_negation(lhs: Option<&Value>, rhs: Option<&Value>) -> Result<bool, OperatorError> {
    if rhs.is_some() {
        return Err(mismatch(OperatorKind::Not));
    }
    lhs.and_then(Value::as_boolean).map(|value| !value).ok_or(mismatch(OperatorKind::Not))
}

// ============================================================================
// SECTION: Equality
// ============================================================================

/// Evaluates IS: plain structural value equality.
fn eval_is(
    operator: OperatorKind,
    lhs: Option<&Value>,
    rhs: Option<&Value>,
) -> Result<bool, OperatorError> {
    let (Some(left), Some(right)) = (lhs, rhs) else {
        return Err(mismatch(operator));
    };
    Ok(left == right)
}

/// Evaluates EQUALS: multiset semantics for list pairs, plain equality
/// otherwise.
fn eval_equals(
    operator: OperatorKind,
    lhs: Option<&Value>,
    rhs: Option<&Value>,
) -> Result<bool, OperatorError> {
    let (Some(left), Some(right)) = (lhs, rhs) else {
        return Err(mismatch(operator));
    };
    match (left, right) {
        (Value::List(left_items), Value::List(right_items)) => {
            Ok(multiset_equal(left_items, right_items))
        }
        _ => Ok(left == right),
    }
}

/// Compares two lists as multisets: same elements with the same
/// multiplicities, order-independent.
fn multiset_equal(left: &[Value], right: &[Value]) -> bool {
    if left.len() != right.len() {
        return false;
    }
    let mut remaining: Vec<&Value> = right.iter().collect();
    for item in left {
        let Some(position) = remaining.iter().position(|candidate| *candidate == item) else {
            return false;
        };
        remaining.swap_remove(position);
    }
    true
}

// ============================================================================
// SECTION: Ordering
// ============================================================================

/// Evaluates numeric ordering operators.
fn eval_ordering(
    operator: OperatorKind,
    lhs: Option<&Value>,
    rhs: Option<&Value>,
) -> Result<bool, OperatorError> {
    let (Some(left), Some(right)) = (lhs, rhs) else {
        return Err(mismatch(operator));
    };
    let (Some(left), Some(right)) = (left.as_number(), right.as_number()) else {
        return Err(mismatch(operator));
    };
    let Some(ordering) = left.partial_cmp(&right) else {
        return Err(mismatch(operator));
    };
    Ok(match operator {
        OperatorKind::Ge => ordering.is_ge(),
        OperatorKind::Le => ordering.is_le(),
        OperatorKind::Gt => ordering.is_gt(),
        _ => ordering.is_lt(),
    })
}

// ============================================================================
// SECTION: Text Predicates
// ============================================================================

/// Evaluates STARTS_WITH/ENDS_WITH over two Text operands.
fn eval_affix(
    operator: OperatorKind,
    lhs: Option<&Value>,
    rhs: Option<&Value>,
    options: &BTreeMap<String, String>,
) -> Result<bool, OperatorError> {
    let (Some(left), Some(right)) = (lhs, rhs) else {
        return Err(mismatch(operator));
    };
    let (Some(subject), Some(affix)) = (left.as_text(), right.as_text()) else {
        return Err(mismatch(operator));
    };
    let (subject, affix) = if ignore_case_enabled(options) {
        (subject.to_lowercase(), affix.to_lowercase())
    } else {
        (subject.to_string(), affix.to_string())
    };
    Ok(match operator {
        OperatorKind::StartsWith => subject.starts_with(&affix),
        _ => subject.ends_with(&affix),
    })
}

/// Evaluates CONTAINS: Text/Text substring or List membership of a
/// non-List value. A List/List pair is a type mismatch.
fn eval_contains(
    operator: OperatorKind,
    lhs: Option<&Value>,
    rhs: Option<&Value>,
) -> Result<bool, OperatorError> {
    let (Some(left), Some(right)) = (lhs, rhs) else {
        // Unreachable for CONTAINS itself (null-safe), kept for the
        // exhaustive contract of this helper.
        return Err(mismatch(operator));
    };
    match (left, right) {
        (Value::Text(haystack), Value::Text(needle)) => Ok(haystack.contains(needle.as_str())),
        (Value::List(_), Value::List(_)) => Err(mismatch(operator)),
        (Value::List(items), needle) => Ok(list_contains(items, needle)),
        _ => Err(mismatch(operator)),
    }
}

/// Evaluates the substring counting family over a Text haystack and a List
/// of Text needles.
fn eval_substring_family(
    operator: OperatorKind,
    lhs: Option<&Value>,
    rhs: Option<&Value>,
) -> Result<bool, OperatorError> {
    let (Some(left), Some(right)) = (lhs, rhs) else {
        return Err(mismatch(operator));
    };
    let Some(haystack) = left.as_text() else {
        return Err(mismatch(operator));
    };
    let Some(items) = right.as_list() else {
        return Err(mismatch(operator));
    };
    let needles = text_items(items).ok_or(mismatch(operator))?;

    let matches = needles.iter().filter(|needle| haystack.contains(**needle)).count();
    let total = needles.len();
    let non_matches = total - matches;

    Ok(match operator {
        OperatorKind::ContainsAnyOf => matches > 0,
        OperatorKind::DoesNotContainAnyOf => matches == 0,
        // The *_ONE_OF pair compares its count to exactly len - 1 ("all but
        // one"); preserved as authored even though the name reads as
        // "exactly one".
        OperatorKind::ContainsOneOf => matches + 1 == total,
        _ => non_matches + 1 == total,
    })
}

/// Borrows the text payload of every list element, or `None` when any
/// element is not Text.
fn text_items(items: &[Value]) -> Option<Vec<&str>> {
    items.iter().map(Value::as_text).collect()
}

// ============================================================================
// SECTION: List Inclusion
// ============================================================================

/// Evaluates the list inclusion family.
fn eval_inclusion_family(
    operator: OperatorKind,
    lhs: Option<&Value>,
    rhs: Option<&Value>,
) -> Result<bool, OperatorError> {
    let (Some(left), Some(right)) = (lhs, rhs) else {
        return Err(mismatch(operator));
    };
    let Some(items) = left.as_list() else {
        return Err(mismatch(operator));
    };

    if operator == OperatorKind::DoesNotInclude {
        if matches!(right, Value::List(_)) {
            return Err(mismatch(operator));
        }
        return Ok(!list_contains(items, right));
    }

    let Some(wanted) = right.as_list() else {
        return Err(mismatch(operator));
    };
    let wanted = distinct(wanted);
    let included = wanted.iter().filter(|item| list_contains(items, **item)).count();

    Ok(match operator {
        OperatorKind::IncludesAnyOf => included > 0,
        OperatorKind::DoesNotIncludeAnyOf => included == 0,
        OperatorKind::IncludesAllOf => included == wanted.len(),
        _ => included < wanted.len(),
    })
}

/// Returns true when the list contains a value equal to the needle.
fn list_contains(items: &[Value], needle: &Value) -> bool {
    items.iter().any(|item| item == needle)
}

/// Returns the distinct elements of a list, preserving first-seen order.
fn distinct(items: &[Value]) -> Vec<&Value> {
    let mut out: Vec<&Value> = Vec::with_capacity(items.len());
    for item in items {
        if !out.iter().any(|seen| *seen == item) {
            out.push(item);
        }
    }
    out
}
