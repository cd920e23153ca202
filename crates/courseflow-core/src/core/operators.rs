// courseflow-core/src/core/operators.rs
// ============================================================================
// Module: CourseFlow Operator Vocabulary
// Description: Closed operator tag set with arity and policy tables.
// Purpose: Name the operator algebra and its per-operator evaluation policy.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Operators are stateless, pure predicates identified by a closed tag set.
//! The tag carries three static facts the runtime consults before applying
//! any logic: the declared arity, membership in the null-safe family (absent
//! operands evaluate to false instead of raising), and the negation base for
//! the deprecated alias operators, which are evaluated as pure decorators
//! over their positive counterpart so the pair can never drift apart.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Operator Tags
// ============================================================================

/// Operator tag identifying one predicate in the algebra.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperatorKind {
    /// Boolean conjunction of two Boolean operands.
    And,
    /// Boolean disjunction of two Boolean operands.
    Or,
    /// Boolean negation of one Boolean operand.
    Not,
    /// Substring or list-membership containment.
    Contains,
    /// Negation decorator over [`Self::Contains`].
    DoesNotContain,
    /// Substring match count equals the list length minus one.
    ContainsOneOf,
    /// Substring non-match count equals the list length minus one.
    DoesNotContainOneOf,
    /// At least one list element is a substring of the text operand.
    ContainsAnyOf,
    /// No list element is a substring of the text operand.
    DoesNotContainAnyOf,
    /// Text prefix match, optionally case-insensitive.
    StartsWith,
    /// Text suffix match, optionally case-insensitive.
    EndsWith,
    /// Numeric greater-than-or-equal comparison.
    Ge,
    /// Numeric less-than-or-equal comparison.
    Le,
    /// Numeric greater-than comparison.
    Gt,
    /// Numeric less-than comparison.
    Lt,
    /// Plain value equality.
    Is,
    /// Negation decorator over [`Self::Is`].
    IsNot,
    /// Value equality with multiset semantics for list pairs.
    Equals,
    /// Negation decorator over [`Self::Equals`].
    NotEquals,
    /// Distinct list intersection is non-empty.
    IncludesAnyOf,
    /// Left list is a superset of the right list (multiplicity ignored).
    IncludesAllOf,
    /// Left list does not contain the right value.
    DoesNotInclude,
    /// Distinct list intersection is empty.
    DoesNotIncludeAnyOf,
    /// Left list is not a superset of the right list.
    DoesNotIncludeAllOf,
}

// ============================================================================
// SECTION: Arity
// ============================================================================

/// Declared operand count for an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// One operand.
    Unary,
    /// Two operands.
    Binary,
}

impl Arity {
    /// Returns the operand count for this arity.
    #[must_use]
    pub const fn operand_count(self) -> usize {
        match self {
            Self::Unary => 1,
            Self::Binary => 2,
        }
    }
}

// ============================================================================
// SECTION: Operator Tables
// ============================================================================

impl OperatorKind {
    /// Returns the declared arity for this operator.
    #[must_use]
    pub const fn arity(self) -> Arity {
        match self {
            Self::Not => Arity::Unary,
            _ => Arity::Binary,
        }
    }

    /// Returns the positive base operator when this tag is a deprecated
    /// negation alias.
    #[must_use]
    pub const fn negation_base(self) -> Option<Self> {
        match self {
            Self::IsNot => Some(Self::Is),
            Self::NotEquals => Some(Self::Equals),
            Self::DoesNotContain => Some(Self::Contains),
            _ => None,
        }
    }

    /// Returns true when this operator belongs to the null-safe family.
    ///
    /// Null-safe operators evaluate to false when either operand resolved to
    /// an absent value; all other operators treat an absent operand as a
    /// type mismatch. The asymmetry is preserved per operator because
    /// unifying it would silently change verdicts for authored content.
    #[must_use]
    pub const fn is_null_safe(self) -> bool {
        matches!(
            self,
            Self::Contains
                | Self::ContainsOneOf
                | Self::DoesNotContainOneOf
                | Self::ContainsAnyOf
                | Self::DoesNotContainAnyOf
                | Self::IncludesAnyOf
                | Self::IncludesAllOf
                | Self::DoesNotInclude
                | Self::DoesNotIncludeAnyOf
                | Self::DoesNotIncludeAllOf
        )
    }

    /// Returns the wire name for this operator.
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Contains => "CONTAINS",
            Self::DoesNotContain => "DOES_NOT_CONTAIN",
            Self::ContainsOneOf => "CONTAINS_ONE_OF",
            Self::DoesNotContainOneOf => "DOES_NOT_CONTAIN_ONE_OF",
            Self::ContainsAnyOf => "CONTAINS_ANY_OF",
            Self::DoesNotContainAnyOf => "DOES_NOT_CONTAIN_ANY_OF",
            Self::StartsWith => "STARTS_WITH",
            Self::EndsWith => "ENDS_WITH",
            Self::Ge => "GE",
            Self::Le => "LE",
            Self::Gt => "GT",
            Self::Lt => "LT",
            Self::Is => "IS",
            Self::IsNot => "IS_NOT",
            Self::Equals => "EQUALS",
            Self::NotEquals => "NOT_EQUALS",
            Self::IncludesAnyOf => "INCLUDES_ANY_OF",
            Self::IncludesAllOf => "INCLUDES_ALL_OF",
            Self::DoesNotInclude => "DOES_NOT_INCLUDE",
            Self::DoesNotIncludeAnyOf => "DOES_NOT_INCLUDE_ANY_OF",
            Self::DoesNotIncludeAllOf => "DOES_NOT_INCLUDE_ALL_OF",
        }
    }

    /// Returns all operator tags in declaration order.
    #[must_use]
    pub const fn all() -> [Self; 24] {
        [
            Self::And,
            Self::Or,
            Self::Not,
            Self::Contains,
            Self::DoesNotContain,
            Self::ContainsOneOf,
            Self::DoesNotContainOneOf,
            Self::ContainsAnyOf,
            Self::DoesNotContainAnyOf,
            Self::StartsWith,
            Self::EndsWith,
            Self::Ge,
            Self::Le,
            Self::Gt,
            Self::Lt,
            Self::Is,
            Self::IsNot,
            Self::Equals,
            Self::NotEquals,
            Self::IncludesAnyOf,
            Self::IncludesAllOf,
            Self::DoesNotInclude,
            Self::DoesNotIncludeAnyOf,
            Self::DoesNotIncludeAllOf,
        ]
    }
}

impl fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}
