// courseflow-core/src/runtime/evaluator.rs
// ============================================================================
// Module: CourseFlow Evaluator
// Description: Leaf evaluator binding resolved operands to an operator.
// Purpose: Produce boolean verdicts from already-resolved operands.
// Dependencies: crate::{core, interfaces, runtime::ops}, cet-logic
// ============================================================================

//! ## Overview
//! An evaluator binds one or two resolved operands, an operator, and an
//! options map into a single boolean test. Negation is a post-hoc decorator:
//! the operator runs first and its verdict is inverted afterwards, never by
//! rewriting the operator. Once its operands are resolved an evaluator is
//! stateless and idempotent; re-invoking it cannot touch the runtime scope.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use cet_logic::LeafEval;

use crate::core::operand::Operand;
use crate::core::operand::ResolutionError;
use crate::core::operators::OperatorKind;
use crate::core::scenario::EvaluatorDef;
use crate::interfaces::RuntimeScope;
use crate::runtime::ops::OperatorError;
use crate::runtime::ops::apply_operator;

// ============================================================================
// SECTION: Evaluator
// ============================================================================

/// Leaf evaluator with operands resolved for one evaluation request.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluator {
    /// Stable leaf ordinal from the compiled scenario.
    index: usize,
    /// Operator applied to the operands.
    operator: OperatorKind,
    /// First operand.
    lhs: Operand,
    /// Second operand, present for binary operators.
    rhs: Option<Operand>,
    /// Operator options.
    options: BTreeMap<String, String>,
    /// Inverts the operator verdict after it runs.
    negate: bool,
}

impl Evaluator {
    /// Resolves an evaluator from its compiled definition and a scope
    /// snapshot.
    ///
    /// This is the resolution phase: every operand fetch happens here,
    /// before any evaluation, so operator implementations can assume
    /// resolved, immutable values.
    ///
    /// # Errors
    ///
    /// Returns [`ResolutionError`] when an operand cannot be resolved.
    pub fn resolve(def: &EvaluatorDef, scope: &dyn RuntimeScope) -> Result<Self, ResolutionError> {
        let lhs = Operand::resolve_from(&def.lhs, scope)?;
        let rhs = match &def.rhs {
            Some(resolver) => Some(Operand::resolve_from(resolver, scope)?),
            None => None,
        };
        Ok(Self {
            index: def.index,
            operator: def.operator,
            lhs,
            rhs,
            options: def.options.clone(),
            negate: def.negate,
        })
    }

    /// Returns the stable leaf ordinal.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Returns the operator tag.
    #[must_use]
    pub const fn operator(&self) -> OperatorKind {
        self.operator
    }

    /// Evaluates the bound operator over the resolved operands.
    ///
    /// When `negate` is set the boolean result is inverted after the
    /// operator runs.
    ///
    /// # Errors
    ///
    /// Returns [`OperatorError`] when operand kinds do not satisfy the
    /// operator.
    pub fn evaluate(&self) -> Result<bool, OperatorError> {
        let verdict = apply_operator(
            self.operator,
            self.lhs.value(),
            self.rhs.as_ref().and_then(Operand::value),
            &self.options,
        )?;
        Ok(if self.negate { !verdict } else { verdict })
    }
}

impl LeafEval for Evaluator {
    type Error = OperatorError;

    fn eval_leaf(&self) -> Result<bool, Self::Error> {
        self.evaluate()
    }
}
