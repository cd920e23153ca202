// courseflow-core/src/core/scenario.rs
// ============================================================================
// Module: CourseFlow Scenario Specification
// Description: Wire scenario model, validation, and compilation.
// Purpose: Turn authored scenario structures into read-only compiled scenarios.
// Dependencies: crate::core::{actions, hashing, identifiers, operand, operators}, cet-logic, serde
// ============================================================================

//! ## Overview
//! Scenario definitions arrive as structured data keyed by the authoring
//! collaborator's fixed vocabulary (`type`, `conditions`, `operator`,
//! `operandType`, `lhs`, `rhs`, `options`, `value`, `resolver`). This module
//! consumes that structure, enforces the structural invariants the engine
//! depends on (operator arity, tree depth, action count), and compiles it
//! into a read-only [`Scenario`] that is safely shared across concurrent
//! evaluations. Deeper semantic validation of authored content is the
//! authoring collaborator's responsibility.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use cet_logic::Condition;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::actions::Action;
use crate::core::actions::ActionSpec;
use crate::core::hashing::ContentDigest;
use crate::core::hashing::DigestError;
use crate::core::identifiers::ScenarioId;
use crate::core::operand::OperandError;
use crate::core::operand::OperandSpec;
use crate::core::operand::ResolverSpec;
use crate::core::operators::OperatorKind;

// ============================================================================
// SECTION: Wire Condition Model
// ============================================================================

/// Wire condition node using the authoring vocabulary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ConditionSpec {
    /// All child conditions must hold.
    #[serde(rename = "AND")]
    And {
        /// Child condition nodes; empty is vacuously true.
        #[serde(default)]
        conditions: Vec<ConditionSpec>,
    },
    /// At least one child condition must hold.
    #[serde(rename = "OR")]
    Or {
        /// Child condition nodes; empty is vacuously false.
        #[serde(default)]
        conditions: Vec<ConditionSpec>,
    },
    /// Leaf evaluator binding operands to an operator.
    #[serde(rename = "EVALUATOR")]
    Evaluator(EvaluatorSpec),
}

/// Wire evaluator leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorSpec {
    /// Operator tag applied to the operands.
    pub operator: OperatorKind,
    /// First operand specification.
    pub lhs: OperandSpec,
    /// Second operand specification; required for binary operators.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rhs: Option<OperandSpec>,
    /// Operator options such as `IGNORE_CASE`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
    /// Inverts the operator verdict after it runs.
    #[serde(default)]
    pub negate: bool,
}

// ============================================================================
// SECTION: Wire Scenario Model
// ============================================================================

/// Wire scenario specification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    /// Scenario identifier.
    pub scenario_id: ScenarioId,
    /// Root condition node.
    pub condition: ConditionSpec,
    /// Ordered action specifications selected on a match.
    #[serde(default)]
    pub actions: Vec<ActionSpec>,
}

impl ScenarioSpec {
    /// Computes the canonical content digest of this specification.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError`] when canonical serialization fails.
    pub fn canonical_hash(&self) -> Result<ContentDigest, DigestError> {
        ContentDigest::of_canonical_json(self)
    }

    /// Validates structural invariants with the default limits.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] when validation fails.
    pub fn validate(&self) -> Result<(), SpecError> {
        self.validate_with(&SpecLimits::default())
    }

    /// Validates structural invariants against explicit limits.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] when validation fails.
    pub fn validate_with(&self, limits: &SpecLimits) -> Result<(), SpecError> {
        ensure_depth(&self.condition, limits)?;
        ensure_action_count(&self.actions, limits)?;
        ensure_evaluators_well_formed(&self.condition)?;
        ensure_actions_well_formed(&self.actions)?;
        Ok(())
    }

    /// Compiles the specification into a read-only scenario.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] when validation or compilation fails.
    pub fn compile(&self) -> Result<Scenario, SpecError> {
        self.compile_with(&SpecLimits::default())
    }

    /// Compiles the specification against explicit limits.
    ///
    /// # Errors
    ///
    /// Returns [`SpecError`] when validation or compilation fails.
    pub fn compile_with(&self, limits: &SpecLimits) -> Result<Scenario, SpecError> {
        self.validate_with(limits)?;

        let spec_hash = self.canonical_hash()?;
        let mut next_index = 0_usize;
        let condition = compile_condition(&self.condition, &mut next_index)?;
        let actions = self.actions.iter().map(compile_action).collect::<Result<Vec<_>, _>>()?;

        Ok(Scenario {
            scenario_id: self.scenario_id.clone(),
            spec_hash,
            condition,
            actions,
        })
    }
}

// ============================================================================
// SECTION: Specification Limits
// ============================================================================

/// Structural limits applied while compiling scenario specifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecLimits {
    /// Maximum condition tree depth.
    pub max_condition_depth: usize,
    /// Maximum number of actions per scenario.
    pub max_actions: usize,
}

impl Default for SpecLimits {
    fn default() -> Self {
        Self {
            max_condition_depth: 32,
            max_actions: 64,
        }
    }
}

// ============================================================================
// SECTION: Compiled Scenario
// ============================================================================

/// Compiled evaluator definition bound into the condition tree.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatorDef {
    /// Stable ordinal of this leaf in specification order.
    pub index: usize,
    /// Operator tag applied to the operands.
    pub operator: OperatorKind,
    /// Resolver for the first operand.
    pub lhs: ResolverSpec,
    /// Resolver for the second operand, present for binary operators.
    pub rhs: Option<ResolverSpec>,
    /// Operator options.
    pub options: BTreeMap<String, String>,
    /// Inverts the operator verdict after it runs.
    pub negate: bool,
}

/// Read-only compiled scenario shared across concurrent evaluations.
///
/// Scenarios are created when courseware content is compiled and replaced
/// wholesale on content republish; the engine never mutates them.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Scenario identifier.
    pub scenario_id: ScenarioId,
    /// Canonical digest of the source specification.
    pub spec_hash: ContentDigest,
    /// Compiled condition tree.
    pub condition: Condition<EvaluatorDef>,
    /// Compiled actions in specification order.
    pub actions: Vec<Action>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Scenario specification validation and compilation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SpecError {
    /// Operand count does not match the operator's declared arity.
    #[error("operator {operator} expects {expected} operand(s), found {found}")]
    ArityMismatch {
        /// Operator whose arity was violated.
        operator: OperatorKind,
        /// Declared operand count.
        expected: usize,
        /// Operand count found in the specification.
        found: usize,
    },
    /// Operand specification is malformed.
    #[error("invalid operand for operator {operator}: {source}")]
    InvalidOperand {
        /// Operator owning the malformed operand.
        operator: OperatorKind,
        /// Underlying operand error.
        source: OperandError,
    },
    /// Condition tree exceeds the configured depth limit.
    #[error("condition tree depth {depth} exceeds limit {max}")]
    DepthExceeded {
        /// Measured tree depth.
        depth: usize,
        /// Configured depth limit.
        max: usize,
    },
    /// Scenario carries more actions than the configured limit.
    #[error("scenario defines {count} actions, limit is {max}")]
    TooManyActions {
        /// Number of actions defined.
        count: usize,
        /// Configured action limit.
        max: usize,
    },
    /// Recognized action type is missing its resolver.
    #[error("action type {action_type} requires a resolver")]
    MissingActionResolver {
        /// Wire name of the action type.
        action_type: String,
    },
    /// Canonical hashing of the specification failed.
    #[error(transparent)]
    Digest(#[from] DigestError),
}

// ============================================================================
// SECTION: Validation Helpers
// ============================================================================

/// Ensures the condition tree stays within the depth limit.
fn ensure_depth(condition: &ConditionSpec, limits: &SpecLimits) -> Result<(), SpecError> {
    let depth = spec_depth(condition);
    if depth > limits.max_condition_depth {
        return Err(SpecError::DepthExceeded {
            depth,
            max: limits.max_condition_depth,
        });
    }
    Ok(())
}

/// Ensures the action list stays within the action limit.
fn ensure_action_count(actions: &[ActionSpec], limits: &SpecLimits) -> Result<(), SpecError> {
    if actions.len() > limits.max_actions {
        return Err(SpecError::TooManyActions {
            count: actions.len(),
            max: limits.max_actions,
        });
    }
    Ok(())
}

/// Ensures every evaluator leaf matches its operator's arity and carries
/// well-formed operands.
fn ensure_evaluators_well_formed(condition: &ConditionSpec) -> Result<(), SpecError> {
    match condition {
        ConditionSpec::And {
            conditions,
        }
        | ConditionSpec::Or {
            conditions,
        } => {
            for child in conditions {
                ensure_evaluators_well_formed(child)?;
            }
            Ok(())
        }
        ConditionSpec::Evaluator(leaf) => {
            let expected = leaf.operator.arity().operand_count();
            let found = 1 + usize::from(leaf.rhs.is_some());
            if expected != found {
                return Err(SpecError::ArityMismatch {
                    operator: leaf.operator,
                    expected,
                    found,
                });
            }
            convert_operand(leaf.operator, &leaf.lhs)?;
            if let Some(rhs) = &leaf.rhs {
                convert_operand(leaf.operator, rhs)?;
            }
            Ok(())
        }
    }
}

/// Ensures recognized action types carry a resolver.
fn ensure_actions_well_formed(actions: &[ActionSpec]) -> Result<(), SpecError> {
    for action in actions {
        if !action.action_type.is_unsupported() && action.resolver.is_none() {
            return Err(SpecError::MissingActionResolver {
                action_type: action.action_type.wire_name().to_string(),
            });
        }
    }
    Ok(())
}

/// Returns the depth of a wire condition tree.
fn spec_depth(condition: &ConditionSpec) -> usize {
    match condition {
        ConditionSpec::Evaluator(_) => 1,
        ConditionSpec::And {
            conditions,
        }
        | ConditionSpec::Or {
            conditions,
        } => 1 + conditions.iter().map(spec_depth).max().unwrap_or(0),
    }
}

// ============================================================================
// SECTION: Compilation Helpers
// ============================================================================

/// Compiles a wire condition node into the evaluator tree.
fn compile_condition(
    condition: &ConditionSpec,
    next_index: &mut usize,
) -> Result<Condition<EvaluatorDef>, SpecError> {
    match condition {
        ConditionSpec::And {
            conditions,
        } => {
            let mut children = Vec::with_capacity(conditions.len());
            for child in conditions {
                children.push(compile_condition(child, next_index)?);
            }
            Ok(Condition::and(children))
        }
        ConditionSpec::Or {
            conditions,
        } => {
            let mut children = Vec::with_capacity(conditions.len());
            for child in conditions {
                children.push(compile_condition(child, next_index)?);
            }
            Ok(Condition::or(children))
        }
        ConditionSpec::Evaluator(leaf) => {
            let index = *next_index;
            *next_index += 1;
            let lhs = convert_operand(leaf.operator, &leaf.lhs)?;
            let rhs = match &leaf.rhs {
                Some(rhs) => Some(convert_operand(leaf.operator, rhs)?),
                None => None,
            };
            Ok(Condition::leaf(EvaluatorDef {
                index,
                operator: leaf.operator,
                lhs,
                rhs,
                options: leaf.options.clone(),
                negate: leaf.negate,
            }))
        }
    }
}

/// Converts a wire operand into its resolver context.
fn convert_operand(
    operator: OperatorKind,
    operand: &OperandSpec,
) -> Result<ResolverSpec, SpecError> {
    operand.to_resolver().map_err(|source| SpecError::InvalidOperand {
        operator,
        source,
    })
}

/// Compiles a wire action into its runtime form.
fn compile_action(spec: &ActionSpec) -> Result<Action, SpecError> {
    let resolver = match &spec.resolver {
        Some(resolver) => resolver.clone(),
        // Unrecognized actions without a resolver still participate in the
        // resolution protocol through a LITERAL no-op resolver.
        None if spec.action_type.is_unsupported() => ResolverSpec::Literal {
            value: serde_json::Value::Null,
        },
        None => {
            return Err(SpecError::MissingActionResolver {
                action_type: spec.action_type.wire_name().to_string(),
            });
        }
    };

    Ok(Action {
        action_type: spec.action_type.clone(),
        context: spec.context.clone(),
        resolver,
    })
}
