// courseflow-core/src/runtime/engine.rs
// ============================================================================
// Module: CourseFlow Scenario Engine
// Description: Two-phase scenario evaluation and action selection.
// Purpose: Produce evaluation verdicts with trace records and fault routing.
// Dependencies: crate::{core, interfaces, runtime}, cet-logic, serde, thiserror
// ============================================================================

//! ## Overview
//! The engine is the single canonical evaluation path. Each evaluation runs
//! two strictly ordered phases over one scope snapshot: first every operand
//! in the condition tree is resolved, then the tree is folded into a
//! verdict; resolution and evaluation never interleave. Actions resolve
//! only on a matched verdict, independently and in order. Evaluations share
//! no mutable state — the compiled scenario is read-only — so independent
//! requests may run fully in parallel. Cancellation and deadlines are the
//! caller's responsibility; the engine defines no internal timeouts.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::convert::Infallible;

use cet_logic::Condition;
use cet_logic::ConditionTrace;
use cet_logic::LeafEval;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::actions::ResolvedAction;
use crate::core::hashing::ContentDigest;
use crate::core::operand::ResolutionError;
use crate::core::operators::OperatorKind;
use crate::core::scenario::EvaluatorDef;
use crate::core::scenario::Scenario;
use crate::interfaces::ActionExecutor;
use crate::interfaces::EvaluationContext;
use crate::interfaces::EvaluationFault;
use crate::interfaces::ExecutorError;
use crate::interfaces::FaultChannel;
use crate::interfaces::FaultPhase;
use crate::interfaces::RuntimeScope;
use crate::runtime::dispatch::ActionError;
use crate::runtime::dispatch::ActionHandlerRegistry;
use crate::runtime::evaluator::Evaluator;
use crate::runtime::ops::OperatorError;

// ============================================================================
// SECTION: Engine Configuration
// ============================================================================

/// Strictness policy for leaf evaluation failures.
///
/// The default propagates failures (fail closed): silent false-negatives
/// are worse than visible authoring errors. Lenient mode treats a failed
/// leaf as false and records the fault in the verdict instead.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strictness {
    /// Propagate leaf failures to the caller.
    #[default]
    Strict,
    /// Treat failed leaves as false and record the fault.
    Lenient,
}

/// Configuration for the scenario engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Strictness policy for leaf evaluation failures.
    pub strictness: Strictness,
}

// ============================================================================
// SECTION: Verdict Records
// ============================================================================

/// Trace record for one evaluated condition leaf.
///
/// Leaves skipped by short-circuiting do not appear in the trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionTraceEntry {
    /// Stable leaf ordinal in specification order.
    pub leaf_index: usize,
    /// Operator evaluated at the leaf.
    pub operator: OperatorKind,
    /// Boolean verdict the leaf produced.
    pub outcome: bool,
}

/// Fault record for a leaf that failed under lenient evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafFault {
    /// Stable leaf ordinal in specification order.
    pub leaf_index: usize,
    /// Operator bound at the leaf.
    pub operator: OperatorKind,
    /// Phase the failure occurred in.
    pub phase: FaultPhase,
    /// Stable failure message.
    pub message: String,
}

/// Evaluation verdict returned to the courseware collaborator.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationVerdict {
    /// True when the scenario's condition tree held.
    pub matched: bool,
    /// Actions resolved for a matched verdict, in specification order.
    pub resolved_actions: Vec<ResolvedAction>,
    /// Trace of evaluated leaves in evaluation order.
    pub trace: Vec<ConditionTraceEntry>,
    /// Leaf faults absorbed under lenient evaluation; empty when strict.
    pub leaf_faults: Vec<LeafFault>,
    /// Content revision the scenario was compiled from.
    pub spec_hash: ContentDigest,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Scenario evaluation errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// Operand resolution failed.
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    /// Operator application failed.
    #[error(transparent)]
    Operator(#[from] OperatorError),
    /// Action resolution failed.
    #[error(transparent)]
    Action(#[from] ActionError),
    /// Action executor reported an error.
    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

impl EngineError {
    /// Returns the evaluation phase this error originated from.
    #[must_use]
    pub const fn phase(&self) -> FaultPhase {
        match self {
            Self::Resolution(_) => FaultPhase::Resolution,
            Self::Operator(_) => FaultPhase::Evaluation,
            Self::Action(_) | Self::Executor(_) => FaultPhase::Action,
        }
    }

    /// Builds the structured fault for the scenario owner channel.
    #[must_use]
    pub fn to_fault(&self, scenario: &Scenario, ctx: &EvaluationContext) -> EvaluationFault {
        EvaluationFault {
            scenario_id: scenario.scenario_id.clone(),
            spec_hash: scenario.spec_hash.clone(),
            learner_id: ctx.learner_id.clone(),
            request_id: ctx.request_id.clone(),
            phase: self.phase(),
            message: self.to_string(),
        }
    }
}

// ============================================================================
// SECTION: Scenario Engine
// ============================================================================

/// Scenario engine evaluating compiled scenarios against scope snapshots.
pub struct ScenarioEngine {
    /// Engine configuration.
    config: EngineConfig,
    /// Action handler registry used for dispatch.
    registry: ActionHandlerRegistry,
}

impl ScenarioEngine {
    /// Creates a new engine with the provided configuration and registry.
    #[must_use]
    pub const fn new(config: EngineConfig, registry: ActionHandlerRegistry) -> Self {
        Self {
            config,
            registry,
        }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> EngineConfig {
        self.config
    }

    /// Evaluates a scenario against a runtime scope snapshot.
    ///
    /// Phase one resolves every operand referenced by the condition tree;
    /// phase two folds the tree into a verdict. Actions resolve only when
    /// the verdict matched. Action failures always propagate, regardless of
    /// strictness: a matched scenario with a broken action is an authoring
    /// error, not a non-match.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when resolution, evaluation, or action
    /// resolution fails under the strict policy.
    pub fn evaluate(
        &self,
        scenario: &Scenario,
        scope: &dyn RuntimeScope,
    ) -> Result<EvaluationVerdict, EngineError> {
        let mut recorder = TraceRecorder::default();
        let mut leaf_faults = Vec::new();

        let matched = match self.config.strictness {
            Strictness::Strict => {
                let resolved: Condition<Evaluator> =
                    scenario.condition.try_map(&mut |def| Evaluator::resolve(def, scope))?;
                resolved.eval_with_trace(&mut recorder)?
            }
            Strictness::Lenient => {
                let outcomes = resolve_lenient(&scenario.condition, scope, &mut leaf_faults);
                let folded: Result<bool, OperatorError> =
                    outcomes.eval_with_trace(&mut recorder);
                folded?
            }
        };

        let resolved_actions = if matched {
            self.registry.resolve_actions(&scenario.actions, scope)?
        } else {
            Vec::new()
        };

        Ok(EvaluationVerdict {
            matched,
            resolved_actions,
            trace: recorder.entries,
            leaf_faults,
            spec_hash: scenario.spec_hash.clone(),
        })
    }

    /// Evaluates a scenario and hands resolved actions to the executor.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] when evaluation or execution fails.
    pub fn run(
        &self,
        scenario: &Scenario,
        scope: &dyn RuntimeScope,
        ctx: &EvaluationContext,
        executor: &dyn ActionExecutor,
    ) -> Result<EvaluationVerdict, EngineError> {
        let verdict = self.evaluate(scenario, scope)?;
        if verdict.matched {
            executor.execute(&scenario.scenario_id, ctx, &verdict.resolved_actions)?;
        }
        Ok(verdict)
    }

    /// Evaluates a scenario, routing failures to the fault channel.
    ///
    /// Faults go to the scenario owner channel, never to the end learner.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`EngineError`] after reporting it.
    pub fn evaluate_reporting(
        &self,
        scenario: &Scenario,
        scope: &dyn RuntimeScope,
        ctx: &EvaluationContext,
        channel: &dyn FaultChannel,
    ) -> Result<EvaluationVerdict, EngineError> {
        match self.evaluate(scenario, scope) {
            Ok(verdict) => Ok(verdict),
            Err(err) => {
                channel.report(&err.to_fault(scenario, ctx));
                Err(err)
            }
        }
    }
}

impl Default for ScenarioEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default(), ActionHandlerRegistry::default())
    }
}

// ============================================================================
// SECTION: Lenient Resolution
// ============================================================================

/// Leaf verdict computed eagerly under the lenient policy.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LeafOutcome {
    /// Stable leaf ordinal.
    leaf_index: usize,
    /// Operator bound at the leaf.
    operator: OperatorKind,
    /// Boolean verdict; false when the leaf faulted.
    verdict: bool,
}

impl LeafEval for LeafOutcome {
    type Error = OperatorError;

    fn eval_leaf(&self) -> Result<bool, Self::Error> {
        Ok(self.verdict)
    }
}

/// Resolves and evaluates leaves under the lenient policy.
///
/// Phase one resolves every leaf, recording resolution faults; phase two
/// evaluates the resolved leaves, recording operator faults. A faulted leaf
/// evaluates to false instead of aborting its subtree.
fn resolve_lenient(
    condition: &Condition<EvaluatorDef>,
    scope: &dyn RuntimeScope,
    faults: &mut Vec<LeafFault>,
) -> Condition<LeafOutcome> {
    // Phase 1: resolve all operands before any evaluator runs.
    let resolved: Result<Condition<LenientLeaf>, Infallible> = condition.try_map(&mut |def| {
        Ok(match Evaluator::resolve(def, scope) {
            Ok(evaluator) => LenientLeaf::Ready(evaluator),
            Err(err) => {
                faults.push(LeafFault {
                    leaf_index: def.index,
                    operator: def.operator,
                    phase: FaultPhase::Resolution,
                    message: err.to_string(),
                });
                LenientLeaf::Faulted {
                    leaf_index: def.index,
                    operator: def.operator,
                }
            }
        })
    });
    let resolved = match resolved {
        Ok(tree) => tree,
        Err(never) => match never {},
    };

    // Phase 2: evaluate resolved leaves.
    let outcomes: Result<Condition<LeafOutcome>, Infallible> = resolved.try_map(&mut |leaf| {
        Ok(match leaf {
            LenientLeaf::Ready(evaluator) => match evaluator.evaluate() {
                Ok(verdict) => LeafOutcome {
                    leaf_index: evaluator.index(),
                    operator: evaluator.operator(),
                    verdict,
                },
                Err(err) => {
                    faults.push(LeafFault {
                        leaf_index: evaluator.index(),
                        operator: evaluator.operator(),
                        phase: FaultPhase::Evaluation,
                        message: err.to_string(),
                    });
                    LeafOutcome {
                        leaf_index: evaluator.index(),
                        operator: evaluator.operator(),
                        verdict: false,
                    }
                }
            },
            LenientLeaf::Faulted {
                leaf_index,
                operator,
            } => LeafOutcome {
                leaf_index: *leaf_index,
                operator: *operator,
                verdict: false,
            },
        })
    });
    match outcomes {
        Ok(tree) => tree,
        Err(never) => match never {},
    }
}

/// Resolution outcome for one leaf under the lenient policy.
#[derive(Debug, Clone, PartialEq)]
enum LenientLeaf {
    /// Leaf resolved and is ready to evaluate.
    Ready(Evaluator),
    /// Leaf failed to resolve; evaluates to false.
    Faulted {
        /// Stable leaf ordinal.
        leaf_index: usize,
        /// Operator bound at the leaf.
        operator: OperatorKind,
    },
}

// ============================================================================
// SECTION: Trace Recorder
// ============================================================================

/// Trace collector assembling condition trace entries.
#[derive(Default)]
struct TraceRecorder {
    /// Trace entries captured during evaluation.
    entries: Vec<ConditionTraceEntry>,
}

impl ConditionTrace<Evaluator> for TraceRecorder {
    fn on_leaf_evaluated(&mut self, leaf: &Evaluator, outcome: bool) {
        self.entries.push(ConditionTraceEntry {
            leaf_index: leaf.index(),
            operator: leaf.operator(),
            outcome,
        });
    }
}

impl ConditionTrace<LeafOutcome> for TraceRecorder {
    fn on_leaf_evaluated(&mut self, leaf: &LeafOutcome, outcome: bool) {
        self.entries.push(ConditionTraceEntry {
            leaf_index: leaf.leaf_index,
            operator: leaf.operator,
            outcome,
        });
    }
}
