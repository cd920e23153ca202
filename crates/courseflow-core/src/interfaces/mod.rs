// courseflow-core/src/interfaces/mod.rs
// ============================================================================
// Module: CourseFlow Interfaces
// Description: Backend-agnostic interfaces for scope, execution, and faults.
// Purpose: Define the contract surfaces used by the scenario engine.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how the engine integrates with its external
//! collaborators without embedding backend-specific details: the runtime
//! scope the learner's response state is read from, the executor that
//! resolved actions are handed to, and the administrator channel that
//! receives evaluation faults. Implementations must be deterministic for a
//! fixed scope snapshot and fail closed on missing data.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::actions::ResolvedAction;
use crate::core::hashing::ContentDigest;
use crate::core::identifiers::LearnerId;
use crate::core::identifiers::RequestId;
use crate::core::identifiers::ScenarioId;

// ============================================================================
// SECTION: Runtime Scope
// ============================================================================

/// Runtime scope errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScopeError {
    /// Scope backend reported an error.
    #[error("runtime scope error: {0}")]
    Provider(String),
}

/// Backend-agnostic runtime scope for reference resolution.
///
/// The scope is a read-only snapshot of the learner's current response
/// state. In the real deployment a fetch may be an out-of-process call; the
/// engine only requires that repeated reads of the same path within one
/// evaluation return the same payload.
pub trait RuntimeScope {
    /// Fetches the payload at a dotted path, or `None` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError`] when the backing store cannot be read.
    fn value_at(&self, path: &str) -> Result<Option<serde_json::Value>, ScopeError>;
}

// ============================================================================
// SECTION: Evaluation Context
// ============================================================================

/// Context identifying one evaluation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationContext {
    /// Learner whose interaction triggered the evaluation.
    pub learner_id: LearnerId,
    /// Request identifier used to correlate verdicts and faults.
    pub request_id: RequestId,
}

// ============================================================================
// SECTION: Action Executor
// ============================================================================

/// Action executor errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutorError {
    /// Executor reported an error.
    #[error("action execution error: {0}")]
    ExecutionFailed(String),
}

/// Executor that receives resolved actions after a matched verdict.
///
/// The engine only selects and resolves actions; carrying them out (state
/// mutation, messaging, broadcast) belongs entirely to this collaborator.
pub trait ActionExecutor {
    /// Executes the resolved actions for a matched scenario, in order.
    ///
    /// # Errors
    ///
    /// Returns [`ExecutorError`] when execution fails.
    fn execute(
        &self,
        scenario_id: &ScenarioId,
        ctx: &EvaluationContext,
        actions: &[ResolvedAction],
    ) -> Result<(), ExecutorError>;
}

// ============================================================================
// SECTION: Fault Channel
// ============================================================================

/// Structured evaluation fault surfaced to the scenario owner channel.
///
/// Faults are administrator-facing diagnostics; they are never shown to the
/// end learner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluationFault {
    /// Scenario whose evaluation failed.
    pub scenario_id: ScenarioId,
    /// Content revision the scenario was compiled from.
    pub spec_hash: ContentDigest,
    /// Learner whose interaction triggered the evaluation.
    pub learner_id: LearnerId,
    /// Request identifier for correlation.
    pub request_id: RequestId,
    /// Phase the failure occurred in.
    pub phase: FaultPhase,
    /// Stable human-readable failure message.
    pub message: String,
}

/// Evaluation phase a fault originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultPhase {
    /// Operand resolution against the runtime scope.
    Resolution,
    /// Operator application over resolved operands.
    Evaluation,
    /// Action resolution for a matched verdict.
    Action,
}

/// Channel that delivers evaluation faults to scenario owners.
pub trait FaultChannel {
    /// Reports a structured evaluation fault.
    fn report(&self, fault: &EvaluationFault);
}
