// cet-logic/src/condition.rs
// ============================================================================
// Module: Condition Core Types
// Description: AND/OR combinator tree over typed leaf predicates.
// Purpose: Define `Condition` with short-circuit evaluation and tree walkers.
// Dependencies: serde::{Deserialize, Serialize}, smallvec::SmallVec
// ============================================================================

//! ## Overview
//! This module defines the recursive condition structure and its evaluation
//! laws. `And` is true iff all children are true and short-circuits at the
//! first false; `Or` is true iff any child is true and short-circuits at the
//! first true. The empty combinators evaluate to their identity elements:
//! empty `And` is vacuously true, empty `Or` is vacuously false. Trees are
//! constructed top-down and never mutated afterwards.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use smallvec::SmallVec;

use crate::traits::ConditionTrace;
use crate::traits::LeafEval;
use crate::traits::NoopTrace;

// ============================================================================
// SECTION: Condition Definition
// ============================================================================

/// Universal condition tree with domain-specific leaves
///
/// The logical combinators (And, Or) are universal and domain-agnostic,
/// while the Leaf variant is the boundary where domain-specific semantics
/// are injected. There is no Not combinator: negation belongs to the leaf
/// domain (a decorator over the leaf's own verdict), which keeps the tree a
/// pure monotone fold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition<P> {
    /// Logical AND: all child conditions must hold
    ///
    /// Evaluation short-circuits on the first false child. An empty And is
    /// vacuously true (mathematical identity).
    And(SmallVec<[Box<Self>; 4]>),

    /// Logical OR: at least one child condition must hold
    ///
    /// Evaluation short-circuits on the first true child. An empty Or is
    /// vacuously false (no options available).
    Or(SmallVec<[Box<Self>; 4]>),

    /// Domain-specific leaf predicate
    Leaf(P),
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

impl<P> Condition<P> {
    /// Evaluates this condition with short-circuiting
    ///
    /// Leaf evaluation is delegated to the domain through [`LeafEval`]; the
    /// first leaf error aborts the fold and is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns the first leaf error encountered during the fold.
    pub fn eval(&self) -> Result<bool, P::Error>
    where
        P: LeafEval,
    {
        let mut trace = NoopTrace;
        self.eval_with_trace(&mut trace)
    }

    /// Evaluates this condition with short-circuiting and a trace hook
    ///
    /// The trace observes every leaf that produced a verdict, in evaluation
    /// order. Leaves skipped by short-circuiting are not reported.
    ///
    /// # Errors
    ///
    /// Returns the first leaf error encountered during the fold.
    pub fn eval_with_trace<T>(&self, trace: &mut T) -> Result<bool, P::Error>
    where
        P: LeafEval,
        T: ConditionTrace<P>,
    {
        match self {
            Self::Leaf(leaf) => {
                let outcome = leaf.eval_leaf()?;
                trace.on_leaf_evaluated(leaf, outcome);
                Ok(outcome)
            }
            Self::And(children) => {
                for child in children {
                    if !child.eval_with_trace(trace)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Self::Or(children) => {
                for child in children {
                    if child.eval_with_trace(trace)? {
                        return Ok(true);
                    }
                }
                Ok(false)
            }
        }
    }
}

// ============================================================================
// SECTION: Tree Walkers
// ============================================================================

impl<P> Condition<P> {
    /// Maps every leaf through a fallible transform, preserving tree shape
    ///
    /// This is the resolution-phase walker: a domain turns a tree of leaf
    /// specifications into a tree of resolved leaves in one pass, before any
    /// evaluation happens, so the two phases never interleave.
    ///
    /// # Errors
    ///
    /// Returns the first transform error encountered, in leaf order.
    pub fn try_map<Q, E, F>(&self, transform: &mut F) -> Result<Condition<Q>, E>
    where
        F: FnMut(&P) -> Result<Q, E>,
    {
        match self {
            Self::Leaf(leaf) => Ok(Condition::Leaf(transform(leaf)?)),
            Self::And(children) => {
                let mut mapped = SmallVec::with_capacity(children.len());
                for child in children {
                    mapped.push(Box::new(child.try_map(transform)?));
                }
                Ok(Condition::And(mapped))
            }
            Self::Or(children) => {
                let mut mapped = SmallVec::with_capacity(children.len());
                for child in children {
                    mapped.push(Box::new(child.try_map(transform)?));
                }
                Ok(Condition::Or(mapped))
            }
        }
    }

    /// Collects references to all leaves in evaluation order
    #[must_use]
    pub fn leaves(&self) -> Vec<&P> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    /// Walks the tree and appends leaf references
    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a P>) {
        match self {
            Self::Leaf(leaf) => out.push(leaf),
            Self::And(children) | Self::Or(children) => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    /// Returns the number of leaves in the tree
    #[must_use]
    pub fn leaf_count(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::And(children) | Self::Or(children) => {
                children.iter().map(|child| child.leaf_count()).sum()
            }
        }
    }

    /// Returns the depth of the tree
    ///
    /// A leaf has depth 1; a combinator adds one level above its deepest
    /// child. An empty combinator has depth 1.
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            Self::Leaf(_) => 1,
            Self::And(children) | Self::Or(children) => {
                1 + children.iter().map(|child| child.depth()).max().unwrap_or(0)
            }
        }
    }
}

// ============================================================================
// SECTION: Constructor Helpers
// ============================================================================

impl<P> Condition<P> {
    /// Creates a logical AND of the given conditions
    #[must_use]
    pub fn and(conditions: Vec<Self>) -> Self {
        Self::And(conditions.into_iter().map(Box::new).collect())
    }

    /// Creates a logical OR of the given conditions
    #[must_use]
    pub fn or(conditions: Vec<Self>) -> Self {
        Self::Or(conditions.into_iter().map(Box::new).collect())
    }

    /// Creates a condition from a leaf predicate
    #[must_use]
    pub const fn leaf(leaf: P) -> Self {
        Self::Leaf(leaf)
    }
}

// ============================================================================
// SECTION: Default Implementations
// ============================================================================

impl<P> Default for Condition<P> {
    /// Creates an empty And condition (vacuously true)
    fn default() -> Self {
        Self::And(SmallVec::new())
    }
}
