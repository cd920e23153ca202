// cet-logic/tests/support/mocks.rs
// ============================================================================
// Module: Mock Leaves
// Description: Deterministic leaf predicates for condition tests.
// ============================================================================
//! ## Overview
//! Mock leaves with fixed outcomes, including a failing variant for error
//! propagation tests.

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

use std::error::Error;
use std::fmt;

use cet_logic::LeafEval;

// ========================================================================
// Mock Leaf
// ========================================================================

/// Error raised by the failing mock leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockLeafError;

impl fmt::Display for MockLeafError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("mock leaf failure")
    }
}

impl Error for MockLeafError {}

/// Deterministic mock leaf for condition tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockLeaf {
    /// Always evaluates true.
    True,
    /// Always evaluates false.
    False,
    /// Always fails with [`MockLeafError`].
    Fails,
}

impl LeafEval for MockLeaf {
    type Error = MockLeafError;

    fn eval_leaf(&self) -> Result<bool, Self::Error> {
        match self {
            Self::True => Ok(true),
            Self::False => Ok(false),
            Self::Fails => Err(MockLeafError),
        }
    }
}
