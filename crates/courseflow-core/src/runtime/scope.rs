// courseflow-core/src/runtime/scope.rs
// ============================================================================
// Module: CourseFlow In-Memory Scope
// Description: In-memory runtime scope with dotted-path traversal.
// Purpose: Provide a scope implementation for embedding and tests.
// Dependencies: crate::interfaces, serde_json
// ============================================================================

//! ## Overview
//! `MapScope` is the in-memory [`RuntimeScope`] implementation. The first
//! path segment selects a top-level entry; remaining segments traverse
//! nested JSON objects. A missing segment yields `None`, which callers
//! surface as a resolution error; an explicit JSON `null` payload is
//! returned as found, so the per-operator null policy can apply.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::interfaces::RuntimeScope;
use crate::interfaces::ScopeError;

// ============================================================================
// SECTION: Map Scope
// ============================================================================

/// In-memory runtime scope keyed by top-level entry name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MapScope {
    /// Top-level scope entries.
    entries: BTreeMap<String, serde_json::Value>,
}

impl MapScope {
    /// Creates an empty scope.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Inserts a top-level scope entry.
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.entries.insert(key.into(), value);
    }

    /// Creates a scope from top-level entries.
    #[must_use]
    pub fn from_entries(
        entries: impl IntoIterator<Item = (String, serde_json::Value)>,
    ) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }
}

impl RuntimeScope for MapScope {
    fn value_at(&self, path: &str) -> Result<Option<serde_json::Value>, ScopeError> {
        let mut segments = path.split('.');
        let Some(first) = segments.next() else {
            return Ok(None);
        };
        let Some(mut current) = self.entries.get(first) else {
            return Ok(None);
        };
        for segment in segments {
            let serde_json::Value::Object(fields) = current else {
                return Ok(None);
            };
            let Some(next) = fields.get(segment) else {
                return Ok(None);
            };
            current = next;
        }
        Ok(Some(current.clone()))
    }
}
