// courseflow-core/src/core/hashing.rs
// ============================================================================
// Module: CourseFlow Content Hashing
// Description: Canonical JSON digests for compiled scenario revisions.
// Purpose: Tie verdicts and faults to the content revision they ran against.
// Dependencies: serde, serde_jcs, sha2, thiserror
// ============================================================================

//! ## Overview
//! Scenario definitions are replaced wholesale when courseware content is
//! republished. Digesting the canonical JSON form (RFC 8785 / JCS) of a
//! specification gives every compiled scenario a stable revision identity,
//! so a verdict or fault record always names the exact content it was
//! evaluated against.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Content Digest
// ============================================================================

/// SHA-256 digest of a canonical JSON document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentDigest(String);

impl ContentDigest {
    /// Digests the canonical JSON form of a serializable value.
    ///
    /// # Errors
    ///
    /// Returns [`DigestError::Canonicalization`] when serialization fails.
    pub fn of_canonical_json<T: Serialize + ?Sized>(value: &T) -> Result<Self, DigestError> {
        let bytes = serde_jcs::to_vec(value)
            .map_err(|err| DigestError::Canonicalization(err.to_string()))?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(Self(hex_encode(&hasher.finalize())))
    }

    /// Returns the lowercase hex digest string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when computing content digests.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DigestError {
    /// JSON canonicalization failed.
    #[error("failed to canonicalize json: {0}")]
    Canonicalization(String),
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = fmt::Write::write_fmt(&mut out, format_args!("{byte:02x}"));
    }
    out
}
