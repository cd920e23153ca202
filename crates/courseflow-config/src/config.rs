// courseflow-config/src/config.rs
// ============================================================================
// Module: CourseFlow Configuration Model
// Description: Canonical courseflow.toml model with fail-closed validation.
// Purpose: Single source of truth for engine runtime configuration.
// Dependencies: courseflow-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! The configuration model mirrors `courseflow.toml`: an `[engine]` section
//! selecting the strictness policy and structural limits, and an `[actions]`
//! section controlling which action types may be dispatched. Parsing is
//! strict (unknown fields are rejected) and validation fails closed: a
//! configuration that cannot be proven sane is refused rather than patched.

// ============================================================================
// SECTION: Imports
// ============================================================================

use courseflow_core::ActionAccessPolicy;
use courseflow_core::EngineConfig;
use courseflow_core::SpecLimits;
use courseflow_core::Strictness;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Configuration Model
// ============================================================================

/// Canonical CourseFlow runtime configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CourseflowConfig {
    /// Engine evaluation settings.
    #[serde(default)]
    pub engine: EngineSettings,
    /// Action dispatch settings.
    #[serde(default)]
    pub actions: ActionSettings,
}

/// Engine evaluation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSettings {
    /// Strictness policy for leaf evaluation failures.
    #[serde(default)]
    pub strictness: Strictness,
    /// Maximum condition tree depth accepted at compile time.
    #[serde(default = "default_max_condition_depth")]
    pub max_condition_depth: usize,
    /// Maximum number of actions per scenario.
    #[serde(default = "default_max_actions")]
    pub max_actions: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            strictness: Strictness::default(),
            max_condition_depth: default_max_condition_depth(),
            max_actions: default_max_actions(),
        }
    }
}

/// Action dispatch settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActionSettings {
    /// Optional allowlist of action type wire names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowlist: Option<Vec<String>>,
    /// Explicit denylist of action type wire names.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub denylist: Vec<String>,
}

/// Returns the default condition depth limit, matching [`SpecLimits`].
const fn default_max_condition_depth() -> usize {
    32
}

/// Returns the default per-scenario action limit, matching [`SpecLimits`].
const fn default_max_actions() -> usize {
    64
}

// ============================================================================
// SECTION: Loading and Validation
// ============================================================================

impl CourseflowConfig {
    /// Parses and validates a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(input).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a limit is zero or an action list entry
    /// is blank.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.engine.max_condition_depth == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "engine.max_condition_depth",
            });
        }
        if self.engine.max_actions == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "engine.max_actions",
            });
        }
        if let Some(allowlist) = &self.actions.allowlist {
            ensure_action_names(allowlist, "actions.allowlist")?;
        }
        ensure_action_names(&self.actions.denylist, "actions.denylist")?;
        Ok(())
    }

    /// Converts the engine section into the core engine configuration.
    #[must_use]
    pub const fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            strictness: self.engine.strictness,
        }
    }

    /// Converts the engine section into compile-time spec limits.
    #[must_use]
    pub const fn spec_limits(&self) -> SpecLimits {
        SpecLimits {
            max_condition_depth: self.engine.max_condition_depth,
            max_actions: self.engine.max_actions,
        }
    }

    /// Converts the actions section into the dispatch access policy.
    #[must_use]
    pub fn action_policy(&self) -> ActionAccessPolicy {
        ActionAccessPolicy {
            allowlist: self
                .actions
                .allowlist
                .as_ref()
                .map(|names| names.iter().cloned().collect()),
            denylist: self.actions.denylist.iter().cloned().collect(),
        }
    }
}

/// Ensures action list entries are non-blank.
fn ensure_action_names(names: &[String], field: &'static str) -> Result<(), ConfigError> {
    for name in names {
        if name.trim().is_empty() {
            return Err(ConfigError::BlankActionName {
                field,
            });
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration parsing and validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// TOML parsing failed.
    #[error("failed to parse configuration: {0}")]
    Parse(String),
    /// A structural limit must be greater than zero.
    #[error("configuration limit must be greater than zero: {field}")]
    ZeroLimit {
        /// Offending configuration field.
        field: &'static str,
    },
    /// An action list entry is blank.
    #[error("configuration action names must be non-blank: {field}")]
    BlankActionName {
        /// Offending configuration field.
        field: &'static str,
    },
}
