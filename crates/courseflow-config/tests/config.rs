// courseflow-config/tests/config.rs
// ============================================================================
// Module: Configuration Model Tests
// Description: Parsing, validation, and conversion tests for courseflow.toml.
// Purpose: Ensure configuration stays strict and converts into core types.
// Dependencies: courseflow-config, courseflow-core
// ============================================================================
//! ## Overview
//! Validates TOML parsing with unknown-field rejection, fail-closed limit
//! validation, default agreement with the core limits, and conversion into
//! engine configuration and dispatch policy.

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

use courseflow_config::ConfigError;
use courseflow_config::CourseflowConfig;
use courseflow_config::config_toml_example;
use courseflow_core::SpecLimits;
use courseflow_core::Strictness;

// ============================================================================
// SECTION: Defaults
// ============================================================================

/// Verifies the empty configuration agrees with the core defaults.
#[test]
fn defaults_agree_with_core_limits() {
    let config = CourseflowConfig::from_toml_str("").unwrap();
    assert_eq!(config.engine.strictness, Strictness::Strict);
    assert_eq!(config.spec_limits(), SpecLimits::default());
    assert!(config.action_policy().is_allowed("FEEDBACK"));
}

/// Verifies the documented example parses and validates.
#[test]
fn example_round_trips_through_the_parser() {
    let config = CourseflowConfig::from_toml_str(&config_toml_example()).unwrap();
    assert_eq!(config.engine.strictness, Strictness::Strict);
    assert_eq!(config.engine.max_condition_depth, 32);
    assert_eq!(config.engine.max_actions, 64);
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

/// Verifies a full configuration parses into the model.
#[test]
fn full_configuration_parses() {
    let config = CourseflowConfig::from_toml_str(
        r#"
        [engine]
        strictness = "lenient"
        max_condition_depth = 8
        max_actions = 4

        [actions]
        allowlist = ["FEEDBACK", "NAVIGATE"]
        denylist = ["NOTIFY"]
        "#,
    )
    .unwrap();

    assert_eq!(config.engine.strictness, Strictness::Lenient);
    assert_eq!(config.engine_config().strictness, Strictness::Lenient);
    assert_eq!(
        config.spec_limits(),
        SpecLimits {
            max_condition_depth: 8,
            max_actions: 4,
        }
    );

    let policy = config.action_policy();
    assert!(policy.is_allowed("FEEDBACK"));
    assert!(!policy.is_allowed("NOTIFY"));
    assert!(!policy.is_allowed("SET_VARIABLE"));
}

/// Verifies unknown fields are rejected.
#[test]
fn unknown_fields_are_rejected() {
    let result = CourseflowConfig::from_toml_str(
        r#"
        [engine]
        strictnes = "strict"
        "#,
    );
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

/// Verifies unknown strictness values are rejected.
#[test]
fn unknown_strictness_is_rejected() {
    let result = CourseflowConfig::from_toml_str(
        r#"
        [engine]
        strictness = "permissive"
        "#,
    );
    assert!(matches!(result, Err(ConfigError::Parse(_))));
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Verifies zero limits fail closed.
#[test]
fn zero_limits_are_rejected() {
    let result = CourseflowConfig::from_toml_str(
        r#"
        [engine]
        max_condition_depth = 0
        "#,
    );
    assert_eq!(
        result,
        Err(ConfigError::ZeroLimit {
            field: "engine.max_condition_depth",
        })
    );

    let result = CourseflowConfig::from_toml_str(
        r#"
        [engine]
        max_actions = 0
        "#,
    );
    assert_eq!(
        result,
        Err(ConfigError::ZeroLimit {
            field: "engine.max_actions",
        })
    );
}

/// Verifies blank action names fail closed.
#[test]
fn blank_action_names_are_rejected() {
    let result = CourseflowConfig::from_toml_str(
        r#"
        [actions]
        denylist = ["  "]
        "#,
    );
    assert_eq!(
        result,
        Err(ConfigError::BlankActionName {
            field: "actions.denylist",
        })
    );

    let result = CourseflowConfig::from_toml_str(
        r#"
        [actions]
        allowlist = [""]
        "#,
    );
    assert_eq!(
        result,
        Err(ConfigError::BlankActionName {
            field: "actions.allowlist",
        })
    );
}
