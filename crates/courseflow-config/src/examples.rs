// courseflow-config/src/examples.rs
// ============================================================================
// Module: CourseFlow Config Examples
// Description: Deterministic example configuration for docs and onboarding.
// Purpose: Keep the documented example in lockstep with the model.
// Dependencies: crate::config
// ============================================================================

//! ## Overview
//! The example TOML is generated from a constant so documentation and tests
//! always agree with the parsing model: the example must round-trip through
//! [`crate::config::CourseflowConfig::from_toml_str`].

// ============================================================================
// SECTION: Example Generation
// ============================================================================

/// Returns the canonical example `courseflow.toml`.
#[must_use]
pub fn config_toml_example() -> String {
    concat!(
        "# CourseFlow engine configuration\n",
        "\n",
        "[engine]\n",
        "# strict: leaf failures abort the evaluation (fail closed).\n",
        "# lenient: leaf failures evaluate false and are recorded as faults.\n",
        "strictness = \"strict\"\n",
        "max_condition_depth = 32\n",
        "max_actions = 64\n",
        "\n",
        "[actions]\n",
        "# Omit allowlist to permit every registered action type.\n",
        "denylist = []\n",
    )
    .to_string()
}
