//! Configuration for the runtime-type passes.

use serde::{Deserialize, Serialize};

/// Options controlling table materialization and type-check synthesis.
///
/// Deserialized from the `runtimeTypes` section of the compiler's JSON
/// configuration; every field has a default so partial objects are accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct RttOptions {
    /// Re-run the general subtype algorithm after every fast-path type check
    /// and trap on disagreement. Development only.
    pub verify_type_checks: bool,
    /// Emit empty per-class display names.
    pub minify: bool,
}

impl RttOptions {
    /// Parse options from a JSON object.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn with_verify_type_checks(mut self, verify: bool) -> Self {
        self.verify_type_checks = verify;
        self
    }

    pub fn with_minify(mut self, minify: bool) -> Self {
        self.minify = minify;
        self
    }
}

#[cfg(test)]
#[path = "../tests/options_tests.rs"]
mod tests;
