//! Loading [`RttOptions`] from compiler configuration files.

use anyhow::{Context, Result, bail};
use rtt_common::RttOptions;
use std::path::Path;

/// Key of the runtime-type section inside a full compiler configuration.
pub const SECTION_KEY: &str = "runtimeTypes";

/// Parse options from configuration text.
///
/// Accepts either a whole compiler configuration, in which case only its
/// `runtimeTypes` section is read, or the bare options object.
pub fn parse_options(text: &str) -> Result<RttOptions> {
    let value: serde_json::Value =
        serde_json::from_str(text).context("configuration is not valid JSON")?;
    let serde_json::Value::Object(mut root) = value else {
        bail!("configuration must be a JSON object");
    };
    let section = match root.remove(SECTION_KEY) {
        Some(section) => section,
        None => serde_json::Value::Object(root),
    };
    serde_json::from_value(section).context("invalid runtime type options")
}

/// Read and parse options from `path`.
pub fn load_options(path: &Path) -> Result<RttOptions> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let options =
        parse_options(&text).with_context(|| format!("failed to load {}", path.display()))?;
    tracing::debug!(path = %path.display(), ?options, "loaded runtime type options");
    Ok(options)
}

/// Options from `path` if given, defaults otherwise.
pub fn load_options_or_default(path: Option<&Path>) -> Result<RttOptions> {
    let Some(path) = path else {
        return Ok(RttOptions::default());
    };
    load_options(path)
}
