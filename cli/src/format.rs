//! Output formatting for the `graft` binary.

use serde_json::Value as Json;

/// Render a response body. Strings are printed as-is, everything else as
/// indented JSON.
pub fn render(body: &Json) -> String {
    match body {
        Json::String(text) => text.clone(),
        Json::Null => String::new(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}

/// Heading printed between demo sections.
pub fn section(label: &str) -> String {
    format!("\n\n{}", label)
}
