//! Human-readable rendering of check results and the CLI exit-code contract.

use crate::types::CheckResult;

/// Render a result the way the CLI prints it in text mode.
///
/// `input` is the name as the user typed it; the server-normalized form is
/// only shown in JSON output.
///
/// ```
/// use username_dev::report::render_text;
/// use username_dev::types::CheckResult;
///
/// let result = CheckResult {
///     username: "alice".into(),
///     is_reserved: false,
///     is_deleted: false,
///     categories: vec![],
/// };
/// assert_eq!(render_text("alice", &result), "✓ alice is available\n");
/// ```
#[must_use]
pub fn render_text(input: &str, result: &CheckResult) -> String {
    if !result.is_reserved {
        return format!("✓ {input} is available\n");
    }

    let mut out = if result.is_deleted {
        format!("⚠ {input} is reserved (deleted)\n")
    } else {
        format!("✗ {input} is reserved\n")
    };

    if !result.categories.is_empty() {
        let categories: Vec<String> = result.categories.iter().map(ToString::to_string).collect();
        out.push_str(&format!("  Categories: {}\n", categories.join(", ")));
    }
    out
}

/// Render a result as the pretty-printed wire document.
///
/// # Errors
///
/// Propagates serializer failures, which cannot occur for well-formed values.
pub fn render_json(result: &CheckResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

/// Exit status for a completed lookup: `0` only when the name is free.
#[must_use]
pub fn exit_code(result: &CheckResult) -> u8 {
    u8::from(result.is_reserved)
}
