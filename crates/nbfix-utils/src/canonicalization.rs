//! JCS (RFC 8785) emission for `--json` output
//!
//! Machine-readable output is canonical so two runs with the same outcome print the same bytes.

use anyhow::{Context, Result};
use serde::Serialize;

/// Emit `value` as canonical JSON (JCS, RFC 8785).
///
/// `value` is serialized directly rather than through `serde_json::Value`, whose numbers
/// carry their source text when `arbitrary_precision` is enabled.
///
/// # Example
///
/// ```rust
/// use nbfix_utils::canonicalization::emit_jcs;
///
/// #[derive(serde::Serialize)]
/// struct Summary { removed: u32, outcome: &'static str }
///
/// let json = emit_jcs(&Summary { removed: 2, outcome: "changed" }).unwrap();
/// assert_eq!(json, r#"{"outcome":"changed","removed":2}"#);
/// ```
pub fn emit_jcs<T: Serialize>(value: &T) -> Result<String> {
    let json_bytes =
        serde_json_canonicalizer::to_vec(value).context("Failed to canonicalize JSON using JCS")?;
    String::from_utf8(json_bytes).context("JCS output contained invalid UTF-8")
}
