//! Best-effort repair of model JSON output

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

/// First fenced block, with or without a language tag
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[A-Za-z0-9_-]*\s*([\s\S]*?)\s*```").expect("fence regex"));

/// A comma directly followed by a closing brace or bracket
static TRAILING_COMMA_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r",\s*([}\]])").expect("trailing comma regex"));

/// Strip code fences and whitespace, then drop trailing commas
///
/// A reply that already parses is returned trimmed and otherwise untouched.
/// Without a fence the whole reply is used. The comma rule is applied
/// textually, so it also touches string contents that happen to match.
pub fn clean_json(raw: &str) -> String {
    debug!(raw_len = raw.len(), "clean_json: called");
    let trimmed = raw.trim();
    if serde_json::from_str::<serde::de::IgnoredAny>(trimmed).is_ok() {
        return trimmed.to_string();
    }

    let body = FENCE_RE
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .unwrap_or(raw);

    TRAILING_COMMA_RE.replace_all(body.trim(), "$1").into_owned()
}
