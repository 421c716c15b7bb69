//! Result/logs decoding.
//!
//! The backend has encoded task results in several ways over time:
//!
//! 1. A JSON object `{"result": ..., "logs": "..."}`.
//! 2. Plain text `"Result:\n...\nExecution Logs:\n..."`.
//! 3. A bare string.
//!
//! All of them must keep decoding. [`decode_result`] tries each encoding in
//! that fixed order and takes the first match; the bare-string case always
//! matches, so decoding never fails.

use serde_json::Value;

/// Placeholder shown when a task has no result.
pub const NO_RESULT: &str = "No result available";
/// Placeholder shown when a task has no logs.
pub const NO_LOGS: &str = "No logs available";

/// Separator between result and logs in the plain-text encoding.
pub const LOGS_DELIMITER: &str = "\nExecution Logs:\n";
/// Optional label in front of the result in the plain-text encoding.
pub const RESULT_LABEL: &str = "Result:\n";

/// Which encoding a result payload was decoded from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultEncoding {
    /// No payload at all.
    Empty,
    /// JSON object with a nested `result` key.
    Structured,
    /// Text split on [`LOGS_DELIMITER`].
    Delimited,
    /// Anything else, shown verbatim.
    Plain,
}

/// Result and logs text ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedResult {
    pub encoding: ResultEncoding,
    pub result: String,
    pub logs: String,
}

impl DecodedResult {
    fn new(encoding: ResultEncoding, result: impl Into<String>, logs: impl Into<String>) -> Self {
        Self {
            encoding,
            result: result.into(),
            logs: logs.into(),
        }
    }
}

/// Decode a raw result payload into display text.
pub fn decode_result(raw: Option<&str>) -> DecodedResult {
    let raw = match raw {
        Some(raw) if !raw.is_empty() => raw,
        _ => return DecodedResult::new(ResultEncoding::Empty, NO_RESULT, NO_LOGS),
    };

    // Order matters: structured payloads may contain the delimiter text.
    let decoders: [fn(&str) -> Option<DecodedResult>; 2] = [decode_structured, decode_delimited];
    decoders
        .iter()
        .find_map(|decode| decode(raw))
        .unwrap_or_else(|| DecodedResult::new(ResultEncoding::Plain, raw, NO_LOGS))
}

fn decode_structured(raw: &str) -> Option<DecodedResult> {
    let mut object = match serde_json::from_str::<Value>(raw).ok()? {
        Value::Object(object) => object,
        _ => return None,
    };
    let result = object.remove("result")?;
    let logs = match object.remove("logs") {
        None | Some(Value::Null) => NO_LOGS.to_string(),
        Some(Value::String(s)) if s.is_empty() => NO_LOGS.to_string(),
        Some(Value::String(s)) => s,
        Some(other) => pretty(&other),
    };
    Some(DecodedResult::new(ResultEncoding::Structured, pretty(&result), logs))
}

fn decode_delimited(raw: &str) -> Option<DecodedResult> {
    let (result, logs) = raw.split_once(LOGS_DELIMITER)?;
    let result = result.strip_prefix(RESULT_LABEL).unwrap_or(result);
    Some(DecodedResult::new(ResultEncoding::Delimited, result, logs))
}

/// Pretty-print a JSON value with two-space indentation.
pub(crate) fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
