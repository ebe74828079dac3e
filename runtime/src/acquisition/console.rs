//! Console capture: hook `console.log` in a rendered page and read back
//! what the page logged.

use serde_json::Value;

/// Which `console.log` calls the hook records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    /// Only calls whose first argument is an array (the exam SPA logs its
    /// paper payload this way).
    ArrayPayloads,
    /// Every call.
    All,
}

/// Script installing the console hook. Captured calls accumulate in
/// `console.logs` as argument arrays.
pub fn hook_script(mode: CaptureMode) -> &'static str {
    match mode {
        CaptureMode::ArrayPayloads => {
            r#"(function () {
    if (!console.defaultLog) { console.defaultLog = console.log.bind(console); }
    console.logs = [];
    console.log = function () {
        console.defaultLog.apply(console, arguments);
        if (arguments.length > 0 && Array.isArray(arguments[0])) {
            console.logs.push(Array.from(arguments));
        }
    };
})()"#
        }
        CaptureMode::All => {
            r#"(function () {
    if (!console.defaultLog) { console.defaultLog = console.log.bind(console); }
    console.logs = [];
    console.log = function () {
        console.defaultLog.apply(console, arguments);
        console.logs.push(Array.from(arguments));
    };
})()"#
        }
    }
}

/// Expression returning the captured calls.
pub const READ_LOGS_SCRIPT: &str = "console.logs || []";

/// Source documents in captured calls: the first element of each call's
/// first argument, when that argument is a non-empty array.
pub fn documents_from_logs(logs: &Value) -> Vec<Value> {
    let Some(calls) = logs.as_array() else {
        return Vec::new();
    };
    calls
        .iter()
        .filter_map(|call| call.as_array()?.first()?.as_array()?.first().cloned())
        .collect()
}

/// Render one captured call as a line of text.
pub fn format_call(call: &Value) -> String {
    match call.as_array() {
        Some(args) => args
            .iter()
            .map(|a| match a {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(" "),
        None => call.to_string(),
    }
}
