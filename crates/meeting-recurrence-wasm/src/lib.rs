//! Browser bindings for the scheduling dialog's recurrence preview.
//!
//! The JS side passes the recurrence config in its JSON wire form plus the
//! current time; results come back as JSON strings. Parse failures surface as
//! thrown JS errors, while configurations that produce no occurrences return
//! an empty `occurrences` array.

use meeting_recurrence::{describe, parse_reference, parse_timezone, preview, RecurrenceConfig};
use wasm_bindgen::prelude::*;

/// Preview upcoming occurrences as a JSON `Preview` document.
#[wasm_bindgen(js_name = previewOccurrences)]
pub fn preview_occurrences(config_json: &str, now: &str, timezone: &str) -> Result<String, JsError> {
    preview_json(config_json, now, timezone).map_err(|e| JsError::new(&e))
}

/// One-line English description of a recurrence config.
#[wasm_bindgen(js_name = describeRecurrence)]
pub fn describe_recurrence(config_json: &str) -> Result<String, JsError> {
    describe_text(config_json).map_err(|e| JsError::new(&e))
}

fn preview_json(config_json: &str, now: &str, timezone: &str) -> Result<String, String> {
    let config = RecurrenceConfig::from_json(config_json).map_err(|e| e.to_string())?;
    let tz = parse_timezone(timezone).map_err(|e| e.to_string())?;
    let now = parse_reference(now, &tz).map_err(|e| e.to_string())?;
    serde_json::to_string(&preview(&config, now)).map_err(|e| e.to_string())
}

fn describe_text(config_json: &str) -> Result<String, String> {
    RecurrenceConfig::from_json(config_json)
        .map(|config| describe(&config))
        .map_err(|e| e.to_string())
}
