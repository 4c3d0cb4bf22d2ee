use serde_json::Value;

use super::{CaptureError, ExtractedRound};

/// Removes markdown code fences the model tends to wrap its JSON in.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parses the model's reply into JSON, fenced or not.
///
/// # Errors
///
/// `EmptyResult` for blank content, `MalformedResult` when the text is not JSON
pub fn parse_model_reply(text: &str) -> Result<Value, CaptureError> {
    let clean = strip_code_fences(text);
    if clean.is_empty() {
        return Err(CaptureError::EmptyResult);
    }
    serde_json::from_str(&clean).map_err(|e| CaptureError::MalformedResult(e.to_string()))
}

/// Reads the relayed JSON as a round guess.
///
/// # Errors
///
/// `MalformedResult` when the JSON does not have the round shape
pub fn parse_extracted_round(value: Value) -> Result<ExtractedRound, CaptureError> {
    serde_json::from_value(value).map_err(|e| CaptureError::MalformedResult(e.to_string()))
}
