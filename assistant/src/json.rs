//! Pulling JSON arrays out of free-form model output.

use serde::de::DeserializeOwned;

use crate::error::{AssistantError, Result};

/// Parse the span from the first `[` to the last `]` of `output` as a JSON
/// array of `T`.
///
/// Models often wrap JSON in prose or code fences; anything outside the
/// outermost brackets is ignored.
pub fn extract_json_array<T: DeserializeOwned>(output: &str) -> Result<Vec<T>> {
    let start = output.find('[');
    let end = output.rfind(']');
    let (Some(start), Some(end)) = (start, end) else {
        return Err(AssistantError::MalformedOutput(
            "no JSON array in model output".to_string(),
        ));
    };
    if end < start {
        return Err(AssistantError::MalformedOutput(
            "no JSON array in model output".to_string(),
        ));
    }

    serde_json::from_str(&output[start..=end])
        .map_err(|e| AssistantError::MalformedOutput(format!("invalid JSON array: {e}")))
}
