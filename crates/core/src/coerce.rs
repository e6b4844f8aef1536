//! Total field coercions for cross-shape projection.
//!
//! Campaign characters and vault characters disagree on a few field
//! encodings: age is numeric on the campaign side and textual in the
//! vault, and quotes have historically been stored as either a single
//! JSON string or an array. These conversions never fail — unmappable
//! input degrades to `None`.

/// Numeric age to its vault text form.
pub fn age_to_text(age: Option<i32>) -> Option<String> {
    age.map(|a| a.to_string())
}

/// Textual age back to a number. Non-numeric text (e.g. "ancient")
/// becomes `None` rather than an error.
pub fn age_from_text(age: Option<&str>) -> Option<i32> {
    age.and_then(|a| a.trim().parse::<i32>().ok())
}

/// Normalize a quotes JSONB value to a string array.
///
/// Accepts an array (non-string elements are stringified), a bare string
/// (wrapped in a one-element array), or null/absent (`None`). Anything
/// else is treated as a single stringified quote, matching how legacy
/// rows were written.
pub fn normalize_quotes(value: Option<&serde_json::Value>) -> Option<Vec<String>> {
    let value = value?;
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::Array(items) => Some(
            items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
        ),
        serde_json::Value::String(s) => Some(vec![s.clone()]),
        other => Some(vec![other.to_string()]),
    }
}
