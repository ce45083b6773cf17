//! Extraction of the step array from free-form service output.
//!
//! The service is asked for a bare JSON array but routinely wraps it in
//! prose or code fences. The first balanced top-level `[...]` is taken;
//! anything that does not parse yields an empty list.

use crate::step::GeneratedTourStep;
use serde_json::Value;

/// Locate the first balanced `[...]` substring, honoring JSON strings
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Parse generated steps out of service text.
///
/// Non-object elements and objects that cannot be read as a step are
/// skipped; a missing or unparsable array gives an empty list.
pub fn parse_steps(text: &str) -> Vec<GeneratedTourStep> {
    let Some(array) = extract_json_array(text) else {
        log::debug!("No JSON array in service output");
        return Vec::new();
    };

    let items: Vec<Value> = match serde_json::from_str(array) {
        Ok(items) => items,
        Err(e) => {
            log::debug!("Service output array did not parse: {e}");
            return Vec::new();
        }
    };

    items
        .into_iter()
        .filter(Value::is_object)
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect()
}
