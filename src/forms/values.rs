//! Conversion of free-text property inputs into typed values.

use serde::{Deserialize, Serialize};

use crate::graph_utils::graph::{Properties, PropertyValue};

/// How free-text property values are sent to the backend.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValuePolicy {
    /// Booleans, numbers and comma separated lists are recognised.
    #[default]
    Typed,
    /// Every value is sent as the literal text that was typed.
    Raw,
}

// Largest integer a float represents exactly
const MAX_SAFE_INT: f64 = 9_007_199_254_740_991.0;

fn parse_number(text: &str) -> Option<PropertyValue> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(PropertyValue::Int(n));
    }
    // f64::from_str also accepts inf/nan spellings, which are not numbers here
    if text.chars().any(|c| c.is_ascii_alphabetic() && c != 'e' && c != 'E') {
        return None;
    }
    let x = text.parse::<f64>().ok().filter(|x| x.is_finite())?;
    if x.fract() == 0.0 && x.abs() <= MAX_SAFE_INT {
        Some(PropertyValue::Int(x as i64))
    } else {
        Some(PropertyValue::Float(x))
    }
}

/// One scalar: `true`/`false` in any case, then a number, else the trimmed text.
pub fn parse_item(raw: &str) -> PropertyValue {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("true") {
        return PropertyValue::Bool(true);
    }
    if trimmed.eq_ignore_ascii_case("false") {
        return PropertyValue::Bool(false);
    }
    if !trimmed.is_empty()
        && let Some(n) = parse_number(trimmed)
    {
        return n;
    }
    PropertyValue::Text(trimmed.to_string())
}

/// Comma-containing input becomes a list of scalars (blank items dropped);
/// anything else is a single scalar.
pub fn parse_value(raw: &str, policy: ValuePolicy) -> PropertyValue {
    match policy {
        ValuePolicy::Raw => PropertyValue::Text(raw.to_string()),
        ValuePolicy::Typed if raw.contains(',') => PropertyValue::List(
            raw.split(',')
                .map(parse_item)
                .filter(|v| !matches!(v, PropertyValue::Text(s) if s.is_empty()))
                .collect(),
        ),
        ValuePolicy::Typed => parse_item(raw),
    }
}

/// Splits comma separated text into trimmed, non-empty items.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',').map(|s| s.trim()).filter(|s| !s.is_empty()).map(|s| s.to_string()).collect()
}

/// A row counts as filled when it has a key and a non-empty value.
pub fn is_filled(key: &str, value: &str) -> bool { !key.trim().is_empty() && !value.is_empty() }

/// Builds the property map from key/value rows, returning it along with the
/// number of filled rows.
pub fn collect_properties(rows: &[(String, String)], policy: ValuePolicy) -> (Properties, usize) {
    let mut props = Properties::new();
    let mut filled = 0usize;
    for (k, v) in rows {
        if is_filled(k, v) {
            props.insert(k.trim().to_string(), parse_value(v, policy));
            filled += 1;
        }
    }
    (props, filled)
}

/// Trimmed, non-empty names from a list of name inputs.
pub fn collect_names(rows: &[String]) -> Vec<String> {
    rows.iter().map(|p| p.trim()).filter(|p| !p.is_empty()).map(|p| p.to_string()).collect()
}
