//! Flat string form of a highlight list, as stored in the
//! `message_highlights` column: `start,end,Color|start,end,Color|...`.
//!
//! Delimiters are not escaped. Color tokens never contain either one.

use crate::colors::HighlightColor;
use crate::highlight::HighlightRange;

pub const RANGE_DELIMITER: &str = "|";
pub const FIELD_DELIMITER: &str = ",";

pub fn encode_highlights(highlights: &[HighlightRange]) -> String {
    highlights
        .iter()
        .map(|range| {
            format!(
                "{}{FIELD_DELIMITER}{}{FIELD_DELIMITER}{}",
                range.start,
                range.end,
                range.color.name()
            )
        })
        .collect::<Vec<_>>()
        .join(RANGE_DELIMITER)
}

/// Parses a stored highlight list. Malformed entries are skipped one by
/// one; the rest of the list survives.
pub fn decode_highlights(value: Option<&str>) -> Vec<HighlightRange> {
    let Some(value) = value.filter(|value| !value.is_empty()) else {
        return Vec::new();
    };

    value
        .split(RANGE_DELIMITER)
        .filter_map(|entry| {
            let parsed = decode_entry(entry);
            if parsed.is_none() {
                tracing::debug!(entry, "skipping malformed highlight entry");
            }
            parsed
        })
        .collect()
}

fn decode_entry(entry: &str) -> Option<HighlightRange> {
    let parts: Vec<&str> = entry.split(FIELD_DELIMITER).collect();
    let [start, end, color] = parts.as_slice() else {
        return None;
    };
    Some(HighlightRange {
        start: start.parse().ok()?,
        end: end.parse().ok()?,
        color: color.parse::<HighlightColor>().ok()?,
    })
}

/// Column value for a highlight list; empty lists are stored as NULL.
pub fn to_column(highlights: &[HighlightRange]) -> Option<String> {
    if highlights.is_empty() {
        None
    } else {
        Some(encode_highlights(highlights))
    }
}
