use crate::colors::HighlightColor;

const PREVIEW_CHARS: usize = 20;

/// A colored span of a note message. Offsets count `char`s, not bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HighlightRange {
    pub start: i64,
    pub end: i64,
    pub color: HighlightColor,
}

impl HighlightRange {
    pub fn new(start: i64, end: i64, color: HighlightColor) -> Self {
        Self { start, end, color }
    }

    pub fn is_valid_for(&self, text: &str) -> bool {
        self.is_valid_for_len(char_len(text))
    }

    fn is_valid_for_len(&self, len: i64) -> bool {
        0 <= self.start && self.start < self.end && self.end <= len
    }
}

pub fn char_len(text: &str) -> i64 {
    text.chars().count() as i64
}

/// Re-validates `highlights` after the text changed from `old_text` to
/// `new_text`. Offsets are clamped into the new text; ranges that collapse
/// are dropped. Order is preserved.
pub fn adjust_highlights(
    highlights: &[HighlightRange],
    old_text: &str,
    new_text: &str,
) -> Vec<HighlightRange> {
    if old_text == new_text {
        return highlights.to_vec();
    }

    let len = char_len(new_text);
    highlights
        .iter()
        .filter_map(|range| {
            let start = range.start.clamp(0, len);
            let end = range.end.clamp(start, len);
            if start < end && start < len {
                Some(HighlightRange { start, end, ..*range })
            } else {
                None
            }
        })
        .collect()
}

/// Adds a range for a finished selection and re-sorts by start. The
/// selection may run in either direction; empty or out-of-bounds
/// selections leave the list as it was.
pub fn insert_highlight(
    highlights: &[HighlightRange],
    text: &str,
    selection_start: i64,
    selection_end: i64,
    color: HighlightColor,
) -> Vec<HighlightRange> {
    let start = selection_start.min(selection_end);
    let end = selection_start.max(selection_end);
    let range = HighlightRange { start, end, color };

    let mut next = highlights.to_vec();
    if !range.is_valid_for(text) {
        return next;
    }
    next.push(range);
    next.sort_by_key(|range| range.start);
    next
}

/// Drops every range that does not fit `text`, without clamping.
pub fn retain_valid(highlights: &[HighlightRange], text: &str) -> Vec<HighlightRange> {
    let len = char_len(text);
    highlights
        .iter()
        .filter(|range| range.is_valid_for_len(len))
        .copied()
        .collect()
}

pub fn remove_highlight(highlights: &[HighlightRange], index: usize) -> Vec<HighlightRange> {
    let mut next = highlights.to_vec();
    if index < next.len() {
        next.remove(index);
    }
    next
}

/// The slice of `text` a range covers, or `None` for a range that does not
/// fit.
pub fn highlighted_text<'a>(text: &'a str, range: &HighlightRange) -> Option<&'a str> {
    if !range.is_valid_for(text) {
        return None;
    }
    let start = byte_offset(text, range.start as usize);
    let end = byte_offset(text, range.end as usize);
    Some(&text[start..end])
}

/// Short label for a highlight: its text, cut to twenty characters.
pub fn preview(text: &str, range: &HighlightRange) -> Option<String> {
    let covered = highlighted_text(text, range)?;
    let mut label: String = covered.chars().take(PREVIEW_CHARS).collect();
    if covered.chars().count() > PREVIEW_CHARS {
        label.push_str("...");
    }
    Some(label)
}

pub(crate) fn byte_offset(text: &str, char_ix: usize) -> usize {
    text.char_indices()
        .nth(char_ix)
        .map(|(ix, _)| ix)
        .unwrap_or(text.len())
}
