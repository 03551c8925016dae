use crate::colors::HighlightColor;
use crate::highlight::{byte_offset, char_len, HighlightRange};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub color: Option<HighlightColor>,
}

/// Splits `text` into runs that share one highlight color. Ranges that do
/// not fit are skipped; where ranges overlap the later one wins.
pub fn styled_segments<'a>(text: &'a str, highlights: &[HighlightRange]) -> Vec<Segment<'a>> {
    let len = char_len(text) as usize;
    let mut paint: Vec<Option<HighlightColor>> = vec![None; len];
    for range in highlights.iter().filter(|range| range.is_valid_for(text)) {
        for slot in &mut paint[range.start as usize..range.end as usize] {
            *slot = Some(range.color);
        }
    }

    let mut segments = Vec::new();
    let mut run_start = 0;
    for ix in 1..=len {
        if ix == len || paint[ix] != paint[run_start] {
            let start = byte_offset(text, run_start);
            let end = byte_offset(text, ix);
            segments.push(Segment {
                text: &text[start..end],
                color: paint[run_start],
            });
            run_start = ix;
        }
    }
    segments
}
