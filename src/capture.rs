//! Region text capture: which words does a drawn rectangle cover, and what
//! substring of each partially-covered word belongs to it.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::geometry::NormalizedBBox;
use crate::text_source::Word;

/// Default row tolerance: word tops within 0.8% of page height count as one
/// reading row. OCR-reported tops on the same visual line are rarely
/// pixel-identical.
pub const DEFAULT_ROW_TOLERANCE: f32 = 0.008;

/// Text recovered from a region, plus the ids of the words that contributed.
/// Ephemeral: lives only between drag release and label commit.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureResult {
    pub text: String,
    pub word_ids: HashSet<String>,
}

struct CapturedPiece {
    text: String,
    word_id: String,
    row_top: f32,
    overlap_start: f32,
}

/// Capture the text covered by `region`.
///
/// Row membership is decided by the word's vertical midpoint, not by any
/// vertical overlap: a word that only grazes the region's top or bottom edge
/// is excluded. Partially covered words are sliced proportionally by
/// character count, which assumes uniform glyph width within one token. That
/// is wrong for most fonts but the source APIs only report whole-word boxes,
/// and the approximation beats both over- and under-capturing the word.
pub fn capture_region(words: &[Word], region: &NormalizedBBox, row_tolerance: f32) -> CaptureResult {
    let mut pieces: Vec<CapturedPiece> = Vec::new();

    for word in words {
        let chars: Vec<char> = word.text.chars().collect();
        if chars.is_empty() {
            continue;
        }

        let cy = word.bbox.center_y();
        if cy < region.y0 || cy > region.y1 {
            continue;
        }

        let overlap_start = word.bbox.x0.max(region.x0);
        let overlap_end = word.bbox.x1.min(region.x1);
        if overlap_start >= overlap_end {
            continue;
        }

        let fully_inside = word.bbox.x0 >= region.x0 && word.bbox.x1 <= region.x1;
        let text = if fully_inside {
            word.text.clone()
        } else {
            slice_proportionally(&chars, &word.bbox, region)
        };

        if text.is_empty() {
            continue;
        }

        pieces.push(CapturedPiece {
            text,
            word_id: word.id.clone(),
            row_top: word.bbox.y0,
            overlap_start,
        });
    }

    // Reading order: rows top to bottom, then left to right within a row.
    // Within a row, order by the overlap start rather than the word's own
    // left edge, so a partially covered leading word sorts correctly.
    pieces.sort_by(|a, b| {
        if (a.row_top - b.row_top).abs() <= row_tolerance {
            a.overlap_start
                .partial_cmp(&b.overlap_start)
                .unwrap_or(std::cmp::Ordering::Equal)
        } else {
            a.row_top
                .partial_cmp(&b.row_top)
                .unwrap_or(std::cmp::Ordering::Equal)
        }
    });

    let text = pieces
        .iter()
        .map(|p| p.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let word_ids = pieces.into_iter().map(|p| p.word_id).collect();

    CaptureResult { text, word_ids }
}

fn slice_proportionally(chars: &[char], word_box: &NormalizedBBox, region: &NormalizedBBox) -> String {
    let width = word_box.width();
    if width <= f32::EPSILON {
        return chars.iter().collect::<String>().trim().to_string();
    }

    let start_ratio = ((region.x0 - word_box.x0) / width).clamp(0.0, 1.0);
    let end_ratio = ((region.x1 - word_box.x0) / width).clamp(0.0, 1.0);

    let count = chars.len();
    let start = ((start_ratio * count as f32).round() as usize).min(count);
    let end = ((end_ratio * count as f32).round() as usize).min(count);
    if start >= end {
        return String::new();
    }

    chars[start..end].iter().collect::<String>().trim().to_string()
}
