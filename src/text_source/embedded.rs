//! Embedded-text adapter: turns a page's structured text stream into the
//! shared word-list contract.
//!
//! Embedded text is ground truth, so confidence is fixed at 100 rather than
//! inferred. An all-whitespace stream is indistinguishable from "no text
//! layer" and yields `None`, signalling that the page needs recognition.

use tracing::debug;

use crate::geometry::normalize_bottom_left;
use crate::text_source::{PageTextResult, Word};

/// One item of a page's structured text stream, as delivered by the
/// document parser. Coordinates are in page units with a bottom-left
/// origin and y increasing upward.
#[derive(Debug, Clone)]
pub struct EmbeddedTextItem {
    pub text: String,
    /// Text matrix [a, b, c, d, e, f]; e/f carry the baseline offset and
    /// a/b carry the font scale.
    pub transform: [f32; 6],
    pub width: f32,
    /// Glyph-box height when the parser reports one; otherwise derived from
    /// the font scale.
    pub height: Option<f32>,
}

impl EmbeddedTextItem {
    /// Font size approximated from the scale part of the text matrix, used
    /// as the glyph-box height when no explicit height is available.
    pub fn font_size(&self) -> f32 {
        self.transform[0].hypot(self.transform[1])
    }
}

/// A page's full embedded text stream plus the page extent needed for
/// normalization.
#[derive(Debug, Clone)]
pub struct EmbeddedTextStream {
    pub items: Vec<EmbeddedTextItem>,
    pub page_width: f32,
    pub page_height: f32,
}

/// Produce the page word list from the embedded stream, or `None` when no
/// item survives whitespace filtering.
pub fn extract_embedded(page_number: u32, stream: &EmbeddedTextStream) -> Option<PageTextResult> {
    let mut words = Vec::new();

    for (index, item) in stream.items.iter().enumerate() {
        if item.text.trim().is_empty() {
            continue;
        }

        let tx = item.transform[4];
        let ty = item.transform[5];
        let height = item.height.unwrap_or_else(|| item.font_size());

        let bbox = normalize_bottom_left(
            tx,
            ty,
            item.width,
            height,
            stream.page_width,
            stream.page_height,
        );

        words.push(Word {
            id: format!("p{page_number}-e{index}"),
            text: item.text.clone(),
            confidence: 100.0,
            bbox,
        });
    }

    if words.is_empty() {
        debug!("Page {}: embedded stream had no non-whitespace items", page_number);
        return None;
    }

    let full_text = words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    Some(PageTextResult {
        page_number,
        words,
        full_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(text: &str, tx: f32, ty: f32, width: f32, height: Option<f32>) -> EmbeddedTextItem {
        EmbeddedTextItem {
            text: text.to_string(),
            transform: [10.0, 0.0, 0.0, 10.0, tx, ty],
            width,
            height,
        }
    }

    #[test]
    fn test_extract_filters_whitespace_items() {
        let stream = EmbeddedTextStream {
            items: vec![
                item("Invoice", 72.0, 700.0, 60.0, Some(12.0)),
                item("   ", 140.0, 700.0, 20.0, Some(12.0)),
                item("#1042", 170.0, 700.0, 40.0, Some(12.0)),
            ],
            page_width: 612.0,
            page_height: 792.0,
        };

        let result = extract_embedded(1, &stream).unwrap();
        assert_eq!(result.words.len(), 2);
        assert_eq!(result.full_text, "Invoice #1042");
        assert!(result.words.iter().all(|w| w.confidence == 100.0));
        assert_eq!(result.words[0].id, "p1-e0");
        assert_eq!(result.words[1].id, "p1-e2");
    }

    #[test]
    fn test_extract_all_whitespace_is_absent() {
        let stream = EmbeddedTextStream {
            items: vec![item(" ", 0.0, 0.0, 5.0, None), item("\n\t", 10.0, 0.0, 5.0, None)],
            page_width: 612.0,
            page_height: 792.0,
        };
        assert!(extract_embedded(1, &stream).is_none());
    }

    #[test]
    fn test_vertical_flip() {
        // Baseline near the top of a bottom-left-origin page must land near
        // the top of the normalized (top-left-origin) page.
        let stream = EmbeddedTextStream {
            items: vec![item("header", 0.0, 780.0, 100.0, Some(12.0))],
            page_width: 612.0,
            page_height: 792.0,
        };
        let result = extract_embedded(1, &stream).unwrap();
        let bbox = result.words[0].bbox;
        assert!(bbox.y1 < 0.05, "expected near top, got y1={}", bbox.y1);
        assert!(bbox.y0 < bbox.y1);
    }

    #[test]
    fn test_height_falls_back_to_font_size() {
        let i = EmbeddedTextItem {
            text: "x".to_string(),
            transform: [3.0, 4.0, 0.0, 5.0, 0.0, 0.0],
            width: 10.0,
            height: None,
        };
        assert!((i.font_size() - 5.0).abs() < 1e-6);
    }
}
