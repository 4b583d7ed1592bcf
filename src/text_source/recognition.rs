//! Recognition adapter: flattens a black-box OCR engine's hierarchical
//! output into the shared word-list contract.
//!
//! The engine call is the system's only suspension point and may take
//! seconds; result application is handled by the router, keyed by the page
//! number captured at invocation time.

use crate::geometry::normalize_top_left;
use crate::text_source::{PageTextResult, Word};

/// A rendered page bitmap handed to the engine. Dimensions are the physical
/// raster size, not the on-screen display size, so device-pixel-ratio
/// scaling cancels out during normalization.
#[derive(Debug, Clone)]
pub struct PageBitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl PageBitmap {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: Vec::new(),
        }
    }

    pub fn with_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }
}

/// One token as reported by the engine, in bitmap pixel space (top-left
/// origin).
#[derive(Debug, Clone)]
pub struct RecognizedWord {
    pub text: String,
    /// Engine-reported confidence, 0..=100.
    pub confidence: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Default)]
pub struct RecognizedLine {
    pub words: Vec<RecognizedWord>,
}

#[derive(Debug, Clone, Default)]
pub struct RecognizedParagraph {
    pub lines: Vec<RecognizedLine>,
}

#[derive(Debug, Clone, Default)]
pub struct RecognizedBlock {
    pub paragraphs: Vec<RecognizedParagraph>,
}

/// Full hierarchical result of one recognition pass.
#[derive(Debug, Clone, Default)]
pub struct RecognizedPage {
    pub blocks: Vec<RecognizedBlock>,
}

impl RecognizedPage {
    /// Convenience constructor wrapping bare lines in a single block and
    /// paragraph.
    pub fn from_lines(lines: Vec<RecognizedLine>) -> Self {
        Self {
            blocks: vec![RecognizedBlock {
                paragraphs: vec![RecognizedParagraph { lines }],
            }],
        }
    }
}

/// The OCR engine itself is an external collaborator; this crate only
/// defines the seam.
pub trait RecognitionEngine {
    fn recognize(
        &self,
        bitmap: &PageBitmap,
    ) -> impl std::future::Future<Output = anyhow::Result<RecognizedPage>> + Send;
}

/// Flatten block → paragraph → line → word into the flat production-order
/// word sequence, dropping whitespace-only tokens and normalizing boxes
/// against the bitmap's raster dimensions.
pub fn flatten_recognized(
    page_number: u32,
    page: &RecognizedPage,
    bitmap_width: u32,
    bitmap_height: u32,
) -> PageTextResult {
    let mut words = Vec::new();

    for block in &page.blocks {
        for paragraph in &block.paragraphs {
            for line in &paragraph.lines {
                for token in &line.words {
                    if token.text.trim().is_empty() {
                        continue;
                    }
                    let index = words.len();
                    words.push(Word {
                        id: format!("p{page_number}-w{index}"),
                        text: token.text.clone(),
                        confidence: token.confidence.clamp(0.0, 100.0),
                        bbox: normalize_top_left(
                            token.x,
                            token.y,
                            token.width,
                            token.height,
                            bitmap_width as f32,
                            bitmap_height as f32,
                        ),
                    });
                }
            }
        }
    }

    let full_text = words
        .iter()
        .map(|w| w.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    PageTextResult {
        page_number,
        words,
        full_text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, x: f32, y: f32) -> RecognizedWord {
        RecognizedWord {
            text: text.to_string(),
            confidence: 87.5,
            x,
            y,
            width: 40.0,
            height: 16.0,
        }
    }

    #[test]
    fn test_flatten_preserves_production_order() {
        let page = RecognizedPage {
            blocks: vec![
                RecognizedBlock {
                    paragraphs: vec![RecognizedParagraph {
                        lines: vec![
                            RecognizedLine {
                                words: vec![word("Amount", 10.0, 10.0), word("due:", 60.0, 10.0)],
                            },
                            RecognizedLine {
                                words: vec![word("$99", 10.0, 30.0)],
                            },
                        ],
                    }],
                },
                RecognizedBlock {
                    paragraphs: vec![RecognizedParagraph {
                        lines: vec![RecognizedLine {
                            words: vec![word("footer", 10.0, 580.0)],
                        }],
                    }],
                },
            ],
        };

        let result = flatten_recognized(4, &page, 800, 600);
        let texts: Vec<_> = result.words.iter().map(|w| w.text.as_str()).collect();
        assert_eq!(texts, ["Amount", "due:", "$99", "footer"]);
        assert_eq!(result.full_text, "Amount due: $99 footer");
        assert_eq!(result.words[0].id, "p4-w0");
        assert_eq!(result.words[3].id, "p4-w3");
    }

    #[test]
    fn test_flatten_drops_whitespace_tokens() {
        let page = RecognizedPage::from_lines(vec![RecognizedLine {
            words: vec![word("real", 0.0, 0.0), word("  ", 50.0, 0.0)],
        }]);
        let result = flatten_recognized(1, &page, 100, 100);
        assert_eq!(result.words.len(), 1);
    }

    #[test]
    fn test_flatten_normalizes_against_raster_size() {
        let page = RecognizedPage::from_lines(vec![RecognizedLine {
            words: vec![word("w", 400.0, 300.0)],
        }]);
        let result = flatten_recognized(1, &page, 800, 600);
        let bbox = result.words[0].bbox;
        assert!((bbox.x0 - 0.5).abs() < 1e-6);
        assert!((bbox.y0 - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_confidence_clamped() {
        let mut w = word("x", 0.0, 0.0);
        w.confidence = 250.0;
        let page = RecognizedPage::from_lines(vec![RecognizedLine { words: vec![w] }]);
        let result = flatten_recognized(1, &page, 100, 100);
        assert_eq!(result.words[0].confidence, 100.0);
    }
}
