pub mod embedded;
pub mod recognition;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{FieldcapError, FieldcapResult};
use crate::geometry::NormalizedBBox;

use embedded::EmbeddedTextStream;
use recognition::{flatten_recognized, PageBitmap, RecognitionEngine};

/// One recognized or extracted text token with its normalized box.
///
/// The id encodes provenance (page plus production index) but downstream
/// logic treats it as opaque; only uniqueness within a page matters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    pub id: String,
    pub text: String,
    /// 0..=100; embedded text is ground truth and always reports 100.
    pub confidence: f32,
    pub bbox: NormalizedBBox,
}

/// Word list for one page from one source. `words` keeps production order,
/// which is not necessarily reading order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageTextResult {
    pub page_number: u32,
    pub words: Vec<Word>,
    pub full_text: String,
}

/// Which adapter produced a page's words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextSource {
    Embedded,
    Recognized,
}

/// A page result tagged with its producer, so the embedded-wins precedence
/// rule lives in the type instead of in call-order timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaggedPageText {
    pub source: TextSource,
    pub data: PageTextResult,
}

/// Per-page result slots shared by both adapters.
///
/// Precedence rule: embedded text, when present, preempts recognition for
/// that page. A page holds at most one active result; a recognition result
/// arriving for an already-filled slot is discarded, which also makes a
/// stale result from a superseded recognition run harmless.
#[derive(Debug, Default)]
pub struct PageTextRouter {
    results: HashMap<u32, TaggedPageText>,
}

impl PageTextRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, page_number: u32) -> Option<&TaggedPageText> {
        self.results.get(&page_number)
    }

    /// True when the page has no result yet and the embedded adapter found
    /// nothing, i.e. the consumer should schedule a recognition pass.
    pub fn needs_recognition(&self, page_number: u32) -> bool {
        !self.results.contains_key(&page_number)
    }

    /// Run the embedded-text adapter for a page. Returns true if embedded
    /// text was found and stored; false signals "needs recognition".
    pub fn load_embedded(&mut self, page_number: u32, stream: &EmbeddedTextStream) -> bool {
        match embedded::extract_embedded(page_number, stream) {
            Some(result) => {
                info!(
                    "Page {}: embedded text layer with {} words",
                    page_number,
                    result.words.len()
                );
                self.results.insert(
                    page_number,
                    TaggedPageText {
                        source: TextSource::Embedded,
                        data: result,
                    },
                );
                true
            }
            None => {
                debug!("Page {}: no usable embedded text, recognition required", page_number);
                false
            }
        }
    }

    /// Run a recognition pass against a rendered bitmap of the page.
    ///
    /// The page number is captured here, at invocation time; by the time the
    /// engine resolves, the consumer may have navigated elsewhere. Returns
    /// Ok(true) if the result was stored, Ok(false) if it was discarded
    /// because the slot was already filled. An engine failure writes nothing.
    pub async fn recognize_page<E: RecognitionEngine>(
        &mut self,
        engine: &E,
        page_number: u32,
        bitmap: &PageBitmap,
    ) -> FieldcapResult<bool> {
        if self.results.contains_key(&page_number) {
            debug!("Page {}: result already present, skipping recognition", page_number);
            return Ok(false);
        }

        let recognized = engine.recognize(bitmap).await.map_err(|e| {
            FieldcapError::recognition(page_number, format!("recognition engine failed: {e}"))
        })?;

        let result = flatten_recognized(page_number, &recognized, bitmap.width, bitmap.height);

        // Guard again after the await: an embedded load or a competing
        // recognition run may have filled the slot while we were suspended.
        if self.results.contains_key(&page_number) {
            warn!(
                "Page {}: discarding recognition result, slot filled while pending",
                page_number
            );
            return Ok(false);
        }

        info!("Page {}: recognized {} words", page_number, result.words.len());
        self.results.insert(
            page_number,
            TaggedPageText {
                source: TextSource::Recognized,
                data: result,
            },
        );
        Ok(true)
    }

    /// Drop a page's result so it can be re-extracted (e.g. retry after a
    /// recognition failure).
    pub fn clear_page(&mut self, page_number: u32) {
        self.results.remove(&page_number);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded::EmbeddedTextItem;
    use recognition::{RecognizedLine, RecognizedPage, RecognizedWord};

    fn stream_with(texts: &[&str]) -> EmbeddedTextStream {
        EmbeddedTextStream {
            items: texts
                .iter()
                .enumerate()
                .map(|(i, t)| EmbeddedTextItem {
                    text: t.to_string(),
                    transform: [12.0, 0.0, 0.0, 12.0, 40.0 + i as f32 * 80.0, 700.0],
                    width: 60.0,
                    height: None,
                })
                .collect(),
            page_width: 612.0,
            page_height: 792.0,
        }
    }

    struct FixedEngine {
        words: Vec<&'static str>,
    }

    impl RecognitionEngine for FixedEngine {
        async fn recognize(&self, _bitmap: &PageBitmap) -> anyhow::Result<RecognizedPage> {
            let words = self
                .words
                .iter()
                .map(|t| RecognizedWord {
                    text: t.to_string(),
                    confidence: 91.0,
                    x: 10.0,
                    y: 10.0,
                    width: 50.0,
                    height: 20.0,
                })
                .collect();
            Ok(RecognizedPage::from_lines(vec![RecognizedLine { words }]))
        }
    }

    #[test]
    fn test_embedded_fills_slot() {
        let mut router = PageTextRouter::new();
        assert!(router.load_embedded(1, &stream_with(&["Invoice", "123"])));
        assert!(!router.needs_recognition(1));

        let tagged = router.get(1).unwrap();
        assert_eq!(tagged.source, TextSource::Embedded);
        assert_eq!(tagged.data.words.len(), 2);
    }

    #[test]
    fn test_whitespace_only_stream_needs_recognition() {
        let mut router = PageTextRouter::new();
        assert!(!router.load_embedded(1, &stream_with(&["  ", "\t"])));
        assert!(router.needs_recognition(1));
        assert!(router.get(1).is_none());
    }

    #[tokio::test]
    async fn test_recognition_fills_empty_slot() {
        let mut router = PageTextRouter::new();
        let engine = FixedEngine {
            words: vec!["Total", "42.00"],
        };
        let bitmap = PageBitmap::new(800, 600);

        let stored = router.recognize_page(&engine, 2, &bitmap).await.unwrap();
        assert!(stored);
        let tagged = router.get(2).unwrap();
        assert_eq!(tagged.source, TextSource::Recognized);
        assert_eq!(tagged.data.page_number, 2);
        assert_eq!(tagged.data.full_text, "Total 42.00");
    }

    #[tokio::test]
    async fn test_embedded_preempts_recognition() {
        let mut router = PageTextRouter::new();
        router.load_embedded(1, &stream_with(&["ground", "truth"]));

        let engine = FixedEngine { words: vec!["noise"] };
        let stored = router
            .recognize_page(&engine, 1, &PageBitmap::new(800, 600))
            .await
            .unwrap();
        assert!(!stored);
        assert_eq!(router.get(1).unwrap().source, TextSource::Embedded);
    }

    #[tokio::test]
    async fn test_engine_failure_writes_nothing() {
        struct FailingEngine;
        impl RecognitionEngine for FailingEngine {
            async fn recognize(&self, _bitmap: &PageBitmap) -> anyhow::Result<RecognizedPage> {
                anyhow::bail!("model not loaded")
            }
        }

        let mut router = PageTextRouter::new();
        let err = router
            .recognize_page(&FailingEngine, 5, &PageBitmap::new(100, 100))
            .await
            .unwrap_err();
        assert!(err.is_recoverable());
        assert!(router.get(5).is_none());

        // Retry path stays open.
        assert!(router.needs_recognition(5));
    }
}
