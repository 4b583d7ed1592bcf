//! Pointer-driven selection and draw state machine.
//!
//! Two mutually exclusive capture paths feed one commit operation: clicking
//! word boxes builds a multi-select, dragging on empty background draws a
//! rectangle that is captured on release. Either path parks its result in
//! `AwaitingLabel` until the user supplies a label; commit hands the result
//! to the `FieldStore` and clears all transient state.
//!
//! Clicks on already-committed field boxes never re-enter this flow; the
//! host routes those to its own delete/rename affordances.

use std::collections::HashSet;

use tracing::debug;

use crate::capture::{capture_region, CaptureResult};
use crate::config::CaptureConfig;
use crate::fields::{FieldAnnotation, FieldStore};
use crate::geometry::NormalizedBBox;
use crate::text_source::Word;

/// What a pending capture came from, with the data each path commits.
#[derive(Debug, Clone)]
pub enum PendingCapture {
    /// Word-click multi-select; value and bbox are derived from the words
    /// at commit time.
    Words { ids: HashSet<String> },
    /// Drag-to-draw; the drawn rectangle is committed verbatim together
    /// with the captured text.
    Rect {
        bbox: NormalizedBBox,
        capture: CaptureResult,
    },
}

#[derive(Debug, Clone)]
pub enum InteractionState {
    Idle,
    WordsSelected { ids: HashSet<String> },
    Dragging { origin: (f32, f32), current: (f32, f32) },
    AwaitingLabel(PendingCapture),
}

/// Drives the capture flow. All coordinates entering here are already in
/// normalized page space (the host converts pointer events through
/// `ViewportRect::to_normalized`).
#[derive(Debug)]
pub struct InteractionController {
    config: CaptureConfig,
    state: InteractionState,
}

impl InteractionController {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            state: InteractionState::Idle,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn pending(&self) -> Option<&PendingCapture> {
        match &self.state {
            InteractionState::AwaitingLabel(pending) => Some(pending),
            _ => None,
        }
    }

    pub fn selected_ids(&self) -> Option<&HashSet<String>> {
        match &self.state {
            InteractionState::WordsSelected { ids } => Some(ids),
            _ => None,
        }
    }

    /// Live rectangle preview while dragging.
    pub fn drag_preview(&self) -> Option<NormalizedBBox> {
        match &self.state {
            InteractionState::Dragging { origin, current } => {
                Some(NormalizedBBox::new(origin.0, origin.1, current.0, current.1))
            }
            _ => None,
        }
    }

    /// Click on a word box. Shift toggles membership; a plain click replaces
    /// the selection, except that plain-clicking the sole selected word
    /// clears it. Entering the select path abandons any uncommitted prompt
    /// or drag.
    pub fn click_word(&mut self, word_id: &str, shift: bool) {
        let mut ids = match std::mem::replace(&mut self.state, InteractionState::Idle) {
            InteractionState::WordsSelected { ids } => ids,
            _ => HashSet::new(),
        };

        if shift {
            if !ids.remove(word_id) {
                ids.insert(word_id.to_string());
            }
        } else if ids.len() == 1 && ids.contains(word_id) {
            ids.clear();
        } else {
            ids.clear();
            ids.insert(word_id.to_string());
        }

        if !ids.is_empty() {
            self.state = InteractionState::WordsSelected { ids };
        }
    }

    /// Pointer-down on empty overlay background starts a drag and abandons
    /// any word selection or uncommitted prompt.
    pub fn begin_drag(&mut self, x: f32, y: f32) {
        self.state = InteractionState::Dragging {
            origin: (x, y),
            current: (x, y),
        };
    }

    pub fn update_drag(&mut self, x: f32, y: f32) {
        if let InteractionState::Dragging { current, .. } = &mut self.state {
            *current = (x, y);
        }
    }

    /// Pointer release. A rectangle below the minimum extent in either axis
    /// is an accidental click and is discarded; otherwise the region is
    /// captured immediately and the flow waits for a label.
    pub fn end_drag(&mut self, words: &[Word]) {
        let (origin, current) = match &self.state {
            InteractionState::Dragging { origin, current } => (*origin, *current),
            _ => return,
        };

        let bbox = NormalizedBBox::new(origin.0, origin.1, current.0, current.1);
        if bbox.width() < self.config.min_drag_extent || bbox.height() < self.config.min_drag_extent {
            debug!("Drag below minimum extent, discarding");
            self.state = InteractionState::Idle;
            return;
        }

        let capture = capture_region(words, &bbox, self.config.row_tolerance);
        debug!("Drag captured {} words", capture.word_ids.len());
        self.state = InteractionState::AwaitingLabel(PendingCapture::Rect { bbox, capture });
    }

    /// Move a word selection into the label prompt. No-op without a
    /// selection.
    pub fn open_label_prompt(&mut self) {
        match std::mem::replace(&mut self.state, InteractionState::Idle) {
            InteractionState::WordsSelected { ids } => {
                self.state = InteractionState::AwaitingLabel(PendingCapture::Words { ids });
            }
            other => self.state = other,
        }
    }

    /// Commit the pending capture under `label`. An empty label is a no-op
    /// and keeps the prompt open (the host disables its commit action
    /// instead of surfacing an error). On success all transient state is
    /// cleared.
    pub fn submit_label(
        &mut self,
        label: &str,
        words: &[Word],
        store: &mut FieldStore,
        page_number: u32,
    ) -> Option<FieldAnnotation> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }

        let pending = match std::mem::replace(&mut self.state, InteractionState::Idle) {
            InteractionState::AwaitingLabel(pending) => pending,
            other => {
                self.state = other;
                return None;
            }
        };

        match pending {
            PendingCapture::Words { ids } => {
                // Value and bbox come from the words in production order,
                // not click order.
                let selected: Vec<&Word> = words.iter().filter(|w| ids.contains(&w.id)).collect();
                store.add_field(page_number, label, &selected)
            }
            PendingCapture::Rect { bbox, capture } => Some(store.add_field_rect(
                page_number,
                label,
                capture.text,
                bbox,
                capture.word_ids,
            )),
        }
    }

    /// Explicit cancel or mode change: drop all transient state without
    /// committing.
    pub fn cancel(&mut self) {
        self.state = InteractionState::Idle;
    }
}
