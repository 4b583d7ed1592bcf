//! Per-page store of committed field annotations.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::geometry::NormalizedBBox;
use crate::text_source::Word;

/// Fixed 10-entry color palette, cycled over the life of the store.
pub const FIELD_PALETTE: [&str; 10] = [
    "#e6194b", "#3cb44b", "#ffe119", "#4363d8", "#f58231",
    "#911eb4", "#46f0f0", "#f032e6", "#bcf60c", "#fabebe",
];

/// A named, colored mapping from a page region to a captured text value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldAnnotation {
    pub id: Uuid,
    pub page_number: u32,
    pub label: String,
    pub value: String,
    pub bbox: NormalizedBBox,
    /// Contributing word ids; empty for rect fields whose region matched no
    /// words.
    pub word_ids: HashSet<String>,
    /// Slot in `FIELD_PALETTE`. The palette itself is presentation.
    pub color_index: usize,
    pub created_at: DateTime<Utc>,
}

impl FieldAnnotation {
    pub fn color(&self) -> &'static str {
        FIELD_PALETTE[self.color_index % FIELD_PALETTE.len()]
    }
}

/// Session-scoped owner of all committed fields, keyed by page.
///
/// Color assignment cycles by a monotonic counter rather than by the count
/// of existing fields, so deleting a field never causes two visible fields
/// to share a color later in the session. The counter lives here, not in a
/// module global, so independent stores get independent color sequences.
#[derive(Debug, Default)]
pub struct FieldStore {
    fields: HashMap<u32, Vec<FieldAnnotation>>,
    color_counter: usize,
}

impl FieldStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_color(&mut self) -> usize {
        let index = self.color_counter % FIELD_PALETTE.len();
        self.color_counter += 1;
        index
    }

    /// Commit a word-selection field: value is the space-joined texts in the
    /// order given, bbox is the union of the word boxes. Returns `None` for
    /// an empty word set (nothing to annotate).
    pub fn add_field(
        &mut self,
        page_number: u32,
        label: impl Into<String>,
        words: &[&Word],
    ) -> Option<FieldAnnotation> {
        let bbox = NormalizedBBox::union_all(words.iter().map(|w| &w.bbox))?;
        let value = words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");
        let word_ids = words.iter().map(|w| w.id.clone()).collect();

        Some(self.insert(page_number, label.into(), value, bbox, word_ids))
    }

    /// Commit a rect field: the drawn rectangle is kept verbatim as the bbox
    /// (it records the user's intent even when captured-word geometry
    /// differs), alongside the captured text and contributing word ids.
    pub fn add_field_rect(
        &mut self,
        page_number: u32,
        label: impl Into<String>,
        value: impl Into<String>,
        bbox: NormalizedBBox,
        word_ids: HashSet<String>,
    ) -> FieldAnnotation {
        self.insert(page_number, label.into(), value.into(), bbox, word_ids)
    }

    fn insert(
        &mut self,
        page_number: u32,
        label: String,
        value: String,
        bbox: NormalizedBBox,
        word_ids: HashSet<String>,
    ) -> FieldAnnotation {
        let annotation = FieldAnnotation {
            id: Uuid::new_v4(),
            page_number,
            label,
            value,
            bbox,
            word_ids,
            color_index: self.next_color(),
            created_at: Utc::now(),
        };
        debug!(
            "Page {}: field '{}' committed with color slot {}",
            page_number, annotation.label, annotation.color_index
        );
        self.fields
            .entry(page_number)
            .or_default()
            .push(annotation.clone());
        annotation
    }

    /// Page-scoped removal; absent ids are a no-op, not an error.
    pub fn remove_field(&mut self, id: Uuid, page_number: u32) {
        if let Some(page_fields) = self.fields.get_mut(&page_number) {
            page_fields.retain(|f| f.id != id);
        }
    }

    /// Page-scoped rename; absent ids are a no-op.
    pub fn update_label(&mut self, id: Uuid, page_number: u32, label: impl Into<String>) {
        if let Some(field) = self
            .fields
            .get_mut(&page_number)
            .and_then(|fields| fields.iter_mut().find(|f| f.id == id))
        {
            field.label = label.into();
        }
    }

    /// All fields on a page, empty for unknown pages.
    pub fn get_page_fields(&self, page_number: u32) -> &[FieldAnnotation] {
        self.fields
            .get(&page_number)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
