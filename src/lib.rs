// Region-to-text capture and field annotation engine.
//
// Pipeline: text source adapters produce a normalized word list per page;
// the interaction layer turns pointer gestures into region captures; labeled
// captures are committed to the field store.

pub mod capture;
pub mod config;
pub mod error;
pub mod fields;
pub mod geometry;
pub mod interaction;
pub mod logging;
pub mod text_source;

pub use capture::{capture_region, CaptureResult};
pub use config::{CaptureConfig, FieldcapConfig};
pub use error::{FieldcapError, FieldcapResult};
pub use fields::{FieldAnnotation, FieldStore, FIELD_PALETTE};
pub use geometry::{NormalizedBBox, ViewportRect};
pub use interaction::{InteractionController, InteractionState, PendingCapture};
pub use text_source::{PageTextResult, PageTextRouter, TaggedPageText, TextSource, Word};
