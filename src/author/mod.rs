//! Capsule editor view-model
//!
//! One [`CapsuleDraft`] exists per author session: created when the view
//! opens, discarded when it closes. It holds the form fields, collects
//! them into a candidate capsule, and tracks dirtiness for the debounced
//! autosave.

mod draft;

pub use draft::{CapsuleDraft, CardDraft, QuestionDraft, AUTOSAVE_DELAY};
