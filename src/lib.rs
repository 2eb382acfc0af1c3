//! Pocket Classroom core library
//!
//! Everything the `classroom` binary builds on:
//! - `storage`: JSON-file persistence for capsules, progress, and the
//!   denormalized library index
//! - `author`: the capsule editor view-model (collect, validate, autosave)
//! - `study`: the learn view-model (notes / flashcards / quiz subviews)
//! - `transfer`: strict JSON import and pretty-printed export
//! - `events`: typed event bus between views
//! - `timers`: one-outstanding-deadline-per-purpose delayed tasks

pub mod author;
pub mod events;
pub mod storage;
pub mod study;
pub mod timers;
pub mod transfer;
