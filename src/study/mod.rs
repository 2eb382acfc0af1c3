//! Learn view-model
//!
//! A [`StudySession`] is created when the learn view opens a capsule and
//! discarded when it closes. It owns the three subviews (notes,
//! flashcards, quiz), the flashcard known-set, and the single-pass quiz
//! run, persisting progress through the storage layer as it goes.

mod session;

pub use session::{
    QuizStage, StudySession, Subview, NOTES_SEARCH_DEBOUNCE, QUIZ_REVEAL_DELAY,
};
