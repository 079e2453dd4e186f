//! Quiz domain library for KidQuiz Adventure
//!
//! This crate holds everything about a quiz that does not touch the network:
//! the closed set of categories and their display catalog, the question record
//! and its validation at the provider boundary, and the session state machine
//! that drives one run from category selection to the final score.

pub mod category;
pub mod error;
pub mod image;
pub mod normalization;
pub mod question;
pub mod session;

pub use category::{CATALOG, Category, CategoryCard, UnknownCategory};
pub use error::{MalformedQuestion, SessionError};
pub use image::{Image, ImageSlot, ImageState, ImageTag};
pub use question::{
    BatchReport, OPTIONS_PER_QUESTION, QUESTIONS_PER_QUIZ, Question, QuestionDraft,
};
pub use session::{
    ActiveQuiz, Advance, AnswerOutcome, Delivery, ImageRequest, NO_QUESTIONS_MESSAGE, Phase,
    QuestionTicket, QuizSession, SessionState,
};
