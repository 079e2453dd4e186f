//! The quiz session state machine.
//!
//! A session moves `Idle` -> `AwaitingQuestions` -> `Active` -> `Complete`,
//! with `Unavailable` reached instead of `Active` when the provider produced
//! no usable questions. `reset` returns to `Idle` from anywhere.
//!
//! Results of asynchronous work (the question batch, each illustration) are
//! applied through tickets and tags that carry the session generation. Every
//! `start` and `reset` bumps the generation, so a response for an abandoned
//! attempt can never leak into the current one.

use serde::Serialize;

use crate::{
    category::Category,
    error::SessionError,
    image::{Image, ImageSlot, ImageTag},
    question::Question,
};

/// Message shown when a quiz could not be assembled.
pub const NO_QUESTIONS_MESSAGE: &str =
    "We couldn't find any questions for this adventure. Let's try again!";

/// Proof of a pending question request, handed back with its result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionTicket {
    generation: u64,
    category: Category,
}

impl QuestionTicket {
    pub const fn category(&self) -> Category {
        self.category
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }
}

/// An illustration the caller should fetch for the question now on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRequest {
    pub tag: ImageTag,
    pub description: String,
}

/// Whether the current question's answer has been revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum Phase {
    Answering,
    Revealed { selected: String },
}

impl Phase {
    pub fn selected(&self) -> Option<&str> {
        match self {
            Self::Answering => None,
            Self::Revealed { selected } => Some(selected.as_str()),
        }
    }
}

/// A quiz in progress. Only constructible from a non-empty question list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveQuiz {
    category: Category,
    questions: Vec<Question>,
    index: usize,
    score: u32,
    phase: Phase,
    image: ImageSlot,
}

impl ActiveQuiz {
    fn new(category: Category, questions: Vec<Question>, generation: u64) -> Option<Self> {
        if questions.is_empty() {
            return None;
        }

        Some(Self {
            category,
            questions,
            index: 0,
            score: 0,
            phase: Phase::Answering,
            image: ImageSlot::loading(ImageTag {
                generation,
                index: 0,
            }),
        })
    }

    pub const fn category(&self) -> Category {
        self.category
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Zero-based position of the question on screen.
    pub const fn index(&self) -> usize {
        self.index
    }

    pub const fn total(&self) -> usize {
        self.questions.len()
    }

    pub const fn score(&self) -> u32 {
        self.score
    }

    pub const fn phase(&self) -> &Phase {
        &self.phase
    }

    pub const fn image(&self) -> &ImageSlot {
        &self.image
    }

    pub fn current(&self) -> &Question {
        // index < questions.len() holds from construction through advance()
        &self.questions[self.index]
    }

    pub const fn is_last(&self) -> bool {
        self.index + 1 == self.questions.len()
    }

    /// The illustration request for the question on screen.
    pub fn image_request(&self) -> ImageRequest {
        ImageRequest {
            tag: self.image.tag(),
            description: self.current().image_description().to_string(),
        }
    }

    fn answer(&mut self, option: &str) -> AnswerOutcome {
        if matches!(self.phase, Phase::Revealed { .. }) {
            return AnswerOutcome::Ignored;
        }

        let correct = self.current().is_correct(option);
        if correct {
            self.score += 1;
        }
        self.phase = Phase::Revealed {
            selected: option.to_string(),
        };

        if correct {
            AnswerOutcome::Correct
        } else {
            AnswerOutcome::Incorrect
        }
    }
}

/// Shell-level state of a session; one variant per view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingQuestions {
        category: Category,
    },
    Active(ActiveQuiz),
    Complete {
        category: Category,
        score: u32,
        total: usize,
    },
    Unavailable {
        category: Category,
        message: String,
    },
}

impl SessionState {
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingQuestions { .. } => "awaiting questions",
            Self::Active(quiz) => match quiz.phase {
                Phase::Answering => "answering",
                Phase::Revealed { .. } => "revealed",
            },
            Self::Complete { .. } => "complete",
            Self::Unavailable { .. } => "unavailable",
        }
    }
}

/// Result of [`QuizSession::answer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    Incorrect,
    /// The answer was already revealed; nothing changed.
    Ignored,
}

/// Result of [`QuizSession::advance`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next question, whose illustration should be fetched.
    Next(ImageRequest),
    /// The last question was left; the quiz is over.
    Complete { score: u32, total: usize },
}

/// Result of [`QuizSession::deliver_questions`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The quiz began; fetch the first illustration.
    Started(ImageRequest),
    /// No usable questions; the session shows the unavailable view.
    Unavailable,
    /// The ticket belongs to an abandoned attempt; nothing changed.
    Stale,
}

/// One player's quiz session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct QuizSession {
    generation: u64,
    state: SessionState,
}

impl QuizSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Begin a quiz for `category`. Only valid from `Idle`.
    pub fn start(&mut self, category: Category) -> Result<QuestionTicket, SessionError> {
        if !matches!(self.state, SessionState::Idle) {
            return Err(self.invalid("start"));
        }

        self.generation += 1;
        self.state = SessionState::AwaitingQuestions { category };

        Ok(QuestionTicket {
            generation: self.generation,
            category,
        })
    }

    /// Apply the outcome of the question request identified by `ticket`.
    ///
    /// Provider failures are delivered as an empty list.
    pub fn deliver_questions(&mut self, ticket: QuestionTicket, questions: Vec<Question>) -> Delivery {
        let awaiting = matches!(
            self.state,
            SessionState::AwaitingQuestions { category } if category == ticket.category
        );
        if ticket.generation != self.generation || !awaiting {
            return Delivery::Stale;
        }

        match ActiveQuiz::new(ticket.category, questions, self.generation) {
            Some(quiz) => {
                let request = quiz.image_request();
                self.state = SessionState::Active(quiz);
                Delivery::Started(request)
            }
            None => {
                self.state = SessionState::Unavailable {
                    category: ticket.category,
                    message: NO_QUESTIONS_MESSAGE.to_string(),
                };
                Delivery::Unavailable
            }
        }
    }

    /// Record the player's choice for the question on screen.
    ///
    /// A second answer while the feedback is shown is ignored.
    pub fn answer(&mut self, option: &str) -> Result<AnswerOutcome, SessionError> {
        match &mut self.state {
            SessionState::Active(quiz) => Ok(quiz.answer(option)),
            _ => Err(self.invalid("answer")),
        }
    }

    /// Leave the revealed question, either to the next one or to the summary.
    pub fn advance(&mut self) -> Result<Advance, SessionError> {
        let SessionState::Active(quiz) = &mut self.state else {
            return Err(self.invalid("advance"));
        };
        if quiz.phase == Phase::Answering {
            return Err(self.invalid("advance"));
        }

        if quiz.is_last() {
            let (category, score, total) = (quiz.category, quiz.score, quiz.total());
            self.state = SessionState::Complete {
                category,
                score,
                total,
            };
            return Ok(Advance::Complete { score, total });
        }

        quiz.index += 1;
        quiz.phase = Phase::Answering;
        quiz.image = ImageSlot::loading(ImageTag {
            generation: self.generation,
            index: quiz.index,
        });

        Ok(Advance::Next(quiz.image_request()))
    }

    /// Drop everything and go back to category selection.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = SessionState::Idle;
    }

    /// Apply an illustration response. Returns `false` when it was stale.
    pub fn resolve_image(&mut self, tag: ImageTag, image: Option<Image>) -> bool {
        match &mut self.state {
            SessionState::Active(quiz) if tag.generation == self.generation => {
                quiz.image.resolve(tag, image)
            }
            _ => false,
        }
    }

    pub fn active(&self) -> Result<&ActiveQuiz, SessionError> {
        match &self.state {
            SessionState::Active(quiz) => Ok(quiz),
            _ => Err(SessionError::NotActive),
        }
    }

    fn invalid(&self, operation: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            operation,
            state: self.state.name(),
        }
    }
}
