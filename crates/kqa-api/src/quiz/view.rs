//! Render models for the front end.
//!
//! A [`ShellView`] is a pure function of the session state: the client draws
//! whatever the latest view says and never keeps quiz state of its own.

use base64::{Engine, engine::general_purpose::STANDARD};
use kqa_quiz::{ActiveQuiz, CATALOG, Category, CategoryCard, ImageState, Phase, QuizSession, SessionState};
use serde::Serialize;

/// A category reference with its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryRef {
    pub category: Category,
    pub name: &'static str,
}

impl From<Category> for CategoryRef {
    fn from(category: Category) -> Self {
        Self {
            category,
            name: category.name(),
        }
    }
}

/// One card of the category selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCardView {
    pub category: Category,
    pub name: &'static str,
    pub icon: &'static str,
    pub color: &'static str,
}

impl From<&CategoryCard> for CategoryCardView {
    fn from(card: &CategoryCard) -> Self {
        Self {
            category: card.category,
            name: card.category.name(),
            icon: card.icon,
            color: card.color,
        }
    }
}

/// The catalog in display order.
pub fn category_cards() -> Vec<CategoryCardView> {
    CATALOG.iter().map(CategoryCardView::from).collect()
}

/// Top-level view of a session, tagged by `view`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum ShellView {
    CategorySelection {
        categories: Vec<CategoryCardView>,
    },
    Loading {
        category: CategoryRef,
        message: String,
    },
    Quiz(QuizScreen),
    Summary {
        category: CategoryRef,
        score: u32,
        total: usize,
        message: String,
    },
    Unavailable {
        category: CategoryRef,
        message: String,
    },
}

impl ShellView {
    pub fn from_session(session: &QuizSession) -> Self {
        match session.state() {
            SessionState::Idle => Self::CategorySelection {
                categories: category_cards(),
            },
            SessionState::AwaitingQuestions { category } => Self::Loading {
                category: (*category).into(),
                message: format!("Gathering questions for {}!", category.name()),
            },
            SessionState::Active(quiz) => Self::Quiz(QuizScreen::from_quiz(quiz)),
            SessionState::Complete {
                category,
                score,
                total,
            } => Self::Summary {
                category: (*category).into(),
                score: *score,
                total: *total,
                message: format!("You're becoming a real expert in {}!", category.name()),
            },
            SessionState::Unavailable { category, message } => Self::Unavailable {
                category: (*category).into(),
                message: message.clone(),
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    /// 1-based number of the question on screen
    pub current: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuestionView {
    pub id: String,
    pub prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passage: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionStyle {
    /// Not answered yet
    Neutral,
    Correct,
    SelectedWrong,
    Dimmed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionView {
    pub letter: char,
    pub text: String,
    pub style: OptionStyle,
    pub interactive: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub correct: bool,
    pub headline: String,
    pub correct_answer: String,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NextAction {
    Next,
    Finish,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NextControl {
    pub action: NextAction,
    pub label: &'static str,
}

/// Illustration of the question on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ImageView {
    Loading,
    /// `src` is a `data:` URL
    Ready { src: String },
    Unavailable,
}

impl ImageView {
    pub fn from_state(state: &ImageState) -> Self {
        match state {
            ImageState::Loading => Self::Loading,
            ImageState::Ready(image) => Self::Ready {
                src: format!(
                    "data:{};base64,{}",
                    image.mime_type,
                    STANDARD.encode(&image.data)
                ),
            },
            ImageState::Unavailable => Self::Unavailable,
        }
    }
}

/// The quiz screen for the question on screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QuizScreen {
    pub category: CategoryRef,
    pub position: Position,
    pub score: u32,
    pub question: QuestionView,
    pub options: Vec<OptionView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<NextControl>,
    pub image: ImageView,
}

impl QuizScreen {
    pub fn from_quiz(quiz: &ActiveQuiz) -> Self {
        let question = quiz.current();
        let selected = quiz.phase().selected();

        let options = question
            .options()
            .iter()
            .zip('A'..)
            .map(|(text, letter)| OptionView {
                letter,
                text: text.clone(),
                style: option_style(text, question.correct_answer(), selected),
                interactive: selected.is_none(),
            })
            .collect();

        let feedback = selected.map(|selected| {
            let correct = question.is_correct(selected);
            Feedback {
                correct,
                headline: if correct {
                    "Fantastic!".to_string()
                } else {
                    format!("Almost! The answer is: {}", question.correct_answer())
                },
                correct_answer: question.correct_answer().to_string(),
                explanation: question.explanation().to_string(),
            }
        });

        let next = matches!(quiz.phase(), Phase::Revealed { .. }).then(|| {
            if quiz.is_last() {
                NextControl {
                    action: NextAction::Finish,
                    label: "Finish Adventure!",
                }
            } else {
                NextControl {
                    action: NextAction::Next,
                    label: "Next Mission!",
                }
            }
        });

        Self {
            category: quiz.category().into(),
            position: Position {
                current: quiz.index() + 1,
                total: quiz.total(),
            },
            score: quiz.score(),
            question: QuestionView {
                id: question.id().to_string(),
                prompt: question.prompt().to_string(),
                passage: question.passage().map(String::from),
            },
            options,
            feedback,
            next,
            image: ImageView::from_state(quiz.image().state()),
        }
    }
}

fn option_style(option: &str, correct_answer: &str, selected: Option<&str>) -> OptionStyle {
    match selected {
        None => OptionStyle::Neutral,
        Some(_) if option == correct_answer => OptionStyle::Correct,
        Some(selected) if option == selected => OptionStyle::SelectedWrong,
        Some(_) => OptionStyle::Dimmed,
    }
}
