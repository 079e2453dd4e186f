//! Question records and their validation at the provider boundary.
//!
//! A generation provider returns [`QuestionDraft`]s, which are untrusted. They
//! become [`Question`]s only through [`Question::from_draft`], so every
//! question held by a session satisfies the answer key invariant: the correct
//! answer is exactly one of four distinct options.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{category::Category, error::MalformedQuestion, normalization::find_lenient_match};

/// Number of questions requested for one quiz, and the most a session keeps.
pub const QUESTIONS_PER_QUIZ: usize = 8;

/// Number of options every question must offer.
pub const OPTIONS_PER_QUESTION: usize = 4;

/// A question record as produced by a generation provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    #[serde(default)]
    pub id: String,
    #[validate(length(min = 1))]
    pub prompt: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[validate(length(min = 1))]
    pub correct_answer: String,
    #[validate(length(min = 1))]
    pub image_description: String,
    #[validate(length(min = 1))]
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passage: Option<String>,
}

impl QuestionDraft {
    fn trimmed(self) -> Self {
        Self {
            id: self.id.trim().to_string(),
            prompt: self.prompt.trim().to_string(),
            options: self.options.iter().map(|o| o.trim().to_string()).collect(),
            correct_answer: self.correct_answer.trim().to_string(),
            image_description: self.image_description.trim().to_string(),
            explanation: self.explanation.trim().to_string(),
            passage: self
                .passage
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
        }
    }
}

/// One validated quiz item. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Question {
    id: String,
    category: Category,
    prompt: String,
    options: Vec<String>,
    correct_answer: String,
    image_description: String,
    explanation: String,
    passage: Option<String>,
}

impl Question {
    /// Validate a provider record, repairing what can be repaired.
    ///
    /// Repairs: surrounding whitespace is trimmed everywhere, an answer key
    /// that leniently matches exactly one option is replaced by that option,
    /// and a passage on a non-comprehension category is dropped. The id is
    /// kept as is, possibly empty; batch assembly makes ids unique.
    pub fn from_draft(category: Category, draft: QuestionDraft) -> Result<Self, MalformedQuestion> {
        let mut draft = draft.trimmed();

        if let Err(errors) = draft.validate() {
            let mut fields: Vec<String> = errors
                .field_errors()
                .keys()
                .map(|field| field.to_string())
                .collect();
            fields.sort();
            return Err(MalformedQuestion::MissingField {
                id: draft.id,
                field: fields.into_iter().next().unwrap_or_default(),
            });
        }

        if draft.options.len() != OPTIONS_PER_QUESTION {
            return Err(MalformedQuestion::OptionCount {
                id: draft.id,
                count: draft.options.len(),
            });
        }

        let mut seen = HashSet::new();
        for option in &draft.options {
            if option.is_empty() {
                return Err(MalformedQuestion::MissingField {
                    id: draft.id,
                    field: "options".to_string(),
                });
            }
            if !seen.insert(option.as_str()) {
                return Err(MalformedQuestion::DuplicateOption {
                    id: draft.id.clone(),
                    option: option.clone(),
                });
            }
        }

        if !draft.options.contains(&draft.correct_answer) {
            match find_lenient_match(&draft.correct_answer, &draft.options) {
                Some(option) => draft.correct_answer = option.clone(),
                None => {
                    return Err(MalformedQuestion::UnknownAnswer {
                        id: draft.id,
                        answer: draft.correct_answer,
                    });
                }
            }
        }

        let passage = draft.passage.filter(|_| category.is_comprehension());

        Ok(Self {
            id: draft.id,
            category,
            prompt: draft.prompt,
            options: draft.options,
            correct_answer: draft.correct_answer,
            image_description: draft.image_description,
            explanation: draft.explanation,
            passage,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub const fn category(&self) -> Category {
        self.category
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// The four options, in display order.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_answer(&self) -> &str {
        &self.correct_answer
    }

    pub fn image_description(&self) -> &str {
        &self.image_description
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    pub fn passage(&self) -> Option<&str> {
        self.passage.as_deref()
    }

    /// Exact comparison against the answer key.
    pub fn is_correct(&self, option: &str) -> bool {
        self.correct_answer == option
    }

    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }
}

/// Outcome of validating a whole provider batch.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Accepted questions, in provider order, capped at [`QUESTIONS_PER_QUIZ`].
    pub questions: Vec<Question>,
    /// Records that could not be repaired.
    pub rejected: Vec<MalformedQuestion>,
}

impl BatchReport {
    /// Validate every draft and assemble the session's question list.
    ///
    /// Empty or repeated ids are replaced by a positional `q{n}` id so ids stay
    /// unique within the session.
    pub fn from_drafts(category: Category, drafts: Vec<QuestionDraft>) -> Self {
        let mut report = Self::default();
        let mut ids = HashSet::new();

        for draft in drafts {
            if report.questions.len() == QUESTIONS_PER_QUIZ {
                break;
            }

            match Question::from_draft(category, draft) {
                Ok(mut question) => {
                    if question.id.is_empty() || ids.contains(&question.id) {
                        let mut n = report.questions.len() + 1;
                        while ids.contains(&format!("q{n}")) {
                            n += 1;
                        }
                        question.id = format!("q{n}");
                    }
                    ids.insert(question.id.clone());
                    report.questions.push(question);
                }
                Err(reason) => report.rejected.push(reason),
            }
        }

        report
    }
}
