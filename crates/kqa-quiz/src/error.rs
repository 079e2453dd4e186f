use thiserror::Error;

/// A transition was requested in a state that does not allow it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("cannot {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: &'static str,
    },
    #[error("no quiz is in progress")]
    NotActive,
}

/// Why a provider record was refused at the consumption boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedQuestion {
    #[error("question '{id}' has an empty {field}")]
    MissingField { id: String, field: String },
    #[error("question '{id}' has {count} options, expected 4")]
    OptionCount { id: String, count: usize },
    #[error("question '{id}' repeats the option '{option}'")]
    DuplicateOption { id: String, option: String },
    #[error("question '{id}' has answer '{answer}' which is not one of its options")]
    UnknownAnswer { id: String, answer: String },
}
