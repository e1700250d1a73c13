use thiserror::Error;

/// Caller bugs detected when seeding mentions
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PreconditionViolation {
    #[error("mention `{name}` at {start}..{end} exceeds text length {text_len}")]
    OutOfBounds {
        name: String,
        start: usize,
        end: usize,
        text_len: usize,
    },

    #[error("mention `{name}` at {start}..{end} overlaps mention `{other}`")]
    Overlap {
        name: String,
        start: usize,
        end: usize,
        other: String,
    },
}

/// Engine error
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MentionError {
    #[error("Precondition violated: {0}")]
    PreconditionViolation(#[from] PreconditionViolation),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Engine result
pub type MentionResult<T> = Result<T, MentionError>;
