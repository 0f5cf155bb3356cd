use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadinessError {
    #[error("not initialized: run 'readiness init'")]
    NotInitialized,

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("answer '{answer}' is not an option of question {question}")]
    InvalidAnswer { question: u32, answer: String },

    #[error("assessment not found: {0}")]
    AssessmentNotFound(String),

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("email already registered: {0}")]
    UserExists(String),

    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("invalid assessment state: {0}")]
    InvalidState(String),

    #[error("invalid category: {0}")]
    InvalidCategory(String),

    #[error("store error: {0}")]
    Store(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReadinessError>;
