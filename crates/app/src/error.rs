use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("invalid settings: {0}")]
    Settings(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Engine(#[from] engine::EngineError),
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error(transparent)]
    Input(#[from] InputError),
}

impl AppError {
    /// The terminal itself failed, the shell cannot go on.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AppError::Io(_))
    }
}

/// Problems with a single line typed at a prompt.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("end of input")]
    EndOfInput,
    #[error("\"{0}\" is not a number")]
    NotANumber(String),
    #[error("{0} is not one of the listed choices")]
    OutOfRange(usize),
    #[error("{0}")]
    Invalid(String),
}
