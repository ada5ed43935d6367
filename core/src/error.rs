use thiserror::Error;

pub type Result<T, E = LighterError> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum LighterError {
    #[error("Invalid credentials")]
    Auth,

    #[error("Invalid or expired session")]
    InvalidSession,

    #[error("Food not found: '{0}'")]
    UnknownFood(String),

    #[error("{0}")]
    Validation(String),

    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

impl LighterError {
    pub(crate) fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
