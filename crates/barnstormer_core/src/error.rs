use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown panel: {0}")]
    UnknownPanel(String),

    #[error("unknown chat dock mode: {0}")]
    UnknownDockMode(String),

    #[error("unknown agent: {0}")]
    UnknownAgent(String),

    #[error("message is empty")]
    EmptyMessage,
}

pub type Result<T> = std::result::Result<T, CoreError>;
