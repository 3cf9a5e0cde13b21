use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("chat panel not found after {waited_secs} seconds")]
    ChatPanelTimeout { waited_secs: u64 },

    #[error("config parse error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
