use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to load models ({status})")]
    Status { status: u16 },

    #[error("Failed to decode model catalog: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("OpenRouter model catalog empty")]
    Empty,

    #[error("Invalid catalog URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Model catalog hydration cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, CatalogError>;
