use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Generic message shown for any failed query; the cause is only logged.
pub const GENERIC_FAILURE_MESSAGE: &str = "Failed to fetch data. Please try again later.";

/// Startup failures of the dashboard binary.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failure of one outbound call to a data provider.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Missing configuration: {0} is not set")]
    MissingConfig(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider error: {0}")]
    Provider(#[from] ethers::providers::ProviderError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("API error: {0}")]
    Api(String),
}

/// Failure of a whole position query.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("empty wallet address")]
    EmptyAddress,

    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl QueryError {
    /// Text shown to the user. Fetch failures collapse into one generic message.
    pub fn user_message(&self) -> &'static str {
        match self {
            QueryError::EmptyAddress => "Please enter a valid wallet address.",
            QueryError::InvalidAddress(_) => {
                "Invalid wallet address. Please enter a valid Ethereum address."
            }
            QueryError::Fetch(_) => GENERIC_FAILURE_MESSAGE,
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, QueryError::EmptyAddress | QueryError::InvalidAddress(_))
    }
}
