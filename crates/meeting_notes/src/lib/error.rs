#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot connect to Ollama: {0}")]
    Connection(String),
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("No content in model response")]
    EmptyResponse,
    #[error("Unrecognized model descriptor: {0}")]
    UnrecognizedModel(String),
    #[error("Empty transcript")]
    EmptyTranscript,
    #[error("Invalid Ollama base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl Error {
    /// Wraps a reqwest error, singling out failures to reach the runtime at all
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Error::Connection(err.to_string())
        } else {
            Error::Request(err)
        }
    }

    pub fn is_connection(&self) -> bool {
        matches!(self, Error::Connection(_))
    }
}
