use thiserror::Error;

pub type Result<T> = std::result::Result<T, O2tvError>;

#[derive(Debug, Error)]
pub enum O2tvError {
    #[error("failed building reqwest client: {0}")]
    BuildClient(#[source] reqwest::Error),

    #[error("HTTP request failed while {context}: {source}")]
    Request {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{context} returned {status}")]
    HttpStatus {
        context: String,
        status: reqwest::StatusCode,
    },

    #[error("failed to read response body while {context}: {source}")]
    ResponseBody {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("network failure: gave up on {url} after {attempts} attempts")]
    NetworkExhausted { url: String, attempts: usize },

    #[error("io error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode JSON while {context}: {source}")]
    Json {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("no catalog entries matched")]
    NoEntries,

    #[error("unrecognized video format: {0} (expected mp4, 3gp, mp3 or HD)")]
    UnknownFormat(String),

    #[error("{0}")]
    Message(String),
}
