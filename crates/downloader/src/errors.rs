use thiserror::Error;

pub type Result<T> = std::result::Result<T, DownloaderError>;

#[derive(Debug, Error)]
pub enum DownloaderError {
    #[error("failed building reqwest client: {0}")]
    BuildClient(#[source] reqwest::Error),

    #[error("http request failed while {context}: {source}")]
    Request {
        context: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("io error while {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no file server answered after {attempts} connection attempts")]
    Exhausted { attempts: usize },

    #[error("stream ended early: got {downloaded} of {total} bytes")]
    Incomplete { downloaded: u64, total: u64 },
}
