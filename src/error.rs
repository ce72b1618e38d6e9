use thiserror::Error;

#[derive(Debug, Error)]
pub enum ActionError {
    #[error("http request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("no http client configured for {0}")]
    MissingClient(&'static str),
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("action queue is full")]
    QueueFull,
    #[error("action worker has stopped")]
    WorkerGone,
    #[error("no catalog entry named '{0}'")]
    UnknownEntry(String),
}
