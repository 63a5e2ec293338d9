use thiserror::Error;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned {status} for {url}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("malformed aircraft.json: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("no aircraft in response")]
    NoAircraft,
}
