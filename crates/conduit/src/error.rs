use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    #[error("conduit {method} returned HTTP {status}: {body}")]
    Status {
        method: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("conduit {method} failed: {code}: {info}")]
    Api {
        method: &'static str,
        code: String,
        info: String,
    },

    #[error("conduit {method} returned no result")]
    MissingResult { method: &'static str },

    #[error("no revision found for D{id}")]
    RevisionNotFound { id: u64 },

    #[error("reference id `{id}` is not a usable numeric id")]
    InvalidId { id: String },
}

pub type Result<T> = std::result::Result<T, Error>;
