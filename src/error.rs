use std::path::PathBuf;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("missing session credential, set STEAM_LOGIN_SECURE or pass --login-secure")]
    MissingCredential,

    #[error("invalid value for header {name:?}")]
    InvalidHeader {
        name: String,
        #[source]
        source: reqwest::header::InvalidHeaderValue,
    },

    #[error("cant reach {url}, last status {status}")]
    UnreachableEndpoint {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("sending request to {url}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed response from {url}")]
    MalformedResponse {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("search request unsuccessful: {payload}")]
    SearchRequestFailed { payload: serde_json::Value },

    #[error("search did not finish after {pages} pages")]
    PaginationLimit { pages: usize },

    #[error("invalid timestamp {raw:?}")]
    InvalidTimestamp {
        raw: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("invalid {field}: {value}")]
    InvalidField { field: &'static str, value: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("reading config {path:?}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("io error on {path:?}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("writing csv")]
    Csv(#[from] csv::Error),
}
