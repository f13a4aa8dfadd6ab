use std::result::Result as StdResult;

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("failed to build http client:\n{0}")]
    BuildHttpClient(reqwest::Error),
    #[error("failed to execute http request:\n{0}")]
    HttpRequest(reqwest::Error),
    #[error("error: rpc response status is {0}. payload:\n{1:?}")]
    RpcResponseStatus(u16, Option<String>),
    #[error("failed to read rpc response body:\n{0}")]
    ReadResponseBody(reqwest::Error),
    #[error("failed to parse rpc response json:\n{0}")]
    RpcResponseParseJson(serde_json::Error),
    #[error("method {method} can't be called with {unit}")]
    UnitMismatch { method: &'static str, unit: String },
    #[error("handling of {0} panicked")]
    UnitPanicked(String),
    #[error("invalid block range: start block {0} is bigger than end block {1}")]
    InvalidRange(u64, u64),
    #[error("concurrency must be between 1 and {max}, got {got}")]
    InvalidConcurrency { got: usize, max: usize },
    #[error("{0} must be at least 1")]
    InvalidUnitSize(&'static str),
    #[error("no successful requests were recorded")]
    NoSamples,
    #[error("failed to create latency histogram:\n{0:?}")]
    CreateHistogram(hdrhistogram::CreationError),
    #[error("failed to encode metrics:\n{0}")]
    EncodeMetrics(std::fmt::Error),
}

impl Error {
    /// Whether the error comes from talking to the rpc endpoint.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Error::HttpRequest(_)
                | Error::RpcResponseStatus(..)
                | Error::ReadResponseBody(_)
                | Error::RpcResponseParseJson(_)
        )
    }
}

pub type Result<T> = StdResult<T, Error>;
