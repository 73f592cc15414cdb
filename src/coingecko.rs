mod service;

use async_trait::async_trait;
use std::error::Error as _;
use thiserror::Error;

use crate::range::Range;
use crate::series::Series;
pub use service::CoingeckoService;
pub use service::DEFAULT_URL;

/// Message used when an error carries no text of its own.
pub const GENERIC_ERROR: &str = "An unknown error occurred, please try again later";

#[derive(Error, Debug, PartialEq)]
pub enum FetchError {
    /// Network failure, non-2xx status or malformed payload
    #[error("{0}")]
    Transport(String),
    /// Well-formed response without any price samples
    #[error("Unable to retrieve price data, please try again later")]
    EmptyResult,
}

impl FetchError {
    /// Transport error with given message, or a generic one if blank.
    pub fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::Transport(GENERIC_ERROR.to_owned())
        } else {
            Self::Transport(message)
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.source() {
            Some(source) => Self::transport(format!("{e}: {source}")),
            None => Self::transport(e.to_string()),
        }
    }
}

/// Anything able to produce a price series for a range.
#[async_trait]
pub trait PriceSource: Send + Sync + 'static {
    async fn fetch(&self, range: Range) -> Result<Series, FetchError>;
}

#[async_trait]
impl PriceSource for CoingeckoService {
    async fn fetch(&self, range: Range) -> Result<Series, FetchError> {
        self.fetch_series(range).await
    }
}
