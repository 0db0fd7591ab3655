//! Upstream game and jackpot feeds.

use std::future::Future;

use crate::lobby::catalog::Game;
use crate::lobby::jackpot::JackpotEntry;

pub mod http;

pub use self::http::HttpFeed;

#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("invalid feed url: {0}")]
    Url(#[from] url::ParseError),
    #[error("request to {url} failed")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} responded with {status}")]
    Status { url: String, status: reqwest::StatusCode },
    #[error("invalid payload from {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of the catalog and jackpot data a lobby session reads from.
pub trait LobbyFeed: Send + Sync + 'static {
    fn games(&self) -> impl Future<Output = Result<Vec<Game>, FeedError>> + Send;

    fn jackpots(&self) -> impl Future<Output = Result<Vec<JackpotEntry>, FeedError>> + Send;
}
