//! reqwest-backed feed talking to the `games.php` / `jackpots.php` endpoints.

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use url::Url;

use crate::feed::{FeedError, LobbyFeed};
use crate::lobby::catalog::Game;
use crate::lobby::jackpot::JackpotEntry;

const GAMES_PATH: &str = "games.php";
const JACKPOTS_PATH: &str = "jackpots.php";

#[derive(Clone)]
pub struct HttpFeed {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpFeed {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FeedError> {
        // Url::join replaces the last segment unless the base ends with '/'.
        let mut base = base_url.trim().trim_end_matches('/').to_string();
        base.push('/');
        let base_url = Url::parse(&base)?;
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| FeedError::Request { url: base.clone(), source })?;
        Ok(Self { base_url, http })
    }

    pub fn endpoint(&self, path: &str) -> Result<Url, FeedError> {
        Ok(self.base_url.join(path)?)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FeedError> {
        let url = self.endpoint(path)?;
        let res = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FeedError::Request { url: url.to_string(), source })?;
        let status = res.status();
        if !status.is_success() {
            return Err(FeedError::Status { url: url.to_string(), status });
        }
        let bytes = res
            .bytes()
            .await
            .map_err(|source| FeedError::Request { url: url.to_string(), source })?;
        serde_json::from_slice(&bytes).map_err(|source| FeedError::Decode { url: url.to_string(), source })
    }
}

impl LobbyFeed for HttpFeed {
    async fn games(&self) -> Result<Vec<Game>, FeedError> {
        self.get_json(GAMES_PATH).await
    }

    async fn jackpots(&self) -> Result<Vec<JackpotEntry>, FeedError> {
        self.get_json(JACKPOTS_PATH).await
    }
}

impl fmt::Display for HttpFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.base_url)
    }
}
