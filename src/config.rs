//! Configuration from environment variables (port, feed location, polling).

use std::{env, net::{Ipv4Addr, SocketAddr}, time::Duration};

use crate::lobby::category::CategoryMapping;
use crate::lobby::poller::MIN_POLL_INTERVAL;
use crate::lobby::session::{LobbyOptions, DEFAULT_POLL_INTERVAL};

pub const DEFAULT_FEED_BASE_URL: &str = "http://stage.whgstage.com/front-end-test";

/// Socket address to bind the server to.
///
/// Reads the `PORT` env var or defaults to 8080, binds to 0.0.0.0.
pub fn server_addr() -> SocketAddr {
    let port = env::var("PORT")
        .ok()
        .and_then(|v| v.parse::<u16>().ok())
        .unwrap_or(8080);
    SocketAddr::from((Ipv4Addr::UNSPECIFIED, port))
}

/// Directory holding `games.php` and `jackpots.php` (`LOBBY_FEED_BASE_URL`).
pub fn feed_base_url() -> String {
    env::var("LOBBY_FEED_BASE_URL")
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FEED_BASE_URL.to_string())
}

/// `LOBBY_FEED_TIMEOUT_MS`, default 10s.
pub fn feed_timeout() -> Duration {
    parse_millis(env::var("LOBBY_FEED_TIMEOUT_MS").ok()).unwrap_or(Duration::from_secs(10))
}

/// `LOBBY_POLL_INTERVAL_MS`, default 5s, never below 100ms.
pub fn poll_interval() -> Duration {
    poll_interval_from(env::var("LOBBY_POLL_INTERVAL_MS").ok())
}

/// Tags grouped under `other`, from the comma separated `LOBBY_OTHER_CATEGORIES`.
/// Set but empty means no tag is grouped.
pub fn category_mapping() -> CategoryMapping {
    mapping_from(env::var("LOBBY_OTHER_CATEGORIES").ok())
}

pub fn lobby_options() -> LobbyOptions {
    LobbyOptions { poll_interval: poll_interval(), mapping: category_mapping() }
}

fn parse_millis(raw: Option<String>) -> Option<Duration> {
    raw.and_then(|v| v.trim().parse::<u64>().ok()).map(Duration::from_millis)
}

fn poll_interval_from(raw: Option<String>) -> Duration {
    parse_millis(raw).unwrap_or(DEFAULT_POLL_INTERVAL).max(MIN_POLL_INTERVAL)
}

fn mapping_from(raw: Option<String>) -> CategoryMapping {
    raw.map(|list| parse_tag_list(&list)).unwrap_or_default()
}

fn parse_tag_list(list: &str) -> CategoryMapping {
    CategoryMapping::new(list.split(','))
}
