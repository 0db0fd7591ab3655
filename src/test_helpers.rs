//! In-memory feed for driving sessions and pollers in tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::feed::{FeedError, LobbyFeed};
use crate::lobby::catalog::Game;
use crate::lobby::jackpot::JackpotEntry;

pub fn game(id: &str, tags: &[&str]) -> Game {
    Game {
        id: id.to_string(),
        name: format!("{id} game"),
        image: format!("https://cdn.example.com/{id}.jpg"),
        categories: tags.iter().map(|t| t.to_string()).collect(),
    }
}

fn unavailable(path: &str) -> FeedError {
    FeedError::Status {
        url: format!("scripted://{path}"),
        status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
    }
}

#[derive(Debug, Clone)]
pub enum JackpotReply {
    Entries(Vec<JackpotEntry>),
    Delayed(Duration, Vec<JackpotEntry>),
    Fail,
}

impl JackpotReply {
    pub fn entries(rows: &[(&str, f64)]) -> Self {
        JackpotReply::Entries(Self::rows(rows))
    }

    pub fn delayed(delay: Duration, rows: &[(&str, f64)]) -> Self {
        JackpotReply::Delayed(delay, Self::rows(rows))
    }

    fn rows(rows: &[(&str, f64)]) -> Vec<JackpotEntry> {
        rows.iter().map(|(id, amount)| JackpotEntry::new(*id, *amount)).collect()
    }
}

/// Serves a fixed catalog and a queue of jackpot replies, counting every call.
/// Once the queue is drained each jackpot call returns an empty list.
pub struct ScriptedFeed {
    games: Option<Vec<Game>>,
    catalog_delay: Option<Duration>,
    jackpots: Mutex<VecDeque<JackpotReply>>,
    game_calls: AtomicUsize,
    jackpot_calls: AtomicUsize,
}

impl ScriptedFeed {
    pub fn new(games: Vec<Game>) -> Self {
        Self {
            games: Some(games),
            catalog_delay: None,
            jackpots: Mutex::new(VecDeque::new()),
            game_calls: AtomicUsize::new(0),
            jackpot_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing_catalog() -> Self {
        Self { games: None, ..Self::new(Vec::new()) }
    }

    /// Hold every catalog reply back by `delay`.
    pub fn with_catalog_delay(self, delay: Duration) -> Self {
        Self { catalog_delay: Some(delay), ..self }
    }

    pub fn push_jackpots(&self, reply: JackpotReply) {
        self.jackpots.lock().push_back(reply);
    }

    pub fn game_calls(&self) -> usize { self.game_calls.load(Ordering::SeqCst) }

    pub fn jackpot_calls(&self) -> usize { self.jackpot_calls.load(Ordering::SeqCst) }
}

impl LobbyFeed for ScriptedFeed {
    async fn games(&self) -> Result<Vec<Game>, FeedError> {
        self.game_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.catalog_delay {
            tokio::time::sleep(delay).await;
        }
        self.games.clone().ok_or_else(|| unavailable("games.php"))
    }

    async fn jackpots(&self) -> Result<Vec<JackpotEntry>, FeedError> {
        self.jackpot_calls.fetch_add(1, Ordering::SeqCst);
        let reply = self.jackpots.lock().pop_front();
        match reply {
            None => Ok(Vec::new()),
            Some(JackpotReply::Entries(entries)) => Ok(entries),
            Some(JackpotReply::Delayed(delay, entries)) => {
                tokio::time::sleep(delay).await;
                Ok(entries)
            }
            Some(JackpotReply::Fail) => Err(unavailable("jackpots.php")),
        }
    }
}
