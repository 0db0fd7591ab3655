//! Jackpot feed entries and the per-session book of last known amounts.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::lobby::money::format_gbp;

/// One row of the jackpot feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JackpotEntry {
    #[serde(rename = "game")]
    pub game_id: String,
    pub amount: f64,
}

impl JackpotEntry {
    pub fn new(game_id: impl Into<String>, amount: f64) -> Self {
        Self { game_id: game_id.into(), amount }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Jackpot {
    pub amount: f64,
    pub formatted: String,
}

impl Jackpot {
    fn from_amount(amount: f64) -> Self {
        Self { amount, formatted: format_gbp(amount) }
    }
}

/// Sequence number taken when a fetch starts. Later ticks compare greater.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickSeq(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Merged { updated: usize },
    /// A newer tick was already applied; the response was dropped.
    Stale { seq: TickSeq, last_applied: TickSeq },
}

/// Last known jackpot per game id, shared by the poller and the selector.
///
/// Entries are never cleared: games missing from a tick keep their previous value.
#[derive(Debug, Default)]
pub struct JackpotBook {
    by_game: HashMap<String, Jackpot>,
    last_applied: Option<TickSeq>,
}

impl JackpotBook {
    pub fn new() -> Self { Self::default() }

    /// Merge one tick's entries unless a newer tick already landed.
    ///
    /// When a game appears more than once in `entries`, the first row wins.
    pub fn apply(&mut self, seq: TickSeq, entries: Vec<JackpotEntry>) -> Applied {
        if let Some(last_applied) = self.last_applied {
            if seq <= last_applied {
                return Applied::Stale { seq, last_applied };
            }
        }
        self.last_applied = Some(seq);

        let mut seen = std::collections::HashSet::with_capacity(entries.len());
        let mut updated = 0;
        for entry in entries {
            if !seen.insert(entry.game_id.clone()) {
                continue;
            }
            self.by_game.insert(entry.game_id, Jackpot::from_amount(entry.amount));
            updated += 1;
        }
        Applied::Merged { updated }
    }

    pub fn get(&self, game_id: &str) -> Option<&Jackpot> {
        self.by_game.get(game_id)
    }

    pub fn last_applied(&self) -> Option<TickSeq> { self.last_applied }

    pub fn len(&self) -> usize { self.by_game.len() }

    pub fn is_empty(&self) -> bool { self.by_game.is_empty() }
}
