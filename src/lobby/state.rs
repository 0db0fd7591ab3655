//! Per-session lobby state: phase, active category, displayed games and jackpot book.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;

use crate::lobby::catalog::Catalog;
use crate::lobby::category::CategoryMapping;
use crate::lobby::jackpot::{Applied, JackpotBook, JackpotEntry, TickSeq};
use crate::lobby::selection::{refresh_jackpots, select, DisplayGame};
use crate::lobby::LobbyError;

pub type SharedLobby = Arc<Mutex<LobbyState>>;

#[derive(Debug)]
pub struct Ready {
    catalog: Catalog,
    active: Option<String>,
    displayed: Vec<DisplayGame>,
}

#[derive(Debug)]
pub enum Phase {
    Uninitialized,
    Loading,
    Ready(Ready),
    /// Terminal: the session was unmounted and its poller cancelled.
    Unmounted,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Uninitialized => "uninitialized",
            Phase::Loading => "loading",
            Phase::Ready(_) => "ready",
            Phase::Unmounted => "unmounted",
        }
    }
}

/// Snapshot handed to the HTTP layer.
#[derive(Debug, Clone, Serialize)]
pub struct LobbyView {
    pub phase: &'static str,
    pub categories: Vec<String>,
    pub active_category: Option<String>,
    pub games: Vec<DisplayGame>,
}

#[derive(Debug)]
pub struct LobbyState {
    phase: Phase,
    mapping: CategoryMapping,
    jackpots: JackpotBook,
    next_tick: u64,
}

impl LobbyState {
    pub fn new(mapping: CategoryMapping) -> Self {
        Self { phase: Phase::Uninitialized, mapping, jackpots: JackpotBook::new(), next_tick: 0 }
    }

    pub fn shared(mapping: CategoryMapping) -> SharedLobby {
        Arc::new(Mutex::new(Self::new(mapping)))
    }

    pub fn phase(&self) -> &Phase { &self.phase }

    pub fn begin_loading(&mut self) -> Result<(), LobbyError> {
        match self.phase {
            Phase::Uninitialized => {
                self.phase = Phase::Loading;
                Ok(())
            }
            Phase::Unmounted => Err(LobbyError::Unmounted),
            _ => Err(LobbyError::AlreadyMounted),
        }
    }

    pub fn abort_loading(&mut self) {
        if matches!(self.phase, Phase::Loading) {
            self.phase = Phase::Uninitialized;
        }
    }

    /// Leave the lobby for good; the catalog and displayed games are released.
    pub fn mark_unmounted(&mut self) {
        self.phase = Phase::Unmounted;
    }

    /// Enter `Ready` with the catalog's default category selected.
    pub fn finish_loading(&mut self, catalog: Catalog) {
        let active = catalog.default_category().map(str::to_string);
        let displayed = match &active {
            Some(category) => select(category, &catalog, &self.mapping, &self.jackpots),
            None => Vec::new(),
        };
        self.phase = Phase::Ready(Ready { catalog, active, displayed });
    }

    /// Reserve the sequence number for a jackpot fetch about to start.
    pub fn next_tick(&mut self) -> TickSeq {
        let seq = TickSeq(self.next_tick);
        self.next_tick += 1;
        seq
    }

    pub fn apply_jackpots(&mut self, seq: TickSeq, entries: Vec<JackpotEntry>) -> Applied {
        let applied = self.jackpots.apply(seq, entries);
        if let (Applied::Merged { .. }, Phase::Ready(ready)) = (&applied, &mut self.phase) {
            refresh_jackpots(&mut ready.displayed, &self.jackpots);
        }
        applied
    }

    pub fn select(&mut self, category: &str) -> Result<&[DisplayGame], LobbyError> {
        let Phase::Ready(ready) = &mut self.phase else {
            return Err(LobbyError::NotReady);
        };
        ready.displayed = select(category, &ready.catalog, &self.mapping, &self.jackpots);
        ready.active = Some(category.to_string());
        Ok(&ready.displayed)
    }

    pub fn active_category(&self) -> Option<&str> {
        match &self.phase {
            Phase::Ready(ready) => ready.active.as_deref(),
            _ => None,
        }
    }

    pub fn displayed(&self) -> &[DisplayGame] {
        match &self.phase {
            Phase::Ready(ready) => &ready.displayed,
            _ => &[],
        }
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        match &self.phase {
            Phase::Ready(ready) => Some(&ready.catalog),
            _ => None,
        }
    }

    pub fn tabs(&self) -> Vec<String> {
        self.catalog().map(|c| c.tabs(&self.mapping)).unwrap_or_default()
    }

    pub fn view(&self) -> LobbyView {
        LobbyView {
            phase: self.phase.name(),
            categories: self.tabs(),
            active_category: self.active_category().map(str::to_string),
            games: self.displayed().to_vec(),
        }
    }
}
