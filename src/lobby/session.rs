//! Lobby session lifecycle: mount loads the catalog and starts polling,
//! unmount cancels the poller.

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::feed::LobbyFeed;
use crate::lobby::catalog;
use crate::lobby::category::CategoryMapping;
use crate::lobby::poller::{self, PollHandle, MIN_POLL_INTERVAL};
use crate::lobby::state::{LobbyState, SharedLobby};
use crate::lobby::LobbyError;

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct LobbyOptions {
    pub poll_interval: Duration,
    pub mapping: CategoryMapping,
}

impl Default for LobbyOptions {
    fn default() -> Self {
        Self { poll_interval: DEFAULT_POLL_INTERVAL, mapping: CategoryMapping::default() }
    }
}

pub struct LobbySession<F: LobbyFeed> {
    feed: Arc<F>,
    state: SharedLobby,
    poll_interval: Duration,
    poller: Option<PollHandle>,
}

impl<F: LobbyFeed> LobbySession<F> {
    pub fn new(feed: Arc<F>, options: LobbyOptions) -> Self {
        Self {
            feed,
            state: LobbyState::shared(options.mapping),
            poll_interval: options.poll_interval.max(MIN_POLL_INTERVAL),
            poller: None,
        }
    }

    /// Shared handle to the session state, for readers such as HTTP handlers.
    pub fn state(&self) -> SharedLobby { self.state.clone() }

    pub fn is_polling(&self) -> bool {
        self.poller.as_ref().is_some_and(PollHandle::is_running)
    }

    /// Load the catalog and the first jackpot snapshot, publish both at once,
    /// then start polling.
    ///
    /// A catalog failure puts the session back to `Uninitialized` and is returned
    /// to the caller; nothing is retried. Dropping the future before it resolves
    /// also leaves the session `Uninitialized`, so mounting can be tried again.
    pub async fn mount(&mut self) -> Result<(), LobbyError> {
        let seq = {
            let mut state = self.state.lock();
            state.begin_loading()?;
            state.next_tick()
        };
        let _loading = LoadingGuard(&self.state);

        let (loaded, jackpots) = tokio::join!(
            catalog::load(self.feed.as_ref()),
            poller::fetch_jackpots(self.feed.as_ref(), seq),
        );

        let catalog = loaded?;

        {
            let mut state = self.state.lock();
            if let Some(entries) = jackpots {
                state.apply_jackpots(seq, entries);
            }
            state.finish_loading(catalog);
            info!(
                active_category = ?state.active_category(),
                displayed = state.displayed().len(),
                "lobby ready"
            );
        }

        self.poller = Some(poller::start_polling(self.feed.clone(), self.state.clone(), self.poll_interval));
        Ok(())
    }

    /// Stop polling and move the shared state to `Unmounted`.
    pub async fn unmount(mut self) {
        match self.poller.take() {
            Some(poller) => {
                poller.stop().await;
                info!("lobby unmounted");
            }
            None => warn!("unmounting a lobby that never finished mounting"),
        }
        self.state.lock().mark_unmounted();
    }
}

/// Puts a session still `Loading` back to `Uninitialized` when `mount` exits early.
struct LoadingGuard<'a>(&'a SharedLobby);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.lock().abort_loading();
    }
}
