//! Recurring jackpot fetches merged into the shared lobby state.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::{JoinHandle, JoinSet};
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::feed::LobbyFeed;
use crate::lobby::jackpot::{Applied, JackpotEntry, TickSeq};
use crate::lobby::state::SharedLobby;

/// Shortest period a poller will tick at; smaller periods are raised to it.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Owns the running poll task. Stopping (or dropping) cancels it exactly once.
#[derive(Debug)]
pub struct PollHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn is_running(&self) -> bool {
        !self.cancel.is_cancelled() && self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel the poller and wait until its task and in-flight fetches are gone.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(?err, "jackpot poller ended abnormally");
            }
        }
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Fetch the jackpot feed, degrading any failure to "no updates".
pub async fn fetch_jackpots<F: LobbyFeed>(feed: &F, seq: TickSeq) -> Option<Vec<JackpotEntry>> {
    match feed.jackpots().await {
        Ok(entries) => Some(entries),
        Err(err) => {
            warn!(tick = seq.0, error = %err, "jackpot fetch failed; keeping last known amounts");
            None
        }
    }
}

/// Run one tick against `lobby` under the sequence number `seq` reserved when it fired.
pub async fn run_tick<F: LobbyFeed>(feed: &F, lobby: &SharedLobby, seq: TickSeq) {
    let Some(entries) = fetch_jackpots(feed, seq).await else { return };
    let received = entries.len();
    let applied = lobby.lock().apply_jackpots(seq, entries);
    match applied {
        Applied::Merged { updated } => debug!(tick = seq.0, received, updated, "jackpots merged"),
        Applied::Stale { last_applied, .. } => {
            debug!(tick = seq.0, last_applied = last_applied.0, "dropping late jackpot response")
        }
    }
}

/// Start polling every `period` (at least [`MIN_POLL_INTERVAL`]). The first
/// poll fires one period from now; the initial fetch belongs to mounting.
///
/// Slow fetches do not hold back the schedule, so ticks may overlap; the
/// sequence guard in the jackpot book keeps late responses from winning.
pub fn start_polling<F: LobbyFeed>(feed: Arc<F>, lobby: SharedLobby, period: Duration) -> PollHandle {
    let period = period.max(MIN_POLL_INTERVAL);
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let task = tokio::spawn(async move {
        let mut ticker = time::interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut in_flight = JoinSet::new();
        debug!(period_ms = period.as_millis() as u64, "jackpot poller started");

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = ticker.tick() => {
                    let seq = lobby.lock().next_tick();
                    let feed = feed.clone();
                    let lobby = lobby.clone();
                    in_flight.spawn(async move { run_tick(feed.as_ref(), &lobby, seq).await });
                }
                Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                    if let Err(err) = joined {
                        warn!(?err, "jackpot tick task failed");
                    }
                }
            }
        }

        in_flight.abort_all();
        while in_flight.join_next().await.is_some() {}
        debug!("jackpot poller stopped");
    });

    PollHandle { cancel, task: Some(task) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lobby::catalog::Catalog;
    use crate::lobby::category::CategoryMapping;
    use crate::lobby::state::LobbyState;
    use crate::test_helpers::{game, JackpotReply, ScriptedFeed};

    const PERIOD: Duration = Duration::from_secs(5);

    fn ready_lobby() -> SharedLobby {
        let lobby = LobbyState::shared(CategoryMapping::default());
        {
            let mut state = lobby.lock();
            state.begin_loading().unwrap();
            state.finish_loading(Catalog::new(vec![
                game("a", &["slots"]),
                game("b", &["slots"]),
            ]));
        }
        lobby
    }

    fn jackpot_of(lobby: &SharedLobby, id: &str) -> Option<String> {
        lobby
            .lock()
            .displayed()
            .iter()
            .find(|g| g.id == id)
            .and_then(|g| g.jackpot.clone())
    }

    #[tokio::test(start_paused = true)]
    async fn polls_on_every_period() {
        let feed = Arc::new(ScriptedFeed::new(Vec::new()));
        feed.push_jackpots(JackpotReply::entries(&[("a", 100.0)]));
        feed.push_jackpots(JackpotReply::entries(&[("a", 200.0)]));
        let lobby = ready_lobby();

        let handle = start_polling(feed.clone(), lobby.clone(), PERIOD);
        assert!(handle.is_running());
        time::sleep(PERIOD / 2).await;
        assert_eq!(feed.jackpot_calls(), 0);

        time::sleep(PERIOD).await;
        assert_eq!(feed.jackpot_calls(), 1);
        assert_eq!(jackpot_of(&lobby, "a").as_deref(), Some("£100"));

        time::sleep(PERIOD).await;
        assert_eq!(feed.jackpot_calls(), 2);
        assert_eq!(jackpot_of(&lobby, "a").as_deref(), Some("£200"));
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_keeps_previous_amounts_and_keeps_polling() {
        let feed = Arc::new(ScriptedFeed::new(Vec::new()));
        feed.push_jackpots(JackpotReply::entries(&[("a", 100.0), ("b", 5.0)]));
        feed.push_jackpots(JackpotReply::Fail);
        feed.push_jackpots(JackpotReply::entries(&[("b", 6.0)]));
        let lobby = ready_lobby();

        let handle = start_polling(feed.clone(), lobby.clone(), PERIOD);
        time::sleep(PERIOD * 2 + PERIOD / 2).await;
        assert_eq!(feed.jackpot_calls(), 2);
        assert_eq!(jackpot_of(&lobby, "a").as_deref(), Some("£100"));
        assert_eq!(jackpot_of(&lobby, "b").as_deref(), Some("£5"));

        time::sleep(PERIOD).await;
        assert_eq!(feed.jackpot_calls(), 3);
        assert_eq!(jackpot_of(&lobby, "a").as_deref(), Some("£100"));
        assert_eq!(jackpot_of(&lobby, "b").as_deref(), Some("£6"));
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn late_response_never_overwrites_a_newer_tick() {
        let feed = Arc::new(ScriptedFeed::new(Vec::new()));
        feed.push_jackpots(JackpotReply::delayed(PERIOD + PERIOD / 2, &[("a", 111.0)]));
        feed.push_jackpots(JackpotReply::entries(&[("a", 222.0)]));
        feed.push_jackpots(JackpotReply::Fail);
        let lobby = ready_lobby();

        let handle = start_polling(feed.clone(), lobby.clone(), PERIOD);
        // tick 1 starts at 5s and lands at 12.5s; tick 2 starts and lands at 10s
        time::sleep(PERIOD * 2 + PERIOD / 4).await;
        assert_eq!(jackpot_of(&lobby, "a").as_deref(), Some("£222"));

        time::sleep(PERIOD / 2).await;
        assert_eq!(feed.jackpot_calls(), 2);
        assert_eq!(jackpot_of(&lobby, "a").as_deref(), Some("£222"));
        handle.stop().await;
    }

    #[tokio::test(start_paused = true)]
    async fn stop_ends_all_feed_calls() {
        let feed = Arc::new(ScriptedFeed::new(Vec::new()));
        let lobby = ready_lobby();

        let handle = start_polling(feed.clone(), lobby.clone(), PERIOD);
        time::sleep(PERIOD + PERIOD / 2).await;
        assert_eq!(feed.jackpot_calls(), 1);

        handle.stop().await;
        time::sleep(PERIOD * 10).await;
        assert_eq!(feed.jackpot_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_handle_cancels_polling() {
        let feed = Arc::new(ScriptedFeed::new(Vec::new()));
        let lobby = ready_lobby();

        let handle = start_polling(feed.clone(), lobby.clone(), PERIOD);
        drop(handle);
        time::sleep(PERIOD * 4).await;
        assert_eq!(feed.jackpot_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn stop_aborts_in_flight_fetches() {
        let feed = Arc::new(ScriptedFeed::new(Vec::new()));
        feed.push_jackpots(JackpotReply::delayed(PERIOD * 3, &[("a", 999.0)]));
        let lobby = ready_lobby();

        let handle = start_polling(feed.clone(), lobby.clone(), PERIOD);
        time::sleep(PERIOD + PERIOD / 2).await;
        assert_eq!(feed.jackpot_calls(), 1);

        handle.stop().await;
        time::sleep(PERIOD * 5).await;
        assert_eq!(jackpot_of(&lobby, "a"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_period_polls_at_the_floor() {
        let feed = Arc::new(ScriptedFeed::new(Vec::new()));
        let lobby = ready_lobby();

        let handle = start_polling(feed.clone(), lobby.clone(), Duration::ZERO);
        time::sleep(MIN_POLL_INTERVAL * 2 + MIN_POLL_INTERVAL / 2).await;
        assert!(handle.is_running());
        assert_eq!(feed.jackpot_calls(), 2);
        handle.stop().await;
    }

    #[tokio::test]
    async fn ticks_are_ordered_by_reservation_not_completion() {
        let feed = ScriptedFeed::new(Vec::new());
        feed.push_jackpots(JackpotReply::entries(&[("a", 222.0)]));
        feed.push_jackpots(JackpotReply::entries(&[("a", 111.0), ("b", 5.0)]));
        let lobby = ready_lobby();
        let (first, second) = {
            let mut state = lobby.lock();
            (state.next_tick(), state.next_tick())
        };

        run_tick(&feed, &lobby, second).await;
        run_tick(&feed, &lobby, first).await;
        assert_eq!(feed.jackpot_calls(), 2);
        assert_eq!(jackpot_of(&lobby, "a").as_deref(), Some("£222"));
        assert_eq!(jackpot_of(&lobby, "b"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn sequence_is_reserved_when_the_tick_fires() {
        let feed = Arc::new(ScriptedFeed::new(Vec::new()));
        feed.push_jackpots(JackpotReply::delayed(PERIOD * 10, &[("a", 1.0)]));
        let lobby = ready_lobby();

        let handle = start_polling(feed.clone(), lobby.clone(), PERIOD);
        time::sleep(PERIOD + PERIOD / 2).await;
        // the first tick is still waiting on the feed but already owns seq 0
        assert_eq!(lobby.lock().next_tick(), TickSeq(1));
        handle.stop().await;
    }
}
