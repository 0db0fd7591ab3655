//! Category/jackpot reconciliation for the game lobby.

pub mod catalog;
pub mod category;
pub mod jackpot;
pub mod money;
pub mod poller;
pub mod selection;
pub mod session;
pub mod state;

use crate::feed::FeedError;

#[derive(thiserror::Error, Debug)]
pub enum LobbyError {
    #[error("catalog unavailable: {0}")]
    Feed(#[from] FeedError),
    #[error("lobby already mounted")]
    AlreadyMounted,
    #[error("lobby has been unmounted")]
    Unmounted,
    #[error("lobby is not ready")]
    NotReady,
}
