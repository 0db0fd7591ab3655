//! Game lobby service: catalog categories, jackpot polling and category selection.

pub mod config;
pub mod feed;
pub mod http;
pub mod lobby;
pub mod telemetry;

#[cfg(test)]
mod test_helpers;
