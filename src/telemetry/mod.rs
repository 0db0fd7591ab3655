//! Tracing setup for the lobby service.

use tracing_subscriber::{fmt, EnvFilter, prelude::*};

const DEFAULT_DIRECTIVES: &str = "info,jackpot_lobby=info,tower_http=info,axum=info";

/// Install the global subscriber. `RUST_LOG` overrides the default directives,
/// e.g. `RUST_LOG=jackpot_lobby::lobby::poller=debug` to watch every tick.
pub fn init() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let fmt_layer = fmt::layer()
        .with_target(true)
        .compact();

    if tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        tracing::debug!("tracing subscriber already installed");
    }
}
