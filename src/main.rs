use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};

use jackpot_lobby::config;
use jackpot_lobby::feed::HttpFeed;
use jackpot_lobby::http::routes::{self, AppState};
use jackpot_lobby::lobby::session::LobbySession;
use jackpot_lobby::telemetry;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let base_url = config::feed_base_url();
    let feed = HttpFeed::new(&base_url, config::feed_timeout())
        .with_context(|| format!("invalid LOBBY_FEED_BASE_URL {base_url:?}"))?;
    let options = config::lobby_options();
    info!(feed = %feed, poll_ms = options.poll_interval.as_millis() as u64, "starting lobby");

    let mut session = LobbySession::new(Arc::new(feed), options);
    if let Err(err) = session.mount().await {
        // Serve the empty lobby; clients see phase "uninitialized".
        error!(error = %err, "lobby failed to load");
    }

    let app = routes::router(AppState { lobby: session.state() });

    let addr = config::server_addr();
    info!(%addr, "listening");
    let listener = TcpListener::bind(addr).await?;
    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    session.unmount().await;
    served?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!(?err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}
