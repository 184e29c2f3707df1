/**
 * Portal Agent Entry Point
 *
 * Headless driver for the portal client core. Restores the saved session,
 * runs token verification and the unread-count poll, and logs what happens
 * until Ctrl-C.
 */
use std::sync::Arc;

use society_portal::portal::{
    ApiClient, Config, Navigator, PersistenceBridge, RestoreOutcome, SessionStore, SqliteStorage,
    TokenVerifier, UnreadPoller,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenv::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&env_filter))
        .init();

    let config = Config::load()?;
    tracing::info!(api = %config.api_base_url(), "Starting portal agent");

    let storage_path = config.storage_path();
    let storage = Arc::new(SqliteStorage::open(&storage_path).await?);
    tracing::info!(path = %storage_path.display(), "Opened session storage");

    let bridge = PersistenceBridge::new(storage.clone(), SessionStore::new());
    let navigator = Navigator::default();
    let api = ApiClient::new(config, bridge.clone(), navigator.clone())?;

    match bridge.restore().await? {
        RestoreOutcome::Restored => tracing::info!("Resuming saved session"),
        RestoreOutcome::Empty => tracing::info!("No saved session"),
        RestoreOutcome::Discarded(reason) => tracing::info!(?reason, "Saved session discarded"),
    }

    let verifier = TokenVerifier::new(api.clone(), bridge.clone(), navigator.clone()).spawn();
    let poller = UnreadPoller::new(api);
    let poll_task = poller.spawn();

    let mut session = bridge.store().subscribe();
    let mut location = navigator.subscribe();
    let mut unread = poller.subscribe();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                break;
            }
            Ok(()) = session.changed() => {
                let snapshot = session.borrow_and_update().clone();
                let email = snapshot.user.as_ref().map(|user| user.email.clone());
                tracing::info!(
                    authenticated = snapshot.is_authenticated,
                    loading = snapshot.loading,
                    email = email.as_deref().unwrap_or("-"),
                    "Session changed"
                );
            }
            Ok(()) = location.changed() => {
                let current = location.borrow_and_update().clone();
                tracing::info!(route = %current.route, flash = current.flash.as_deref().unwrap_or(""), "Navigated");
            }
            Ok(()) = unread.changed() => {
                let count = *unread.borrow_and_update();
                tracing::info!(count, "Unread notifications");
            }
        }
    }

    verifier.stop();
    poll_task.stop();
    storage.close().await;
    Ok(())
}
