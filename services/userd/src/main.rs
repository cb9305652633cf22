//! User listing service entry point.
//!
//! Wires configuration, the seeded in-memory store, and the HTTP router,
//! then serves until shutdown.
use anyhow::Result;
use std::future::Future;
use std::sync::Arc;
use userd::app::{AppState, build_router};
use userd::config::UserdConfig;
use userd::observability;
use userd::seed::seed_users;
use userd::store::UserStore;
use userd::store::memory::InMemoryStore;

#[tokio::main]
async fn main() -> Result<()> {
    let config = UserdConfig::from_env_or_yaml()?;
    run_with_shutdown(config, async {
        let _ = tokio::signal::ctrl_c().await;
    })
    .await
}

async fn run_with_shutdown<F>(config: UserdConfig, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let metrics_handle = observability::init_observability();
    let metrics_task = tokio::spawn(observability::serve_metrics(
        metrics_handle,
        config.metrics_bind,
    ));

    let state = build_state(&config).await;
    let app = build_router(state);

    let addr = config.bind_addr;
    tracing::info!(%addr, seed_count = config.seed_count, "userd listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tokio::pin!(shutdown);
    tokio::select! {
        result = axum::serve(listener, app.into_make_service()) => {
            result?;
        }
        _ = &mut shutdown => {}
    }

    metrics_task.abort();
    let _ = metrics_task.await;
    Ok(())
}

async fn build_state(config: &UserdConfig) -> AppState {
    let store = InMemoryStore::new();
    store.load(seed_users(config.seed_count)).await;
    let store: Arc<dyn UserStore> = Arc::new(store);
    AppState {
        store,
        default_page_limit: config.default_page_limit,
        max_page_limit: config.max_page_limit,
    }
}
