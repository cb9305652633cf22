//! Spawns a seeded userd instance on an ephemeral port for integration tests
//! and demos. The server task is aborted when the handle drops.
use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use userd::app::{AppState, build_router};
use userd::seed::seed_users;
use userd::store::memory::InMemoryStore;

pub struct SpawnedUserd {
    addr: SocketAddr,
    /// Direct handle to the backing store for server-side assertions.
    pub store: Arc<InMemoryStore>,
    server: tokio::task::JoinHandle<()>,
}

impl SpawnedUserd {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

impl Drop for SpawnedUserd {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Bind on an ephemeral loopback port, seed `seed_count` rows, and serve
/// until the returned handle drops. Resolves once the port accepts
/// connections.
pub async fn spawn_userd(seed_count: usize) -> Result<SpawnedUserd> {
    let store = Arc::new(InMemoryStore::new());
    store.load(seed_users(seed_count)).await;

    let app = build_router(AppState {
        store: store.clone(),
        default_page_limit: roster_common::PAGE_SIZE,
        max_page_limit: 100,
    });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .context("bind userd listener")?;
    let addr = listener.local_addr().context("userd local addr")?;
    let server = tokio::spawn(async move {
        if let Err(err) = axum::serve(listener, app.into_make_service()).await {
            tracing::warn!(error = %err, "spawned userd stopped");
        }
    });

    wait_for_listen(addr).await?;
    Ok(SpawnedUserd {
        addr,
        store,
        server,
    })
}

pub async fn wait_for_listen(addr: SocketAddr) -> Result<()> {
    let deadline = Instant::now() + Duration::from_secs(1);
    loop {
        if tokio::net::TcpStream::connect(addr).await.is_ok() {
            return Ok(());
        }
        if Instant::now() >= deadline {
            anyhow::bail!("server never became ready at {addr}");
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}
