// Scroll-session demo: opens a list session against a running userd and
// keeps signaling sentinel visibility until the loader exhausts, then prints
// a sorted sample of what arrived.
use anyhow::Result;
use clap::Parser;
use roster_client::{
    ClientConfig, HttpPageFetcher, ListSession, PageFetcher, SortColumn, SortDirection,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "scroll-session")]
#[command(about = "Scroll a roster list session to exhaustion against a userd instance")]
struct Args {
    /// userd base URL
    #[arg(long, default_value = "http://127.0.0.1:3000")]
    api_url: String,

    /// Failed page loads tolerated before giving up
    #[arg(long, default_value = "30")]
    retry_attempts: u32,

    /// Delay between scroll signals in milliseconds
    #[arg(long, default_value = "50")]
    signal_delay_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    info!(api_url = %args.api_url, "opening list session");

    let config = ClientConfig::new(&args.api_url);
    let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpPageFetcher::new(&config)?);
    let session = ListSession::open(fetcher, &config);

    let sentinel = session.observe();
    let mut failed_loads = 0;
    while !session.is_exhausted().await {
        sentinel.visible();
        sleep(Duration::from_millis(args.signal_delay_ms)).await;

        match session.last_error() {
            Some(err) => {
                failed_loads += 1;
                anyhow::ensure!(
                    failed_loads <= args.retry_attempts,
                    "giving up after {failed_loads} failed loads: {err}"
                );
                warn!(error = %err, attempt = failed_loads, "page load failed; retrying");
                sleep(Duration::from_secs(1)).await;
            }
            None => {
                info!(
                    rows = session.rows().await.len(),
                    total = ?session.total_known().await,
                    "scrolling"
                );
            }
        }
    }

    let rows = session.rows().await;
    info!(rows = rows.len(), "list exhausted");

    let sorted = session
        .rows_sorted(SortColumn::Name, SortDirection::Ascending)
        .await;
    for record in sorted.iter().take(5) {
        info!(name = %record.name, company = %record.company, age = record.age, "sample row");
    }

    session.close();
    Ok(())
}
