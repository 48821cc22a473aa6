use clap::Parser; // for cli
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{info, warn};

use view_counter::config::Args;
use view_counter::counters::CounterStore;
use view_counter::flusher::{FileSink, run_flusher};
use view_counter::handlers::router;
use view_counter::logging::init_tracing;
use view_counter::state::AppState;

// this is main async function with tokio
#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_tracing();
    let args = Args::parse();

    let counters = Arc::new(CounterStore::new());
    let state = Arc::new(AppState::from_args(&args, Arc::clone(&counters)));

    // spawn the flush scheduler
    let sink = FileSink::new(&args.store_path);
    info!(path = %sink.path().display(), "counters will be flushed to disk");
    let (flush_stop, flush_rx) = oneshot::channel();
    let flusher = tokio::spawn(run_flusher(
        Arc::clone(&counters),
        Arc::new(sink),
        args.flush_period(),
        flush_rx,
    ));

    let app = router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("view counter running on http://localhost:{}", args.port);
    info!(
        "stats rate limit: {} requests per {} seconds",
        args.stats_limit, args.stats_window
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // last flush before exit
    let _ = flush_stop.send(());
    if let Err(e) = flusher.await {
        warn!(error = %e, "flush scheduler did not stop cleanly");
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
