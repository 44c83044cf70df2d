use connector_binance::run_feed;
use connector_core::{create_event_channel, FeedConfig};
use metrics::create_metrics;
use model::MarketEvent;
use orderbook::{MarkPriceTracker, SharedBook, SharedMarkPrice};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::{error, info, warn};

mod render;

/// Terminal refresh interval.
const RENDER_INTERVAL: Duration = Duration::from_millis(16);

/// Price levels shown per side.
const DISPLAY_DEPTH: usize = 10;

/// Interval for periodic health status logging.
const HEALTH_LOG_INTERVAL: Duration = Duration::from_secs(60);

#[tokio::main]
async fn main() {
    common::init_logging();

    let symbol = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "BTCUSDT".to_string())
        .to_uppercase();

    info!(symbol = %symbol, "starting depth viewer");

    let config = FeedConfig {
        symbol: symbol.clone(),
        environment: common::FuturesEnvironment::from_env(),
        ..Default::default()
    };

    let (sender, mut receiver) = create_event_channel(config.channel_capacity);
    let metrics = create_metrics();
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let book = SharedBook::new(symbol.clone());
    let mark_price: SharedMarkPrice = Arc::new(MarkPriceTracker::new());

    // Feed task: WebSocket -> market events.
    let feed_metrics = metrics.clone();
    let feed_handle = tokio::spawn(async move {
        if let Err(e) = run_feed(config, sender, shutdown_rx, feed_metrics).await {
            error!(error = %e, "feed terminated");
        }
    });

    // Apply task: market events -> book / mark price. The sole writer.
    let writer_book = book.clone();
    let writer_mark = mark_price.clone();
    let apply_handle = tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            match event {
                MarketEvent::Depth(depth) => {
                    let report = writer_book.apply_depth(&depth.bids, &depth.asks);
                    if report.rejected > 0 {
                        warn!(rejected = report.rejected, "dropped invalid levels");
                    }
                }
                MarketEvent::MarkPrice(update) => {
                    writer_mark.update(update.mark_price, update.funding_rate);
                }
            }
        }
    });

    // Ctrl-C initiates shutdown.
    let shutdown_on_signal = shutdown_tx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, shutting down");
            let _ = shutdown_on_signal.send(true);
        }
    });

    // Periodic health reporter.
    let health_metrics = metrics.clone();
    let health_book = book.clone();
    let mut health_shutdown_rx = shutdown_tx.subscribe();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(HEALTH_LOG_INTERVAL);
        // The first tick fires immediately; skip it.
        interval.tick().await;
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    let snapshot = health_metrics.snapshot();
                    info!(
                        status = %snapshot.health_status(),
                        depth_updates = snapshot.depth_updates,
                        depth_per_sec = format!("{:.1}", snapshot.depth_updates_per_second),
                        rejected_levels = health_book.rejected_updates(),
                        errors = snapshot.websocket_errors + snapshot.parse_errors,
                        reconnects = snapshot.reconnect_attempts,
                        "health check"
                    );
                }
                _ = health_shutdown_rx.changed() => {
                    if *health_shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }
    });

    // Render loop: the reader. Each tick takes one snapshot per source
    // and repaints.
    let mut render_shutdown_rx = shutdown_tx.subscribe();
    let mut ticker = tokio::time::interval(RENDER_INTERVAL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let depth = book.depth_snapshot(DISPLAY_DEPTH);
                let mark = mark_price.snapshot();
                let frame = render::render_frame(&symbol, &depth, &mark);
                render::paint(&frame);
            }
            _ = render_shutdown_rx.changed() => {
                if *render_shutdown_rx.borrow() {
                    break;
                }
            }
        }
    }

    // The feed drops its sender on shutdown, which ends the apply task.
    let _ = feed_handle.await;
    let _ = apply_handle.await;

    println!("\n{}", metrics.snapshot());
    info!("shutdown complete");
}
