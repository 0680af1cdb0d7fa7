use std::any::Any;
use std::future::Future;

use tracing::{error, warn};

use crate::app::{ClippingError, Result};
use crate::crawler::orchestrator::{CrawlSummary, Crawler};
use crate::driver::PageDriver;

/// Run a crawl until it finishes or the process receives Ctrl-C
pub async fn supervise<D>(crawler: Crawler<D>) -> Result<CrawlSummary>
where
    D: PageDriver + 'static,
{
    supervise_until(crawler, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Cannot listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    })
    .await
}

/// Run a crawl on its own task, stopping it when `shutdown` resolves.
///
/// A panic inside the crawl or an early shutdown both end in
/// [`ClippingError::Aborted`]. In either case the crawler is dropped, which
/// flushes the metadata gathered so far.
pub async fn supervise_until<D, S>(crawler: Crawler<D>, shutdown: S) -> Result<CrawlSummary>
where
    D: PageDriver + 'static,
    S: Future<Output = ()>,
{
    let mut task = tokio::spawn(crawler.run());

    tokio::select! {
        joined = &mut task => match joined {
            Ok(outcome) => outcome,
            Err(e) if e.is_panic() => {
                let message = panic_message(e.into_panic());
                error!("Crawl task panicked: {}", message);
                Err(ClippingError::Aborted(format!("crawl task panicked: {message}")))
            }
            Err(e) => Err(ClippingError::Aborted(format!("crawl task cancelled: {e}"))),
        },
        _ = shutdown => {
            warn!("Interrupted, stopping crawl");
            task.abort();
            // wait for the task to drop its state
            let _ = task.await;
            Err(ClippingError::Aborted("interrupted".to_string()))
        }
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
