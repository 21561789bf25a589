use crate::config::{CompiledSelectors, ConfigError, RunConfig};
use crate::crawlers::crawler::{FetchError, PageFetcher};
use crate::dedup::DedupRegistry;
use crate::parsers::{self, PageStats};
use crate::results::{DealRecord, PageRequest, ScrapeResult};
use crate::utils::page_url;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use url::Url;

/// Why a page contributed nothing
#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("page task panicked: {0}")]
    Panicked(String),
}

/// What one page contributed to the run
#[derive(Debug)]
pub struct PageOutcome {
    pub page_number: u32,
    pub result: Result<(ScrapeResult, PageStats), PageError>,
}

/// Everything a worker needs, shared across the pool
struct WorkerContext<F> {
    fetcher: Arc<F>,
    base_url: Url,
    selectors: CompiledSelectors,
    registry: DedupRegistry,
}

/// Fetches pages 1..=max_pages with a pool of `thread_count` workers and
/// returns every accepted record, deduplicated by title.
///
/// Pages complete in arbitrary order. A page that cannot be fetched
/// contributes nothing; only an invalid configuration fails the run.
pub async fn scrape_all<F: PageFetcher>(
    config: &RunConfig,
    fetcher: Arc<F>,
) -> Result<Vec<DealRecord>, ConfigError> {
    config.validate()?;

    let num_workers = config.thread_count.min(config.max_pages as usize);
    if num_workers == 0 {
        ::log::info!("No pages to scrape");
        return Ok(Vec::new());
    }

    ::log::info!(
        "Scraping {} pages of {} with {} workers",
        config.max_pages,
        config.base_url,
        num_workers
    );

    let context = Arc::new(WorkerContext {
        fetcher,
        base_url: config.listing_url()?,
        selectors: config.selectors.compile()?,
        registry: DedupRegistry::new(),
    });

    // Every page is queued up front
    let (page_tx, page_rx) = mpsc::unbounded_channel::<PageRequest>();
    for page_number in 1..=config.max_pages {
        // The receiver is still alive, so this cannot fail
        let _ = page_tx.send(PageRequest::new(page_number, &config.platform));
    }
    drop(page_tx);

    let (result_tx, mut result_rx) = mpsc::unbounded_channel::<PageOutcome>();
    let workers = spawn_workers(
        num_workers,
        Arc::clone(&context),
        Arc::new(Mutex::new(page_rx)),
        result_tx,
    );

    let mut all_deals = Vec::new();
    let mut totals = PageStats::default();
    let mut pages_ok = 0;
    let mut failed_pages = Vec::new();

    // Closes once every worker has dropped its sender
    while let Some(outcome) = result_rx.recv().await {
        match outcome.result {
            Ok((records, stats)) => {
                pages_ok += 1;
                totals.merge(&stats);
                all_deals.extend(records);
            }
            Err(_) => failed_pages.push(outcome.page_number),
        }
    }

    for (worker_id, handle) in workers.into_iter().enumerate() {
        if let Err(e) = handle.await {
            ::log::error!("Worker {} terminated abnormally: {}", worker_id, e);
        }
    }

    ::log::info!(
        "Scraped {} pages ({} failed): {} cards, {} deals, {} duplicates, {} discarded, {} unreadable",
        pages_ok,
        failed_pages.len(),
        totals.cards,
        all_deals.len(),
        totals.duplicates,
        totals.discarded,
        totals.failed
    );
    if !failed_pages.is_empty() {
        failed_pages.sort_unstable();
        ::log::warn!("Pages without results: {:?}", failed_pages);
    }

    Ok(all_deals)
}

/// Spawns the worker pool; each worker drains the shared page queue
fn spawn_workers<F: PageFetcher>(
    num_workers: usize,
    context: Arc<WorkerContext<F>>,
    page_rx: Arc<Mutex<mpsc::UnboundedReceiver<PageRequest>>>,
    result_tx: mpsc::UnboundedSender<PageOutcome>,
) -> Vec<JoinHandle<()>> {
    (0..num_workers)
        .map(|worker_id| {
            let context = Arc::clone(&context);
            let page_rx = Arc::clone(&page_rx);
            let result_tx = result_tx.clone();

            ::log::trace!("Spawning worker {}", worker_id);
            tokio::spawn(async move {
                while let Some(request) = next_page(&page_rx).await {
                    let outcome = run_page(&context, request).await;
                    if result_tx.send(outcome).is_err() {
                        ::log::warn!("Worker {} lost the result channel", worker_id);
                        break;
                    }
                }
                ::log::debug!("Worker {} finished, no more pages", worker_id);
            })
        })
        .collect()
}

/// Runs one page in its own task so a panic costs that page only
async fn run_page<F: PageFetcher>(
    context: &Arc<WorkerContext<F>>,
    request: PageRequest,
) -> PageOutcome {
    let page_number = request.page_number;
    let context = Arc::clone(context);
    let task = tokio::spawn(async move { scrape_page(&context, &request).await });

    match task.await {
        Ok(outcome) => outcome,
        Err(e) => {
            ::log::error!("Error processing page {}: {}", page_number, e);
            PageOutcome {
                page_number,
                result: Err(PageError::Panicked(e.to_string())),
            }
        }
    }
}

async fn next_page(page_rx: &Mutex<mpsc::UnboundedReceiver<PageRequest>>) -> Option<PageRequest> {
    page_rx.lock().await.recv().await
}

/// Fetches and parses one page; a failed fetch is logged and reported, never raised
async fn scrape_page<F: PageFetcher>(
    context: &WorkerContext<F>,
    request: &PageRequest,
) -> PageOutcome {
    let url = page_url(&context.base_url, request);

    let result = match context.fetcher.fetch(url.as_str()).await {
        Ok(markup) => {
            let (records, stats) = parsers::page_records(
                &markup,
                request.page_number,
                &context.selectors,
                &context.registry,
            );
            if stats.cards == 0 {
                ::log::info!("Page {}: no product cards found", request.page_number);
            } else {
                ::log::info!(
                    "Page {}: {} cards, {} new deals",
                    request.page_number,
                    stats.cards,
                    records.len()
                );
            }
            Ok((records, stats))
        }
        Err(e) => {
            ::log::error!("Request failed for page {}: {}", request.page_number, e);
            Err(PageError::Fetch(e))
        }
    };

    PageOutcome {
        page_number: request.page_number,
        result,
    }
}
