use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::app::{OutputPaths, Result};
use crate::checkpoint::CheckpointLedger;
use crate::config::Config;
use crate::crawler::config::{CrawlConfig, PolitenessConfig};
use crate::domain::{ArticleSummary, AssetRecord, CrawlCursor, ImageDescriptor};
use crate::driver::{ExtractMode, PageDriver};
use crate::naming;
use crate::retry::{RetryGovernor, RetryPolicy};
use crate::store::{AssetLog, ContentStore};

/// Counters reported when a crawl finishes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub pages_scanned: u32,
    pub articles_visited: u32,
    pub images_downloaded: u32,
    pub total_records: usize,
    pub resumed_from: Option<CrawlCursor>,
}

/// Walks list pages, detail pages and images in order, one unit at a time.
///
/// Progress is checkpointed after every article; metadata is rewritten after
/// every image. A run either reaches the end of the configured page range
/// (checkpoint removed) or stops at the first fatal error with everything
/// gathered so far flushed.
pub struct Crawler<D: PageDriver> {
    driver: D,
    governor: RetryGovernor,
    ledger: CheckpointLedger,
    store: ContentStore,
    log: AssetLog,
    crawl: CrawlConfig,
    politeness: PolitenessConfig,
    resume_from: Option<CrawlCursor>,
    written: HashMap<PathBuf, String>,
    summary: CrawlSummary,
}

impl<D: PageDriver> Crawler<D> {
    /// Prepare a crawl, picking up the checkpoint and metadata of an interrupted run
    pub fn new(driver: D, config: &Config) -> Result<Self> {
        let paths = OutputPaths::new(&config.crawl.output_dir);
        let ledger = CheckpointLedger::new(&paths.checkpoint);
        let resume_from = ledger.load();

        let log = match resume_from {
            Some(ref cursor) => AssetLog::resume(&paths.metadata, cursor)?,
            None => AssetLog::fresh(&paths.metadata),
        };

        Ok(Self {
            driver,
            governor: RetryGovernor::new(RetryPolicy::from(&config.retry)),
            ledger,
            store: ContentStore::new(&paths.images),
            log,
            crawl: config.crawl.clone(),
            politeness: config.politeness.clone(),
            resume_from,
            written: HashMap::new(),
            summary: CrawlSummary {
                resumed_from: resume_from,
                ..Default::default()
            },
        })
    }

    pub fn resume_point(&self) -> Option<&CrawlCursor> {
        self.resume_from.as_ref()
    }

    /// Run to completion or to the first fatal error
    pub async fn run(mut self) -> Result<CrawlSummary> {
        match self.resume_from {
            Some(cursor) => info!(
                "Resuming after page {}, card {} ({} records so far)",
                cursor.page_index + 1,
                cursor.item_index + 1,
                self.log.len()
            ),
            None => info!("Starting crawl from the first page"),
        }

        match self.traverse().await {
            Ok(()) => {
                self.ledger.clear()?;
                self.log.finalize()?;
                self.release_driver().await;

                self.summary.total_records = self.log.len();
                info!(
                    "Crawl complete: {} pages, {} articles, {} images ({} records total)",
                    self.summary.pages_scanned,
                    self.summary.articles_visited,
                    self.summary.images_downloaded,
                    self.summary.total_records
                );
                Ok(self.summary)
            }
            Err(err) => {
                error!("Crawl aborted: {}", err);
                if let Err(flush_err) = self.log.finalize() {
                    error!("Failed to flush metadata: {}", flush_err);
                } else {
                    info!(
                        "Flushed {} records to {}",
                        self.log.len(),
                        self.log.path().display()
                    );
                }
                self.release_driver().await;
                Err(err)
            }
        }
    }

    async fn release_driver(&mut self) {
        if let Err(e) = self.driver.close().await {
            warn!("Failed to close page driver: {}", e);
        }
    }

    async fn traverse(&mut self) -> Result<()> {
        let first_page = self.resume_from.map_or(0, |c| c.page_index);

        for page in first_page..self.crawl.max_pages {
            let articles = self.list_articles(page).await?;
            self.summary.pages_scanned += 1;

            if articles.is_empty() {
                info!("List page {} has no articles", page + 1);
                if self.crawl.stop_on_empty_page {
                    break;
                }
                continue;
            }

            let start = self
                .resume_from
                .and_then(|c| c.resume_index(page))
                .unwrap_or(0);

            for (index, article) in articles.iter().enumerate().skip(start) {
                let Some(detail_url) = article.detail_url.as_deref() else {
                    debug!(
                        "Skipping card {} on page {}: no detail link",
                        index + 1,
                        page + 1
                    );
                    continue;
                };

                self.process_article(page, index, article, detail_url).await?;
            }
        }

        Ok(())
    }

    async fn list_articles(&self, page: u32) -> Result<Vec<ArticleSummary>> {
        let url = self.crawl.list_url(page);
        self.politeness.list_delay.pause().await;
        info!("Opening list page {}: {}", page + 1, url);

        let driver = &self.driver;
        let url = url.as_str();
        self.governor
            .execute(&format!("list page {}", page + 1), move || async move {
                driver
                    .navigate_and_extract(url, ExtractMode::Articles)
                    .await?
                    .into_articles()
            })
            .await
    }

    async fn list_images(&self, detail_url: &str) -> Result<Vec<ImageDescriptor>> {
        self.politeness.detail_delay.pause().await;

        let driver = &self.driver;
        self.governor
            .execute(&format!("detail {}", detail_url), move || async move {
                driver
                    .navigate_and_extract(detail_url, ExtractMode::Images)
                    .await?
                    .into_images()
            })
            .await
    }

    async fn download(&self, image_url: &str) -> Result<Vec<u8>> {
        let driver = &self.driver;
        self.governor
            .execute(&format!("image {}", image_url), move || {
                driver.fetch_binary(image_url)
            })
            .await
    }

    async fn process_article(
        &mut self,
        page: u32,
        index: usize,
        article: &ArticleSummary,
        detail_url: &str,
    ) -> Result<()> {
        info!(
            "Page {}, card {}: {}",
            page + 1,
            index + 1,
            article.display_title()
        );

        let images = self.list_images(detail_url).await?;
        if images.is_empty() {
            debug!("No images on {}", detail_url);
        }

        let year = naming::year_bucket(article.published_date_raw.as_deref());

        for (position, image) in images.iter().enumerate() {
            if image.source_url.trim().is_empty() {
                continue;
            }

            self.save_image(article, detail_url, &year, position, image)
                .await?;
            self.politeness.image_delay.pause().await;
        }

        self.summary.articles_visited += 1;

        let cursor = CrawlCursor::new(page, index as u32, self.log.len() as u64);
        self.ledger.save(&cursor)
    }

    async fn save_image(
        &mut self,
        article: &ArticleSummary,
        detail_url: &str,
        year: &str,
        position: usize,
        image: &ImageDescriptor,
    ) -> Result<()> {
        let filename = naming::derive_filename(
            article.published_date_raw.as_deref(),
            image,
            article.title.as_deref(),
            position,
        );
        let target = self.store.image_path(year, &filename);

        let bytes = self.download(&image.source_url).await?;
        let stored = self.store.persist(&bytes, &target)?;
        self.note_write(&target, &image.source_url);

        debug!(
            "Saved {} ({} bytes, sha256 {})",
            target.display(),
            stored.size,
            stored.hash
        );

        self.log.append(AssetRecord::new(
            article,
            detail_url,
            &image.source_url,
            target,
            stored.size,
            stored.hash,
        ))?;
        self.summary.images_downloaded += 1;

        Ok(())
    }

    /// Remember which image last landed on `target`; report overwrites by another image
    fn note_write(&mut self, target: &Path, image_url: &str) {
        if let Some(previous) = self
            .written
            .insert(target.to_path_buf(), image_url.to_string())
        {
            if previous != image_url {
                warn!(
                    "{} overwritten: {} replaces {}",
                    target.display(),
                    image_url,
                    previous
                );
            }
        }
    }
}
