use std::collections::HashMap;
use std::path::Path;

use tracing::info;

use crate::app::{AppContext, Result};
use crate::crawler::{supervise, Crawler};
use crate::driver::ChromeDriver;
use crate::store::{load_records, ContentStore, Verification};

pub async fn crawl(ctx: &AppContext, fresh: bool) -> Result<()> {
    if fresh {
        ctx.ledger().clear()?;
        println!("Checkpoint discarded, starting from the first page");
    }

    let crawl = &ctx.config.crawl;
    println!(
        "Crawling {} to {} ({} pages of {}) into {}",
        crawl.date_from,
        crawl.date_to,
        crawl.max_pages,
        crawl.page_size,
        ctx.paths.root.display()
    );

    let driver = ChromeDriver::launch(ctx.config.browser.clone()).await?;
    let crawler = Crawler::new(driver, &ctx.config)?;

    if let Some(cursor) = crawler.resume_point() {
        println!(
            "Resuming after page {}, card {} ({} images recorded)",
            cursor.page_index + 1,
            cursor.item_index + 1,
            cursor.item_count
        );
    }

    let summary = supervise(crawler).await?;

    println!(
        "Done: {} pages, {} articles, {} new images, {} records in {}",
        summary.pages_scanned,
        summary.articles_visited,
        summary.images_downloaded,
        summary.total_records,
        ctx.paths.metadata.display()
    );
    Ok(())
}

pub fn status(ctx: &AppContext) -> Result<()> {
    match ctx.ledger().load() {
        Some(cursor) => println!(
            "Checkpoint: page {}, card {}, {} images (saved {})",
            cursor.page_index + 1,
            cursor.item_index + 1,
            cursor.item_count,
            cursor.updated_at.format("%Y-%m-%d %H:%M:%S")
        ),
        None => println!("No checkpoint; the next crawl starts from the first page"),
    }

    let records = load_records(&ctx.paths.metadata)?;
    println!(
        "{} images recorded in {}",
        records.len(),
        ctx.paths.metadata.display()
    );
    Ok(())
}

/// Outcome of re-hashing every file named in the metadata
#[derive(Debug, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub intact: usize,
    pub missing: usize,
    pub drifted: usize,
    /// Records whose file was later overwritten by another image
    pub superseded: usize,
}

impl VerifyReport {
    pub fn failures(&self) -> usize {
        self.missing + self.drifted
    }
}

/// Check each stored image against the last record that wrote it
pub fn verify(ctx: &AppContext) -> Result<VerifyReport> {
    let records = load_records(&ctx.paths.metadata)?;

    let mut latest: HashMap<&Path, usize> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        latest.insert(record.local_path.as_path(), index);
    }

    let mut report = VerifyReport::default();
    for (index, record) in records.iter().enumerate() {
        if latest.get(record.local_path.as_path()) != Some(&index) {
            report.superseded += 1;
            continue;
        }

        match ContentStore::verify(&record.local_path, &record.content_hash)? {
            Verification::Intact => report.intact += 1,
            Verification::Missing => {
                report.missing += 1;
                println!("missing  {}", record.local_path.display());
            }
            Verification::Drifted { actual } => {
                report.drifted += 1;
                println!(
                    "drifted  {} (expected {}, found {})",
                    record.local_path.display(),
                    record.content_hash,
                    actual
                );
            }
        }
    }

    println!(
        "{} intact, {} missing, {} drifted, {} superseded",
        report.intact, report.missing, report.drifted, report.superseded
    );
    Ok(report)
}

pub fn reset(ctx: &AppContext) -> Result<()> {
    let ledger = ctx.ledger();
    if !ledger.path().exists() {
        println!("No checkpoint to remove");
        return Ok(());
    }

    ledger.clear()?;
    info!("Removed {}", ledger.path().display());
    println!("Checkpoint removed; the next crawl starts from the first page");
    Ok(())
}
