use tracing::{info, warn};

use crate::config::Config;
use crate::errors::BackupResult;
use crate::output::{CsvSink, HtmlSink, ImageStore, OutputMode, OutputSink};
use crate::sources::{Fetcher, HttpFetcher, TumblrFeed};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BackupSummary {
    /// Posts the feed says it has
    pub total: u64,
    pub batches: u64,
    pub posts_written: u64,
}

/// Runs one backup: walks the feed and hands every post to the chosen sink.
pub struct BackupService {
    config: Config,
    feed: TumblrFeed,
    image_fetcher: Box<dyn Fetcher>,
}

impl BackupService {
    pub fn new(config: Config, feed_fetcher: Box<dyn Fetcher>, image_fetcher: Box<dyn Fetcher>) -> Self {
        let feed = TumblrFeed::new(config.feed_endpoint(), feed_fetcher);

        Self {
            config,
            feed,
            image_fetcher,
        }
    }

    pub fn from_config(config: Config) -> BackupResult<Self> {
        let http = HttpFetcher::new(config.timeout)?;
        Ok(Self::new(config, Box::new(http.clone()), Box::new(http)))
    }

    /// Back up everything from the configured start offset. The first
    /// error ends the run; whatever was written before it stays on disk.
    pub fn run(self) -> BackupResult<BackupSummary> {
        let Self {
            config,
            feed,
            image_fetcher,
        } = self;

        if config.mode == OutputMode::Csv {
            println!("CSV mode activated.");
            println!("Data will be saved to {}", config.csv_path().display());
        }

        println!("Getting basic information.");
        let feed_info = feed.discover()?;
        info!(account = %config.account, total = feed_info.total, mode = %config.mode, "starting backup");

        let images = ImageStore::new(&config.save_folder, image_fetcher);
        let mut sink: Box<dyn OutputSink> = match config.mode {
            OutputMode::Csv => Box::new(CsvSink::create(&config.csv_path(), config.encoding, images)?),
            OutputMode::Html => {
                let blog = feed_info.blog.clone().unwrap_or_else(|| {
                    warn!("feed has no blog details, pages will have an empty header");
                    Default::default()
                });
                Box::new(HtmlSink::new(&config.save_folder, blog, config.encoding, images))
            }
        };

        Self::transcribe(&feed, sink.as_mut(), config.start, feed_info.total)
    }

    /// Feed every page from `start` up to `total` through `sink`, in feed order.
    pub fn transcribe(
        feed: &TumblrFeed,
        sink: &mut dyn OutputSink,
        start: u64,
        total: u64,
    ) -> BackupResult<BackupSummary> {
        let mut summary = BackupSummary {
            total,
            ..Default::default()
        };

        for batch in feed.pages(start, total) {
            let batch = batch?;
            println!("Getting posts {} to {}.", batch.first, batch.last);

            for post in &batch.posts {
                sink.write_post(post)?;
                summary.posts_written += 1;
            }
            summary.batches += 1;
        }

        Ok(summary)
    }
}
