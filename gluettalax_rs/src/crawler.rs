//! Crawler facade: start a crawler and optionally wait for it.

use std::time::Duration;

use tracing::{debug, info};

use crate::client::{ClientError, CrawlerInfo, CrawlerState, GlueClient, collect_pages};
use crate::error::{GlueError, Result};
use crate::poller::{Clock, PollConfig, Poller};

pub const DEFAULT_CRAWLER_DELAY: Duration = Duration::from_secs(10);
pub const DEFAULT_CRAWLER_TIMEOUT: Duration = Duration::from_secs(10 * 60);

/// A named remote crawler.
pub struct Crawler<'a> {
    client: &'a dyn GlueClient,
    clock: &'a dyn Clock,
    name: String,
    config: PollConfig,
}

impl<'a> Crawler<'a> {
    pub fn new(
        client: &'a dyn GlueClient,
        clock: &'a dyn Clock,
        name: impl Into<String>,
        config: PollConfig,
    ) -> Self {
        Self {
            client,
            clock,
            name: name.into(),
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current remote status.
    pub fn status(&self) -> Result<CrawlerInfo> {
        self.client
            .get_crawler(&self.name)
            .map_err(|e| self.translate(e))
    }

    pub fn is_ready(&self) -> Result<bool> {
        Ok(self.status()?.state == CrawlerState::Ready)
    }

    /// Start the crawler and, unless async, wait for it to return to READY.
    ///
    /// With `rerun` a busy crawler is first waited on, then started again.
    /// Without it a busy crawler is not restarted and the in-flight crawl is
    /// awaited instead. READY is completion whatever the crawl's outcome.
    pub fn run(&self, rerun: bool) -> Result<()> {
        let mut ready = self.is_ready()?;
        if rerun && !ready {
            info!(crawler = %self.name, "crawler busy, waiting before rerun");
            self.wait_ready()?;
            ready = true;
        }
        if ready {
            self.client
                .start_crawler(&self.name)
                .map_err(|e| self.translate(e))?;
            info!(crawler = %self.name, "crawler started");
        } else {
            info!(crawler = %self.name, "crawler already running, joining current crawl");
        }
        if self.config.run_async {
            debug!(crawler = %self.name, "async run, not waiting");
            return Ok(());
        }
        self.wait_ready()
    }

    fn wait_ready(&self) -> Result<()> {
        let poller = Poller::new(self.clock, &self.config);
        poller
            .poll(
                || self.status(),
                |status| status.state == CrawlerState::Ready,
                |waited| GlueError::CrawlerTimeout {
                    name: self.name.clone(),
                    waited,
                },
            )
            .map(|_| ())
    }

    fn translate(&self, err: ClientError) -> GlueError {
        match err {
            ClientError::EntityNotFound(_) => GlueError::CrawlerNotFound(self.name.clone()),
            other => GlueError::Client(other),
        }
    }
}

/// Every crawler known to the service.
pub fn list_crawlers(client: &dyn GlueClient) -> Result<Vec<CrawlerInfo>> {
    Ok(collect_pages(|token| client.list_crawlers(token))?)
}

/// Run a crawler with the given poll policy.
pub fn run_crawler(
    client: &dyn GlueClient,
    clock: &dyn Clock,
    name: &str,
    rerun: bool,
    config: PollConfig,
) -> Result<()> {
    Crawler::new(client, clock, name, config).run(rerun)
}
