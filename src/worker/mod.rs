use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use flume::{bounded, unbounded};
use tokio::io::AsyncRead;
use tracing::{debug, info};

use crate::cancel::CancelToken;
use crate::config::{CHANNEL_DEPTH_PER_WORKER, DEFAULT_POOL_SIZE, DEFAULT_SAMPLE_INTERVAL, MAX_POOL_SIZE};
use crate::error::SetupError;
use crate::format::{FormatChain, FormatKind};
use crate::oracle::Oracle;
use crate::types::{FailurePolicy, SearchReport};
use crate::ui::Spinner;
use crate::wallet::Ciphertext;
use crate::worker::coordinator::Coordinator;
use crate::worker::feeder::Feeder;
use crate::worker::pool::WorkerPool;

pub mod coordinator;
pub mod feeder;
pub mod pool;

/// Startup parameters of a search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Number of worker threads.
    pub pool_size: usize,

    /// Print a health-check line every this many candidates.
    pub sample_interval: u64,

    /// Formats to try for each candidate, in order.
    pub formats: FormatChain,

    pub policy: FailurePolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { pool_size: DEFAULT_POOL_SIZE, sample_interval: DEFAULT_SAMPLE_INTERVAL, formats: FormatChain::default(), policy: FailurePolicy::default() }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), SetupError> {
        if self.pool_size == 0 || self.pool_size > MAX_POOL_SIZE {
            return Err(SetupError::InvalidConfig("worker count must be between 1 and 1024"));
        }
        if self.sample_interval == 0 {
            return Err(SetupError::InvalidConfig("sample interval must be at least 1"));
        }
        if self.formats.is_empty() {
            return Err(SetupError::InvalidConfig("at least one format is required"));
        }
        Ok(())
    }
}

/// Dictionary search against one ciphertext.
///
/// Wires the pipeline together:
/// - a feeder task streaming candidates into a bounded work channel
/// - a fixed pool of worker threads running the format chain
/// - the coordinator, consuming worker signals and owning the outcome
///
/// All three share one [`CancelToken`].
pub struct Search {
    config: SearchConfig,
    ciphertext: Arc<Ciphertext>,
    oracle: Arc<dyn Oracle>,
}

impl Search {
    /// Validates `config` before anything is spawned.
    pub fn new(config: SearchConfig, ciphertext: Ciphertext, oracle: Arc<dyn Oracle>) -> Result<Self, SetupError> {
        config.validate()?;
        Ok(Self { config, ciphertext: Arc::new(ciphertext), oracle })
    }

    /// Runs the search over `dictionary` until a match, exhaustion, or a
    /// fail-fast stop. Each of those is a normal return; `Err` means the
    /// pipeline itself broke.
    pub async fn run<R>(self, dictionary: R, progress: Spinner) -> Result<SearchReport>
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let Self { config, ciphertext, oracle } = self;
        let token = CancelToken::new();

        let formats: Vec<FormatKind> = config.formats.kinds().collect();
        info!(workers = config.pool_size, ?formats, policy = %config.policy, "starting search");

        let (work_sender, work_receiver) = bounded(config.pool_size * CHANNEL_DEPTH_PER_WORKER);
        let (signal_sender, signal_receiver) = unbounded();

        let feeder = Feeder::new(token.clone());
        let feeder_handle = tokio::spawn(async move { feeder.feed(dictionary, work_sender).await });

        let pool = WorkerPool::new(config.pool_size, config.formats, ciphertext, oracle, token.clone());
        let pool_handle = tokio::task::spawn_blocking(move || pool.run(work_receiver, signal_sender));

        let coordinator = Coordinator::new(config.policy, config.sample_interval, token, progress);
        let report = coordinator.run(signal_receiver).await;

        let exits = pool_handle.await.map_err(|_| anyhow!("worker pool panicked"))?.context("worker pool failed")?;
        let fed = feeder_handle.await.map_err(|_| anyhow!("feeder task panicked"))?;

        debug!(fed, workers = exits.len(), "pipeline shut down");

        Ok(report)
    }
}
