use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Parser;
use tracing::Level;

use crate::config::{APP_NAME, DEFAULT_POOL_SIZE, DEFAULT_SAMPLE_INTERVAL};
use crate::error::SetupError;
use crate::format::{FormatChain, FormatKind};
use crate::oracle::JsonOracle;
use crate::types::{FailurePolicy, Outcome};
use crate::ui::Spinner;
use crate::wallet::Ciphertext;
use crate::worker::{Search, SearchConfig};

#[derive(Parser)]
#[command(name = APP_NAME, version = "26.1.0", about = "Recover a legacy wallet passphrase from a dictionary of candidates.")]
pub struct App {
    /// Base64-encoded wallet payload.
    wallet: PathBuf,

    /// Candidate passphrases, one per line.
    dictionary: PathBuf,

    /// Number of worker threads.
    #[arg(short, long, default_value_t = DEFAULT_POOL_SIZE)]
    workers: usize,

    /// Print a health-check line every N candidates.
    #[arg(short, long, default_value_t = DEFAULT_SAMPLE_INTERVAL)]
    sample_interval: u64,

    /// Restrict the formats tried per candidate. Repeatable; defaults to all, in order.
    #[arg(short, long = "format", value_enum)]
    formats: Vec<FormatKind>,

    /// Stop at the first decrypt failure instead of moving on.
    #[arg(long)]
    fail_fast: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

impl App {
    pub fn init() -> Result<Self> {
        let app = Self::parse();

        let level = if app.verbose { Level::DEBUG } else { Level::INFO };
        let subscriber = tracing_subscriber::fmt().with_file(true).with_line_number(true).with_max_level(level).with_writer(std::io::stderr).finish();
        tracing::subscriber::set_global_default(subscriber)?;

        Ok(app)
    }

    pub async fn execute(self) -> Result<()> {
        let ciphertext = Ciphertext::load(&self.wallet).await?;
        let dictionary = tokio::fs::File::open(&self.dictionary).await.map_err(|source| SetupError::Read { path: self.dictionary.clone(), source })?;

        let formats = if self.formats.is_empty() { FormatChain::default() } else { FormatChain::new(&self.formats) };
        let config = SearchConfig { pool_size: self.workers, sample_interval: self.sample_interval, formats, policy: FailurePolicy::from_fail_fast(self.fail_fast) };

        let search = Search::new(config, ciphertext, Arc::new(JsonOracle))?;
        let report = search.run(dictionary, Spinner::new("Searching")).await?;

        crate::ui::show_report(&report);

        if let Outcome::Failed { line, failure } = &report.outcome {
            bail!("search stopped at line {line}: {failure}");
        }

        Ok(())
    }
}
