//! The coordinator: sole owner of the search state.
//!
//! Workers never write shared state. They send [`Signal`]s, and this single
//! consumer turns them into the running count and the terminal outcome.
//! Once the outcome is decided every later signal is discarded, with one
//! exception: a recovery still replaces a fail-fast stop. A worker only sends
//! [`Signal::Found`] after winning the cancel flag, so such a recovery beat
//! the stop and must not be lost.

use std::time::Instant;

use flume::Receiver;
use tracing::{error, info, warn};

use crate::cancel::CancelToken;
use crate::types::{FailurePolicy, Outcome, SearchReport, Signal};
use crate::ui::Spinner;

/// Decrypt failures absorbed under [`FailurePolicy::Continue`] are logged
/// once every this many.
const FAILURE_LOG_INTERVAL: u64 = 1_000;

/// Candidate counter plus the single terminal slot.
#[derive(Debug)]
struct SearchState {
    tried: u64,
    failures: u64,
    terminal: Option<Outcome>,
}

/// Aggregates worker signals and decides when the search is over.
pub struct Coordinator {
    policy: FailurePolicy,
    sample_interval: u64,
    token: CancelToken,
    progress: Spinner,
    state: SearchState,
}

impl Coordinator {
    pub fn new(policy: FailurePolicy, sample_interval: u64, token: CancelToken, progress: Spinner) -> Self {
        Self { policy, sample_interval: sample_interval.max(1), token, progress, state: SearchState { tried: 0, failures: 0, terminal: None } }
    }

    /// Consumes signals until every worker has dropped its sender.
    ///
    /// A search that ends without a terminal transition ran out of
    /// candidates.
    pub async fn run(mut self, signals: Receiver<Signal>) -> SearchReport {
        let started = Instant::now();

        while let Ok(signal) = signals.recv_async().await {
            self.handle(signal);
        }

        self.progress.finish();

        let outcome = self.state.terminal.unwrap_or(Outcome::Exhausted);
        let report = SearchReport { outcome, tried: self.state.tried, failures: self.state.failures, elapsed: started.elapsed() };

        info!(tried = report.tried, failures = report.failures, elapsed = ?report.elapsed, found = report.outcome.is_found(), "search finished");
        report
    }

    fn handle(&mut self, signal: Signal) {
        match self.state.terminal {
            None => self.advance(signal),
            Some(Outcome::Failed { .. }) => {
                if let Signal::Found(recovery) = signal {
                    info!(line = recovery.line, format = %recovery.format, "passphrase found after fail-fast stop");
                    self.state.tried += 1;
                    self.state.terminal = Some(Outcome::Found(recovery));
                }
            }
            Some(_) => {}
        }
    }

    fn advance(&mut self, signal: Signal) {
        match signal {
            Signal::Tried { line } => self.record_attempt(line, "not valid"),
            Signal::Failed { line, failures } => {
                self.state.failures += 1;
                self.record_attempt(line, "decrypt failure");

                match self.policy {
                    FailurePolicy::FailFast => {
                        if let Some(failure) = failures.into_iter().next() {
                            error!(line, %failure, "decrypt failure, stopping search");
                            self.state.terminal = Some(Outcome::Failed { line, failure });
                            self.token.cancel();
                        }
                    }
                    FailurePolicy::Continue => {
                        if self.state.failures % FAILURE_LOG_INTERVAL == 1
                            && let Some(failure) = failures.first()
                        {
                            warn!(line, %failure, absorbed = self.state.failures, "decrypt failure, continuing");
                        }
                    }
                }
            }
            Signal::Found(recovery) => {
                info!(line = recovery.line, format = %recovery.format, "passphrase found");
                self.state.tried += 1;
                self.state.terminal = Some(Outcome::Found(recovery));
                self.token.cancel();
            }
        }
    }

    fn record_attempt(&mut self, line: u64, status: &str) {
        if let Some(health) = health_line(self.state.tried, self.sample_interval, line, status) {
            self.progress.println(&health);
        }

        self.state.tried += 1;
        self.progress.set_position(self.state.tried);
    }
}

/// The health-check line for the candidate reported after `tried` others.
///
/// Fires on the first candidate and then once every `interval`, so a fresh
/// search shows it is alive right away.
fn health_line(tried: u64, interval: u64, line: u64, status: &str) -> Option<String> {
    (tried % interval == 0).then(|| format!("Health Check: line {line} {status} | {tried} passwords tried so far"))
}
