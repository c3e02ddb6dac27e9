//! Fixed-size worker pool running the format chain on a Rayon thread pool.
//!
//! Every pool thread runs one [`Worker`] loop. Workers share the ciphertext,
//! the format chain and the oracle by reference; none of them is written
//! after setup, so no locking is needed.
//!
//! # Cancellation
//!
//! Workers check the token right after receiving a candidate and right after
//! finishing a format-chain attempt. An attempt in flight always runs to
//! completion.

use std::sync::Arc;

use anyhow::{Context, Result};
use flume::{Receiver, Sender};
use rayon::ThreadPoolBuilder;
use tracing::debug;

use crate::cancel::CancelToken;
use crate::format::{AttemptOutcome, FormatChain};
use crate::oracle::Oracle;
use crate::types::{Candidate, Recovery, Signal};
use crate::wallet::Ciphertext;

/// Why a worker loop returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkerExit {
    /// This worker found the passphrase and raised the cancel flag.
    Won,

    /// The cancel flag was raised elsewhere.
    Cancelled,

    /// The work channel was closed and drained.
    Exhausted,
}

/// One pool thread's view of the search.
struct Worker<'a> {
    id: usize,
    chain: &'a FormatChain,
    ciphertext: &'a Ciphertext,
    oracle: &'a dyn Oracle,
    token: &'a CancelToken,
}

impl Worker<'_> {
    fn run(&self, candidates: &Receiver<Candidate>, signals: &Sender<Signal>) -> WorkerExit {
        let mut processed = 0u64;

        let exit = loop {
            let Ok(candidate) = candidates.recv() else {
                break WorkerExit::Exhausted;
            };

            if self.token.is_cancelled() {
                break WorkerExit::Cancelled;
            }

            let outcome = self.chain.try_formats(&candidate.passphrase, self.ciphertext.as_bytes(), self.oracle);
            processed += 1;

            let signal = match outcome {
                AttemptOutcome::Success { plaintext, format } => {
                    // Only the worker that raises the flag reports; any later
                    // winner lost the race and stays silent.
                    if !self.token.cancel() {
                        break WorkerExit::Cancelled;
                    }
                    let recovery = Recovery { passphrase: candidate.passphrase, plaintext, format, line: candidate.line };
                    let _ = signals.send(Signal::Found(recovery));
                    break WorkerExit::Won;
                }
                AttemptOutcome::NotValid => Signal::Tried { line: candidate.line },
                AttemptOutcome::DecryptFailure(failures) => Signal::Failed { line: candidate.line, failures },
            };

            if self.token.is_cancelled() {
                break WorkerExit::Cancelled;
            }

            // The coordinator only goes away once every sender is dropped,
            // so a failed send cannot happen while this worker is alive.
            let _ = signals.send(signal);
        };

        debug!(worker = self.id, processed, ?exit, "worker finished");
        exit
    }
}

/// A fixed number of workers sharing one work channel.
pub struct WorkerPool {
    size: usize,
    chain: FormatChain,
    ciphertext: Arc<Ciphertext>,
    oracle: Arc<dyn Oracle>,
    token: CancelToken,
}

impl WorkerPool {
    pub fn new(size: usize, chain: FormatChain, ciphertext: Arc<Ciphertext>, oracle: Arc<dyn Oracle>, token: CancelToken) -> Self {
        Self { size, chain, ciphertext, oracle, token }
    }

    /// Runs every worker to completion and returns how each one exited.
    ///
    /// Blocks the calling thread. Both channel endpoints are dropped on
    /// return, which unblocks a feeder still waiting to send and lets the
    /// coordinator observe the end of the signal stream.
    pub fn run(self, candidates: Receiver<Candidate>, signals: Sender<Signal>) -> Result<Vec<WorkerExit>> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(self.size)
            .thread_name(|index| format!("worker-{index}"))
            .build()
            .context("failed to start worker threads")?;

        debug!(workers = self.size, formats = self.chain.len(), "worker pool started");

        let exits = pool.broadcast(|ctx| {
            let worker = Worker { id: ctx.index(), chain: &self.chain, ciphertext: &self.ciphertext, oracle: self.oracle.as_ref(), token: &self.token };
            worker.run(&candidates, &signals)
        });

        Ok(exits)
    }
}

#[cfg(test)]
mod tests {
    use flume::{bounded, unbounded};

    use super::*;
    use crate::format::FormatKind;
    use crate::format::fixture::{WALLET_JSON, seal};
    use crate::oracle::JsonOracle;

    fn pool(size: usize, ciphertext: Vec<u8>, token: &CancelToken) -> WorkerPool {
        let ciphertext = Arc::new(Ciphertext::from_bytes(ciphertext).unwrap());
        WorkerPool::new(size, FormatChain::default(), ciphertext, Arc::new(JsonOracle), token.clone())
    }

    fn queue(words: &[&str]) -> Receiver<Candidate> {
        let (tx, rx) = unbounded();
        for (i, word) in words.iter().enumerate() {
            tx.send(Candidate::new(word, i as u64 + 1)).unwrap();
        }
        rx
    }

    #[test]
    fn test_exhausts_without_match() {
        let token = CancelToken::new();
        let (signal_tx, signal_rx) = unbounded();

        let exits = pool(3, seal(FormatKind::Modern, "right", WALLET_JSON), &token).run(queue(&["a", "b", "c", "d"]), signal_tx).unwrap();

        assert_eq!(exits, vec![WorkerExit::Exhausted; 3]);
        let signals: Vec<Signal> = signal_rx.drain().collect();
        assert_eq!(signals.len(), 4);
        assert!(signals.iter().all(|s| matches!(s, Signal::Tried { .. } | Signal::Failed { .. })));
        assert!(!token.is_cancelled());
    }

    #[test]
    fn test_single_winner_with_duplicates() {
        let token = CancelToken::new();
        let (signal_tx, signal_rx) = unbounded();
        let words = vec!["right"; 40];

        let exits = pool(8, seal(FormatKind::LegacyUnsalted, "right", WALLET_JSON), &token).run(queue(&words), signal_tx).unwrap();

        assert_eq!(exits.iter().filter(|e| **e == WorkerExit::Won).count(), 1);
        assert!(token.is_cancelled());

        let found: Vec<Signal> = signal_rx.drain().filter(|s| matches!(s, Signal::Found(_))).collect();
        assert_eq!(found.len(), 1);
        let Signal::Found(recovery) = &found[0] else { unreachable!() };
        assert_eq!(recovery.passphrase.expose_secret(), "right");
        assert_eq!(recovery.plaintext, WALLET_JSON);
        assert_eq!(recovery.format, FormatKind::LegacyUnsalted);
    }

    #[test]
    fn test_cancelled_workers_skip_candidates() {
        let token = CancelToken::new();
        token.cancel();
        let (signal_tx, signal_rx) = unbounded();

        let exits = pool(2, seal(FormatKind::Modern, "right", WALLET_JSON), &token).run(queue(&["right", "x", "y"]), signal_tx).unwrap();

        assert!(exits.iter().all(|e| *e == WorkerExit::Cancelled));
        assert!(signal_rx.is_empty());
    }

    #[test]
    fn test_decrypt_failures_are_forwarded() {
        let token = CancelToken::new();
        let (signal_tx, signal_rx) = unbounded();

        let exits = pool(2, vec![0u8; 21], &token).run(queue(&["a", "b"]), signal_tx).unwrap();

        assert_eq!(exits, vec![WorkerExit::Exhausted; 2]);
        let failed = signal_rx.drain().filter(|s| matches!(s, Signal::Failed { failures, .. } if failures.len() == 3)).count();
        assert_eq!(failed, 2);
    }

    #[test]
    fn test_closing_run_unblocks_sender() {
        let token = CancelToken::new();
        token.cancel();
        let (work_tx, work_rx) = bounded(1);
        let (signal_tx, _signal_rx) = unbounded();
        work_tx.send(Candidate::new("a", 1)).unwrap();

        pool(1, vec![0u8; 32], &token).run(work_rx, signal_tx).unwrap();

        assert!(work_tx.send(Candidate::new("b", 2)).is_err());
    }
}
