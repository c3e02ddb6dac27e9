//! Candidate feeder: the input stage of the search.
//!
//! Streams the dictionary one line at a time into the work channel. Workers
//! never touch the source directly; the bounded channel keeps the feeder at
//! most a few candidates ahead of them.
//!
//! The stream is single-pass. A read error ends it early and is logged, never
//! escalated: downstream sees the same closed channel as for a normal end of
//! file and treats it as "no more candidates".

use flume::Sender;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::{debug, warn};

use crate::cancel::CancelToken;
use crate::types::Candidate;

/// Feeds trimmed, non-empty dictionary lines to the workers.
pub struct Feeder {
    token: CancelToken,
}

impl Feeder {
    #[inline]
    pub fn new(token: CancelToken) -> Self {
        Self { token }
    }

    /// Sends every candidate in `input` in file order.
    ///
    /// Stops early when the search is cancelled or every worker has gone
    /// away. Returns the number of candidates handed over. Dropping `sender`
    /// on return closes the work channel.
    pub async fn feed<R: AsyncRead + Unpin>(&self, input: R, sender: Sender<Candidate>) -> u64 {
        let mut lines = BufReader::new(input).lines();
        let mut line = 0u64;
        let mut fed = 0u64;

        loop {
            if self.token.is_cancelled() {
                debug!(fed, "search cancelled, feeder stopping");
                break;
            }

            let text = match lines.next_line().await {
                Ok(Some(text)) => text,
                Ok(None) => break,
                Err(error) => {
                    warn!(line = line + 1, %error, "dictionary read failed, no more candidates");
                    break;
                }
            };
            line += 1;

            let passphrase = text.trim();
            if passphrase.is_empty() {
                continue;
            }

            if sender.send_async(Candidate::new(passphrase, line)).await.is_err() {
                debug!(fed, "work channel closed, feeder stopping");
                break;
            }
            fed += 1;
        }

        debug!(fed, lines = line, "feeder finished");
        fed
    }
}
