//! Global Configuration Constants
//!
//! Compiled-in parameters for the passphrase search. The legacy format
//! constants (block size, key length, iteration counts) must match the
//! wallets they recover bit-for-bit and are not tunable at runtime. The
//! search parameters (pool size, sampling interval) are defaults that the
//! command line may override.

/// Application name used in user-facing output.
pub const APP_NAME: &str = "wallet-recover";

// === Cipher Parameters ===
// AES-256 in CBC mode. The first block of a salted export doubles as
// both the PBKDF2 salt and the CBC initialization vector.

/// AES block size in bytes.
///
/// Also the minimum length of a usable ciphertext and the size of the
/// salt/IV prefix carried by the salted formats.
pub const BLOCK_SIZE: usize = 16;

/// Length of the PBKDF2-derived key in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// PBKDF2 rounds used by the current export format and the unsalted legacy format.
pub const MODERN_ITERATIONS: u32 = 10;

/// PBKDF2 rounds used by the oldest salted export format.
pub const SINGLE_PASS_ITERATIONS: u32 = 1;

// === Search Parameters ===

/// Number of worker threads when none is configured.
pub const DEFAULT_POOL_SIZE: usize = 20;

/// Print a health-check line once every this many candidates.
pub const DEFAULT_SAMPLE_INTERVAL: u64 = 10_000;

/// Work channel depth per worker.
///
/// The feeder stays at most this many candidates ahead of each worker.
pub const CHANNEL_DEPTH_PER_WORKER: usize = 2;

/// Upper bound on the worker pool size accepted from the command line.
pub const MAX_POOL_SIZE: usize = 1024;
