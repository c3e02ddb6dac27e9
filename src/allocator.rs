//! Global allocator.
//!
//! Every attempt allocates a derived key, a ciphertext copy and a plaintext
//! buffer, on many threads at once. mimalloc handles that churn with
//! thread-local heaps instead of contending on the system allocator.

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;
