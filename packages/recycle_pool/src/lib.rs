//! This package provides [`RecyclePool`], a thread-confined, single-slot cache that lets
//! hot code reuse transient scratch arrays instead of allocating a fresh one on every call.
//!
//! The pool remembers the single most recently released array (subject to a size ceiling)
//! and hands it back out on the next request that fits. That is deliberately all it does:
//! one slot, no locking, no cross-thread sharing. Code that allocates and discards a
//! scratch buffer on every call through a hot path gets most of the benefit of a full
//! pooling layer from exactly this much machinery.
//!
//! # Features
//!
//! - **Single-slot recycling**: at most one array is retained at a time, bounding memory
//!   retention to [`MAX_RECYCLE_LEN`] elements per pool.
//! - **Thread confinement by construction**: the pool is `!Sync`, so the compiler rules
//!   out cross-thread access to the slot. Place one pool per thread (for example in a
//!   `thread_local!`) and no synchronization is ever needed.
//! - **Typed leases**: [`acquire()`][RecyclePool::acquire] returns a [`Lease`] that owns
//!   the array and records where it came from. A lease is consumed by
//!   [`release()`][RecyclePool::release], so returning the same array twice or using it
//!   after return is a compile error, not a runtime hazard.
//! - **Reentrancy safe**: the slot is emptied when its array is handed out, so a nested
//!   acquire during an outstanding lease misses the cache and allocates fresh instead of
//!   aliasing the outstanding array.
//! - **Borrow-checked fast path**: [`fast_acquire()`][RecyclePool::fast_acquire] returns
//!   a guard that holds an exclusive borrow of the pool and returns the array to the slot
//!   on drop.
//!
//! # Example
//!
//! ```rust
//! use recycle_pool::RecyclePool;
//!
//! let pool = RecyclePool::<u8>::new();
//!
//! // Nothing is retained yet, so this allocates.
//! let mut scratch = pool.acquire(64);
//! assert!(!scratch.is_pooled());
//! scratch[0] = b'x';
//!
//! // Returning the array makes it available for the next request that fits.
//! assert!(pool.release(scratch));
//!
//! let reused = pool.acquire(16);
//! assert!(reused.is_pooled());
//! assert_eq!(reused.len(), 64);
//! # _ = pool.release(reused);
//! ```
//!
//! For per-thread use, pair the pool with a `thread_local!`:
//!
//! ```rust
//! use recycle_pool::RecyclePool;
//!
//! thread_local! {
//!     static SCRATCH: RecyclePool<u8> = const { RecyclePool::new() };
//! }
//!
//! let sum: u32 = SCRATCH.with(|pool| {
//!     let mut buf = pool.acquire(256);
//!     buf.as_mut_slice().fill(1);
//!     let sum = buf.iter().map(|&b| u32::from(b)).sum();
//!     _ = pool.release(buf);
//!     sum
//! });
//! assert_eq!(sum, 256);
//! ```

mod lease;
mod pool;

pub use lease::*;
pub use pool::*;
