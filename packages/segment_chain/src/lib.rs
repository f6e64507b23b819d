//! This package provides [`SegmentChain`], a persistent backward-linked chain of
//! immutable buffer segments that records the historical contents of a growable
//! append-only buffer without copying already-written data.
//!
//! A builder that grows by reallocate-and-copy pays for every byte again each time it
//! outgrows its storage. A builder backed by a segment chain instead **freezes** its
//! full segment into an immutable node chained to the previous history and starts a
//! fresh live segment. Already-written data is never copied again; the cost moves to
//! read time, where reconstructing the logical buffer visits every stored element
//! once.
//!
//! # Features
//!
//! - **Zero-copy freezing**: [`freeze()`][SegmentChain::freeze] takes ownership of the
//!   segment's storage; no element is copied and the previous owner provably cannot
//!   keep mutating it.
//! - **Immutable, shareable history**: nodes never change after construction, so
//!   chains can be shared freely — across snapshots, and across threads — while a
//!   separate live segment keeps growing.
//! - **Order-faithful reads**: [`materialize()`][SegmentChain::materialize] and
//!   [`segments()`][SegmentChain::segments] reproduce the original append order,
//!   frozen history first, live content last.
//! - **Checked construction**: malformed freeze requests are reported as [`Error`]
//!   values rather than silently corrupting the chain.
//!
//! # Example
//!
//! ```rust
//! use segment_chain::SegmentChain;
//!
//! // The builder's first segment fills up with "AB" and gets frozen.
//! let first = SegmentChain::freeze(vec!['A', 'B'].into_boxed_slice(), 2, None)?;
//!
//! // The replacement segment fills with "CD"; freeze it onto the chain.
//! let second = SegmentChain::freeze(vec!['C', 'D'].into_boxed_slice(), 2, Some(first))?;
//!
//! // The live segment currently holds "EF". The logical buffer reads "ABCDEF".
//! let live = ['E', 'F'];
//! assert_eq!(second.materialize(&live), vec!['A', 'B', 'C', 'D', 'E', 'F']);
//! # Ok::<(), segment_chain::Error>(())
//! ```

mod chain;
mod error;
mod segments;

pub use chain::*;
pub use error::*;
pub use segments::*;
