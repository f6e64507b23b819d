use std::any;
use std::fmt;
use std::iter;
use std::sync::Arc;

use crate::{Error, Result, Segments};

/// One frozen segment in the immutable history of an append-only buffer.
///
/// A chain node owns a buffer of which the first [`used()`][Self::used] elements are
/// meaningful, plus a reference-counted link to the previously frozen node. Walking
/// the [`previous()`][Self::previous] links from the newest node to the origin and
/// concatenating each node's used prefix, oldest first, reconstructs everything the
/// buffer ever contained before its current live segment.
///
/// # Immutability
///
/// [`freeze()`][Self::freeze] takes the buffer by value, so once a node exists there
/// is no path — owned, borrowed, or otherwise — through which the frozen contents can
/// change. That is what makes it safe for any number of readers to traverse a chain
/// while the builder that froze it keeps appending to a separate live segment, and
/// for snapshots taken at different times to share nodes. Nodes are freed when the
/// last chain or snapshot referencing them is dropped.
///
/// The live segment itself is outside the chain: it is owned and mutated by one
/// builder and must not be read concurrently with that mutation.
///
/// # Example
///
/// ```rust
/// use segment_chain::SegmentChain;
///
/// let history = SegmentChain::freeze(vec![1_u8, 2, 3, 4].into_boxed_slice(), 4, None)?;
/// let history = SegmentChain::freeze(vec![5_u8, 6, 0, 0].into_boxed_slice(), 2, Some(history))?;
///
/// assert_eq!(history.total_len(), 6);
/// assert_eq!(history.materialize(&[7, 8]), vec![1, 2, 3, 4, 5, 6, 7, 8]);
/// # Ok::<(), segment_chain::Error>(())
/// ```
pub struct SegmentChain<T> {
    /// Owned storage; `buffer[..used]` is the frozen content and never changes.
    buffer: Box<[T]>,

    used: usize,

    /// Link toward the origin. `None` marks the oldest segment. Links are only ever
    /// created at construction, so chains are acyclic and finite.
    previous: Option<Arc<SegmentChain<T>>>,

    /// Frozen length of this node plus all predecessors, fixed at construction.
    total_len: usize,
}

impl<T> SegmentChain<T> {
    /// Freezes a buffer into a new immutable chain node.
    ///
    /// The node takes ownership of exactly the buffer passed in — nothing is copied,
    /// and the caller cannot continue mutating the storage it just handed over. The
    /// first `used` elements are the segment's content; any remaining capacity is
    /// dead space that the node carries but never exposes.
    ///
    /// Pass the current chain head as `previous` to extend a chain, or `None` to
    /// start one.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyBuffer`] if `buffer` has zero capacity;
    /// [`Error::UsedBeyondCapacity`] if `used > buffer.len()`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use segment_chain::SegmentChain;
    ///
    /// let buffer = vec![b'h', b'i', 0, 0].into_boxed_slice();
    ///
    /// // Only the first two elements were ever written.
    /// let node = SegmentChain::freeze(buffer, 2, None)?;
    ///
    /// assert_eq!(node.as_slice(), b"hi");
    /// assert_eq!(node.capacity(), 4);
    /// # Ok::<(), segment_chain::Error>(())
    /// ```
    pub fn freeze(buffer: Box<[T]>, used: usize, previous: Option<Arc<Self>>) -> Result<Arc<Self>> {
        if buffer.is_empty() {
            return Err(Error::EmptyBuffer);
        }

        if used > buffer.len() {
            return Err(Error::UsedBeyondCapacity {
                used,
                capacity: buffer.len(),
            });
        }

        Ok(Arc::new(Self::new_unchecked(buffer, used, previous)))
    }

    /// Unchecked constructor for call sites that have already validated their
    /// arguments.
    pub(crate) fn new_unchecked(
        buffer: Box<[T]>,
        used: usize,
        previous: Option<Arc<Self>>,
    ) -> Self {
        debug_assert!(!buffer.is_empty());
        debug_assert!(used <= buffer.len());

        let total_len = previous
            .as_ref()
            .map_or(0, |node| node.total_len)
            .checked_add(used)
            .expect("total frozen length exceeds the range of virtual memory");

        Self {
            buffer,
            used,
            previous,
            total_len,
        }
    }

    /// The frozen content of this node: the used prefix of its buffer.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.buffer
            .get(..self.used)
            .expect("used never exceeds capacity")
    }

    /// Number of meaningful elements in this node's buffer.
    #[must_use]
    pub fn used(&self) -> usize {
        self.used
    }

    /// Full length of this node's buffer, including any unused tail.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// The node frozen immediately before this one, or `None` at the chain's origin.
    #[must_use]
    pub fn previous(&self) -> Option<&Arc<Self>> {
        self.previous.as_ref()
    }

    /// Total frozen length of this node and all of its predecessors.
    #[must_use]
    pub fn total_len(&self) -> usize {
        self.total_len
    }

    /// Number of nodes in the chain, this one included.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.segments().len()
    }

    /// Iterates over the frozen segments in chronological order, oldest first.
    ///
    /// Each node is visited exactly once and yielded as its used prefix. This is the
    /// streaming counterpart of [`materialize()`][Self::materialize] for consumers
    /// that do not need one contiguous buffer.
    ///
    /// # Example
    ///
    /// ```rust
    /// use segment_chain::SegmentChain;
    ///
    /// let chain = SegmentChain::freeze(vec![1_u8, 2].into_boxed_slice(), 2, None)?;
    /// let chain = SegmentChain::freeze(vec![3_u8, 4].into_boxed_slice(), 2, Some(chain))?;
    ///
    /// let segments: Vec<&[u8]> = chain.segments().collect();
    /// assert_eq!(segments, vec![&[1_u8, 2][..], &[3_u8, 4][..]]);
    /// # Ok::<(), segment_chain::Error>(())
    /// ```
    pub fn segments(&self) -> Segments<'_, T> {
        Segments::new(self)
    }
}

impl<T> SegmentChain<T>
where
    T: Copy,
{
    /// Reconstructs the full logical buffer: the frozen history in append order,
    /// followed by the live segment's current content.
    ///
    /// The output is sized exactly once, to `total_len() + live.len()`. Cost is
    /// linear in the total stored length — every historical element must be visited
    /// at read time; that is the price the chain pays for never copying on append.
    ///
    /// The caller owns `live`; pass `&[]` when only the frozen history is wanted.
    #[must_use]
    pub fn materialize(&self, live: &[T]) -> Vec<T> {
        let total = self
            .total_len
            .checked_add(live.len())
            .expect("total logical length exceeds the range of virtual memory");

        let mut logical = Vec::with_capacity(total);

        for segment in self.segments() {
            logical.extend_from_slice(segment);
        }

        logical.extend_from_slice(live);

        debug_assert_eq!(logical.len(), total);
        logical
    }

    /// Iterates over the frozen history element by element, oldest first.
    pub fn iter(&self) -> iter::Copied<iter::Flatten<Segments<'_, T>>> {
        self.segments().flatten().copied()
    }
}

impl<'c, T> IntoIterator for &'c SegmentChain<T>
where
    T: Copy,
{
    type Item = T;
    type IntoIter = iter::Copied<iter::Flatten<Segments<'c, T>>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T> Drop for SegmentChain<T> {
    fn drop(&mut self) {
        // A naive drop would recurse once per `previous` link and can overflow the
        // stack on long chains. Unlink iteratively instead, stopping at the first
        // node that something else still references.
        let mut previous = self.previous.take();

        while let Some(node) = previous {
            previous = match Arc::try_unwrap(node) {
                Ok(mut inner) => inner.previous.take(),
                Err(_shared) => None,
            };
        }
    }
}

impl<T> fmt::Debug for SegmentChain<T> {
    #[cfg_attr(test, mutants::skip)] // Diagnostic output has no behavioral contract to mutate against.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SegmentChain")
            .field(
                "item_type",
                &std::format_args!("{}", any::type_name::<T>()),
            )
            .field("used", &self.used)
            .field("capacity", &self.buffer.len())
            .field("total_len", &self.total_len)
            .field("has_previous", &self.previous.is_some())
            .finish()
    }
}
