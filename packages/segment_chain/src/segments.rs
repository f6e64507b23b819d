use std::any;
use std::fmt;
use std::iter::FusedIterator;
use std::sync::Arc;
use std::vec;

use crate::SegmentChain;

/// Iterator over the frozen segments of a [`SegmentChain`], oldest first.
///
/// Returned by [`SegmentChain::segments()`]. Construction walks the `previous` links
/// once, from the newest node back to the origin, then yields the collected used
/// prefixes in chronological order. No node is visited twice and no buffer is
/// touched beyond reading.
#[must_use]
pub struct Segments<'c, T> {
    inner: vec::IntoIter<&'c [T]>,
}

impl<'c, T> Segments<'c, T> {
    pub(crate) fn new(head: &'c SegmentChain<T>) -> Self {
        let mut slices = Vec::new();
        let mut cursor = Some(head);

        while let Some(node) = cursor {
            slices.push(node.as_slice());
            cursor = node.previous().map(Arc::as_ref);
        }

        // Collected newest-to-oldest; readers want append order.
        slices.reverse();

        Self {
            inner: slices.into_iter(),
        }
    }
}

impl<'c, T> Iterator for Segments<'c, T> {
    type Item = &'c [T];

    fn next(&mut self) -> Option<&'c [T]> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> DoubleEndedIterator for Segments<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        self.inner.next_back()
    }
}

impl<T> ExactSizeIterator for Segments<'_, T> {
    fn len(&self) -> usize {
        self.inner.len()
    }
}

impl<T> FusedIterator for Segments<'_, T> {}

impl<T> fmt::Debug for Segments<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Segments")
            .field(
                "item_type",
                &std::format_args!("{}", any::type_name::<T>()),
            )
            .field("remaining", &self.inner.len())
            .finish()
    }
}
