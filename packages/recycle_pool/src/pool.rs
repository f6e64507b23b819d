use std::any;
use std::cell::RefCell;
use std::fmt;

use crate::{FastLease, Lease};

/// Longest array the pool will retain, in elements.
///
/// Releasing a longer array drops it instead of caching it, which bounds how much
/// memory a pool can pin per thread. The ceiling is counted in elements, not bytes,
/// so it is independent of the element type's size.
pub const MAX_RECYCLE_LEN: usize = 1024;

/// A thread-confined, single-slot cache of scratch arrays of element type `T`.
///
/// The pool remembers the single most recently released array whose length is between
/// 1 and [`MAX_RECYCLE_LEN`] elements, and hands it back out on the next
/// [`acquire()`][Self::acquire] that it satisfies. There is no exact-fit search and no
/// shrinking: a request for 5 elements may receive an array of 64.
///
/// # Thread confinement
///
/// The slot uses single-threaded interior mutability, which makes the pool `!Sync`:
/// the compiler guarantees the slot is never visible to two threads at once, and that
/// guarantee is what permits lock-free operation. The usual arrangement is one pool
/// per thread, either owned by a per-worker context object or in a `thread_local!`
/// (created lazily on first access, torn down when the thread ends):
///
/// ```rust
/// use recycle_pool::RecyclePool;
///
/// thread_local! {
///     static SCRATCH: RecyclePool<char> = const { RecyclePool::new() };
/// }
///
/// let lease = SCRATCH.with(|pool| pool.acquire(128));
/// assert!(lease.len() >= 128);
/// ```
///
/// # Reentrancy
///
/// Handing out the retained array empties the slot first, so an acquire nested inside
/// an outstanding lease's lifetime misses the cache and allocates fresh. Correctness
/// is preserved at the cost of a cache miss, never at the cost of two leases aliasing
/// one array.
///
/// # Contents are not cleared
///
/// Recycled arrays carry whatever the previous user wrote. Callers that need zeroed
/// contents must clear explicitly; freshly allocated arrays are default-filled.
pub struct RecyclePool<T> {
    /// `None`, or an array with `1 ≤ len ≤ MAX_RECYCLE_LEN`.
    slot: RefCell<Option<Box<[T]>>>,
}

impl<T> RecyclePool<T> {
    /// Creates an empty pool.
    ///
    /// This is a `const fn` so the pool can live in a `thread_local!` with a `const`
    /// initializer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            slot: RefCell::new(None),
        }
    }

    /// Length of the currently retained array, or `None` if the slot is empty.
    #[must_use]
    pub fn retained_len(&self) -> Option<usize> {
        self.slot.borrow().as_ref().map(|array| array.len())
    }

    /// Drops the retained array, if any.
    pub fn clear(&self) {
        self.slot.borrow_mut().take();
    }

    /// Consumes a lease, retaining its array in the slot when it qualifies.
    ///
    /// An array qualifies when its length is between 1 and [`MAX_RECYCLE_LEN`]
    /// elements. A qualifying array **overwrites** whatever the slot already held;
    /// the incoming array is never compared against the current occupant.
    ///
    /// Returns whether the array was retained. Callers that clear sensitive contents
    /// can use the answer to skip clearing an array that was dropped anyway.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::{MAX_RECYCLE_LEN, RecyclePool};
    ///
    /// let pool = RecyclePool::<u8>::new();
    ///
    /// let small = pool.acquire(16);
    /// assert!(pool.release(small));
    ///
    /// let oversized = pool.acquire(MAX_RECYCLE_LEN + 1);
    /// assert!(!pool.release(oversized));
    /// ```
    #[must_use = "says whether the array was retained; ignore with `_ =` if that does not matter"]
    pub fn release(&self, lease: Lease<T>) -> bool {
        let array = lease.into_inner();

        if array.is_empty() || array.len() > MAX_RECYCLE_LEN {
            return false;
        }

        *self.slot.borrow_mut() = Some(array);
        true
    }
}

impl<T> RecyclePool<T>
where
    T: Copy + Default,
{
    /// Returns a lease over an array of at least `minimum_len` elements.
    ///
    /// If the slot holds an array of sufficient length, that array is handed out and
    /// the slot is emptied. Otherwise a fresh array of exactly `minimum_len` elements
    /// is allocated and the slot is left untouched. Requests larger than
    /// [`MAX_RECYCLE_LEN`] skip the slot entirely, since no retained array could
    /// satisfy them.
    ///
    /// A `minimum_len` of zero yields a lease over the shared zero-length array,
    /// which allocates nothing and is never retained on release.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::RecyclePool;
    ///
    /// let pool = RecyclePool::<u8>::new();
    ///
    /// let first = pool.acquire(10);
    /// assert_eq!(first.len(), 10);
    /// _ = pool.release(first);
    ///
    /// // The next fitting request receives the same array, length included.
    /// let second = pool.acquire(5);
    /// assert!(second.is_pooled());
    /// assert_eq!(second.len(), 10);
    /// # _ = pool.release(second);
    /// ```
    pub fn acquire(&self, minimum_len: usize) -> Lease<T> {
        if minimum_len == 0 {
            // Zero-length arrays are never stored, since storing one would never
            // satisfy any future nonzero request.
            return Lease::empty();
        }

        if minimum_len > MAX_RECYCLE_LEN {
            return Lease::fresh(Self::allocate(minimum_len));
        }

        {
            let mut slot = self.slot.borrow_mut();

            if slot
                .as_ref()
                .is_some_and(|array| array.len() >= minimum_len)
            {
                let array = slot.take().expect("slot was just observed occupied");
                return Lease::pooled(array);
            }
        }

        Lease::fresh(Self::allocate(minimum_len))
    }

    /// Returns an exclusive-borrow lease over an array of at least `minimum_len`
    /// elements.
    ///
    /// Same acquisition contract as [`acquire()`][Self::acquire]. The returned
    /// [`FastLease`] holds the `&mut` borrow of the pool, so no other acquire on this
    /// pool can coexist with it, and it returns its array to the slot automatically
    /// on drop. Use this for tight acquire-use-release spans where forgetting the
    /// release would otherwise cost an allocation on every call.
    ///
    /// # Example
    ///
    /// ```rust
    /// use recycle_pool::RecyclePool;
    ///
    /// let mut pool = RecyclePool::<u32>::new();
    ///
    /// for _ in 0..3 {
    ///     let mut scratch = pool.fast_acquire(100);
    ///     scratch[0] = 42;
    ///     // Returned to the slot here; iterations after the first reuse it.
    /// }
    /// ```
    pub fn fast_acquire(&mut self, minimum_len: usize) -> FastLease<'_, T> {
        let lease = self.acquire(minimum_len);

        FastLease::new(self, lease)
    }

    fn allocate(len: usize) -> Box<[T]> {
        vec![T::default(); len].into_boxed_slice()
    }
}

impl<T> Default for RecyclePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for RecyclePool<T> {
    #[cfg_attr(test, mutants::skip)] // Diagnostic output has no behavioral contract to mutate against.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecyclePool")
            .field(
                "item_type",
                &std::format_args!("{}", any::type_name::<T>()),
            )
            .field("retained_len", &self.retained_len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    #![allow(
        clippy::indexing_slicing,
        reason = "we do not need to worry about these things when writing test code"
    )]

    use static_assertions::{assert_impl_all, assert_not_impl_any};

    use super::*;

    assert_impl_all!(RecyclePool<u8>: Send, Default);
    assert_not_impl_any!(RecyclePool<u8>: Sync);

    #[test]
    fn acquire_on_empty_pool_allocates_exact_length() {
        let pool = RecyclePool::<u8>::new();

        let lease = pool.acquire(10);

        assert_eq!(lease.len(), 10);
        assert!(!lease.is_pooled());
        assert_eq!(pool.retained_len(), None);
    }

    #[test]
    fn round_trip() {
        let pool = RecyclePool::<u8>::new();

        let first = pool.acquire(10);
        assert!(!first.is_pooled());
        assert!(pool.release(first));

        let second = pool.acquire(5);
        assert!(second.is_pooled());
        assert_eq!(second.len(), 10);
        assert!(pool.release(second));

        let oversized = pool.acquire(2000);
        assert!(!oversized.is_pooled());
        assert_eq!(oversized.len(), 2000);

        // The oversized request bypassed the slot entirely.
        assert_eq!(pool.retained_len(), Some(10));
    }

    #[test]
    fn outstanding_leases_never_alias() {
        let pool = RecyclePool::<u8>::new();

        let seed = pool.acquire(8);
        _ = pool.release(seed);

        let first = pool.acquire(8);
        let second = pool.acquire(8);

        assert!(first.is_pooled());
        assert!(!second.is_pooled());
        assert_ne!(first.as_slice().as_ptr(), second.as_slice().as_ptr());
    }

    #[test]
    fn retention_threshold_is_inclusive() {
        let pool = RecyclePool::<u8>::new();

        let at_limit = pool.acquire(MAX_RECYCLE_LEN);
        assert!(pool.release(at_limit));
        assert_eq!(pool.retained_len(), Some(MAX_RECYCLE_LEN));

        pool.clear();

        let beyond_limit = pool.acquire(MAX_RECYCLE_LEN + 1);
        assert!(!pool.release(beyond_limit));
        assert_eq!(pool.retained_len(), None);

        let empty = pool.acquire(0);
        assert!(!pool.release(empty));
        assert_eq!(pool.retained_len(), None);
    }

    #[test]
    fn zero_length_acquire_shares_one_array() {
        let pool = RecyclePool::<u64>::new();

        let first = pool.acquire(0);
        let second = pool.acquire(0);

        assert_eq!(first.as_slice().as_ptr(), second.as_slice().as_ptr());
        assert!(!first.is_pooled());
    }

    #[test]
    fn zero_length_release_leaves_slot_alone() {
        let pool = RecyclePool::<u8>::new();

        let seed = pool.acquire(8);
        _ = pool.release(seed);

        let empty = pool.acquire(0);
        assert!(!pool.release(empty));

        assert_eq!(pool.retained_len(), Some(8));
    }

    #[test]
    fn release_overwrites_current_occupant() {
        let pool = RecyclePool::<u8>::new();

        let long = pool.acquire(100);
        _ = pool.release(long);

        let short = pool.acquire(2000); // bypasses the slot
        drop(short);

        let replacement = pool.acquire(50);
        assert!(replacement.is_pooled());
        assert_eq!(replacement.len(), 100);
        _ = pool.release(replacement);

        // A shorter qualifying array still replaces the longer occupant.
        let shorter = Lease::fresh(vec![0_u8; 20].into_boxed_slice());
        assert!(pool.release(shorter));
        assert_eq!(pool.retained_len(), Some(20));
    }

    #[test]
    fn miss_leaves_slot_untouched() {
        let pool = RecyclePool::<u8>::new();

        let small = pool.acquire(8);
        _ = pool.release(small);

        // Within the retention ceiling but longer than the retained array.
        let lease = pool.acquire(100);
        assert!(!lease.is_pooled());

        assert_eq!(pool.retained_len(), Some(8));
    }

    #[test]
    fn recycled_contents_are_not_cleared() {
        let pool = RecyclePool::<u8>::new();

        let mut first = pool.acquire(4);
        first.as_mut_slice().copy_from_slice(&[1, 2, 3, 4]);
        _ = pool.release(first);

        let second = pool.acquire(2);
        assert!(second.is_pooled());
        assert_eq!(&second[..4], &[1, 2, 3, 4]);
    }

    #[test]
    fn fresh_arrays_are_default_filled() {
        let pool = RecyclePool::<u32>::new();

        let lease = pool.acquire(16);

        assert!(lease.iter().all(|&element| element == 0));
    }

    #[test]
    fn nested_acquire_misses_instead_of_aliasing() {
        let pool = RecyclePool::<u8>::new();

        let seed = pool.acquire(4);
        _ = pool.release(seed);

        let outer = pool.acquire(4);
        assert!(outer.is_pooled());

        // The slot was emptied on hand-out, so the "nested" call allocates.
        let nested = pool.acquire(4);
        assert!(!nested.is_pooled());

        _ = pool.release(nested);
        _ = pool.release(outer);
    }

    #[test]
    fn fast_lease_returns_array_on_drop() {
        let mut pool = RecyclePool::<u8>::new();

        {
            let mut scratch = pool.fast_acquire(32);
            assert!(!scratch.is_pooled());
            scratch[0] = 9;
        }

        assert_eq!(pool.retained_len(), Some(32));

        let reused = pool.fast_acquire(16);
        assert!(reused.is_pooled());
        assert_eq!(reused[0], 9);
    }

    #[test]
    fn fast_lease_release_reports_retention() {
        let mut pool = RecyclePool::<u8>::new();

        let within = pool.fast_acquire(64);
        assert!(within.release());
        assert_eq!(pool.retained_len(), Some(64));

        let oversized = pool.fast_acquire(MAX_RECYCLE_LEN + 1);
        assert!(!oversized.release());
        assert_eq!(pool.retained_len(), Some(64));
    }

    #[test]
    fn thread_local_pools_are_independent() {
        thread_local! {
            static POOL: RecyclePool<u8> = const { RecyclePool::new() };
        }

        POOL.with(|pool| {
            let lease = pool.acquire(8);
            _ = pool.release(lease);
            assert_eq!(pool.retained_len(), Some(8));
        });

        std::thread::spawn(|| {
            POOL.with(|pool| {
                // This thread's slot starts empty regardless of the other thread's.
                assert_eq!(pool.retained_len(), None);

                let lease = pool.acquire(4);
                assert!(!lease.is_pooled());
            });
        })
        .join()
        .unwrap();

        POOL.with(|pool| assert_eq!(pool.retained_len(), Some(8)));
    }

    #[test]
    fn clear_empties_the_slot() {
        let pool = RecyclePool::<u8>::new();

        let lease = pool.acquire(8);
        _ = pool.release(lease);
        assert_eq!(pool.retained_len(), Some(8));

        pool.clear();
        assert_eq!(pool.retained_len(), None);
    }

    #[test]
    fn debug_output_mentions_retained_length() {
        let pool = RecyclePool::<u8>::new();

        let lease = pool.acquire(8);
        _ = pool.release(lease);

        let output = format!("{pool:?}");
        assert!(output.contains("RecyclePool"));
        assert!(output.contains('8'));
    }
}
