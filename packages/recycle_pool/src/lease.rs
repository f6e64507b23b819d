use std::any;
use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::RecyclePool;

/// Temporary, exclusive use of a scratch array handed out by a [`RecyclePool`].
///
/// A lease owns its array and remembers whether the array came out of the pool's slot
/// or was freshly allocated. Callers never thread that provenance through by hand; it
/// travels inside the lease and is consumed together with it by
/// [`RecyclePool::release()`].
///
/// Dropping a lease without releasing it simply frees the array. That is always safe,
/// the pool just misses one refill opportunity.
///
/// The array's contents are whatever the previous user left behind. Callers that need
/// zeroed contents must clear explicitly.
///
/// # Example
///
/// ```rust
/// use recycle_pool::RecyclePool;
///
/// let pool = RecyclePool::<u32>::new();
///
/// let mut lease = pool.acquire(8);
/// lease[0] = 1234;
/// assert_eq!(lease.as_slice()[0], 1234);
///
/// _ = pool.release(lease);
/// ```
#[must_use]
pub struct Lease<T> {
    array: Box<[T]>,

    /// Set when the array came out of the pool's slot rather than a fresh allocation.
    from_pool: bool,
}

impl<T> Lease<T> {
    pub(crate) fn pooled(array: Box<[T]>) -> Self {
        debug_assert!(!array.is_empty(), "the slot never stores empty arrays");

        Self {
            array,
            from_pool: true,
        }
    }

    pub(crate) fn fresh(array: Box<[T]>) -> Self {
        Self {
            array,
            from_pool: false,
        }
    }

    /// The canonical zero-length lease. Empty boxed slices do not allocate, so every
    /// call hands out the same dangling-but-aligned storage.
    pub(crate) fn empty() -> Self {
        Self {
            array: Box::default(),
            from_pool: false,
        }
    }

    /// Whether the array was served from the pool's slot (`true`) or freshly
    /// allocated (`false`).
    ///
    /// Useful when deciding whether clearing the contents before release is worth the
    /// work: a freshly allocated array that will not be retained is about to become
    /// unreachable anyway.
    #[must_use]
    pub fn is_pooled(&self) -> bool {
        self.from_pool
    }

    /// Length of the leased array. Always at least the `minimum_len` that was passed
    /// to [`RecyclePool::acquire()`], and possibly more.
    #[must_use]
    pub fn len(&self) -> usize {
        self.array.len()
    }

    /// Whether the leased array is zero-length.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.array.is_empty()
    }

    /// The leased array as a shared slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.array
    }

    /// The leased array as an exclusive slice.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.array
    }

    /// Consumes the lease, keeping the array permanently.
    ///
    /// The array never returns to the pool; use this when the scratch space turns
    /// out to be long-lived, such as a builder keeping an acquired array as its
    /// live segment.
    #[must_use]
    pub fn into_inner(self) -> Box<[T]> {
        self.array
    }
}

impl<T> Deref for Lease<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.array
    }
}

impl<T> DerefMut for Lease<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.array
    }
}

impl<T> fmt::Debug for Lease<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lease")
            .field(
                "item_type",
                &std::format_args!("{}", any::type_name::<T>()),
            )
            .field("len", &self.array.len())
            .field("from_pool", &self.from_pool)
            .finish()
    }
}

/// Exclusive-borrow variant of [`Lease`], returned by [`RecyclePool::fast_acquire()`].
///
/// The guard holds a mutable borrow of its pool for as long as it lives, so no other
/// acquire on the same pool can even be written while the guard is outstanding. The
/// borrow checker thereby rules out the nested-acquire aliasing hazard that a
/// convention-based fast path would merely document.
///
/// On drop, the array is returned to the pool's slot under the usual retention policy.
/// Call [`release()`][Self::release] instead of dropping to learn whether the array
/// was actually retained.
///
/// # Example
///
/// ```rust
/// use recycle_pool::RecyclePool;
///
/// let mut pool = RecyclePool::<u8>::new();
///
/// {
///     let mut scratch = pool.fast_acquire(32);
///     scratch.as_mut_slice().fill(0);
///     // Returned to the slot when `scratch` goes out of scope.
/// }
///
/// assert_eq!(pool.retained_len(), Some(32));
/// ```
#[must_use]
pub struct FastLease<'p, T> {
    pool: &'p RecyclePool<T>,

    /// `Some` until the guard is consumed by `release()` or `Drop`.
    lease: Option<Lease<T>>,
}

impl<'p, T> FastLease<'p, T> {
    pub(crate) fn new(pool: &'p RecyclePool<T>, lease: Lease<T>) -> Self {
        Self {
            pool,
            lease: Some(lease),
        }
    }

    /// Whether the array was served from the pool's slot.
    #[must_use]
    pub fn is_pooled(&self) -> bool {
        self.inner().is_pooled()
    }

    /// Length of the leased array.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner().len()
    }

    /// Whether the leased array is zero-length.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner().is_empty()
    }

    /// The leased array as a shared slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        self.inner().as_slice()
    }

    /// The leased array as an exclusive slice.
    #[must_use]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.lease
            .as_mut()
            .expect("lease is present until the guard is consumed")
            .as_mut_slice()
    }

    /// Returns the array to the pool and reports whether it was retained.
    ///
    /// Dropping the guard has the same effect on the pool; this method only adds the
    /// retention answer.
    #[must_use = "says whether the array was retained; just drop the guard if that does not matter"]
    pub fn release(mut self) -> bool {
        let lease = self
            .lease
            .take()
            .expect("lease is present until the guard is consumed");

        self.pool.release(lease)
    }

    fn inner(&self) -> &Lease<T> {
        self.lease
            .as_ref()
            .expect("lease is present until the guard is consumed")
    }
}

impl<T> Deref for FastLease<'_, T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for FastLease<'_, T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> Drop for FastLease<'_, T> {
    fn drop(&mut self) {
        if let Some(lease) = self.lease.take() {
            _ = self.pool.release(lease);
        }
    }
}

impl<T> fmt::Debug for FastLease<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FastLease")
            .field(
                "item_type",
                &std::format_args!("{}", any::type_name::<T>()),
            )
            .field("len", &self.lease.as_ref().map(Lease::len))
            .field("from_pool", &self.lease.as_ref().map(Lease::is_pooled))
            .finish()
    }
}
