//! Object pooling for per-frame allocation reuse.
//!
//! A [`Pool<T>`] hands out values with [`obtain`](Pool::obtain) and takes them
//! back with [`free`](Pool::free). Freed values are [`reset`](Poolable::reset)
//! but keep their allocations, so a frame that submits the same number of
//! objects as the previous one allocates nothing.
//!
//! # Example
//!
//! ```
//! use starmesh_core::pool::{Pool, Poolable};
//!
//! #[derive(Debug, Default)]
//! struct Scratch {
//!     data: Vec<u8>,
//! }
//!
//! impl Poolable for Scratch {
//!     fn new_empty() -> Self {
//!         Self::default()
//!     }
//!     fn reset(&mut self) {
//!         self.data.clear();
//!     }
//! }
//!
//! let mut pool = Pool::<Scratch>::new();
//! let mut item = pool.obtain();
//! item.data.extend_from_slice(&[1, 2, 3]);
//! pool.free(item);
//!
//! let item = pool.obtain();
//! assert!(item.data.is_empty());
//! assert!(item.data.capacity() >= 3);
//! ```

/// Trait for types that can be pooled and reused.
///
/// Implementors must be able to create an empty instance and clear their
/// contents while preserving allocated capacity.
pub trait Poolable {
    /// Create a new empty instance for pool initialization.
    fn new_empty() -> Self;

    /// Reset the value to an empty state, preserving allocated capacity.
    ///
    /// For example, call `Vec::clear()` rather than replacing with a new `Vec`.
    fn reset(&mut self);
}

/// A free list of reusable values.
#[derive(Debug)]
pub struct Pool<T: Poolable> {
    free: Vec<T>,
    max_free: usize,
    created: usize,
}

impl<T: Poolable> Pool<T> {
    /// Create an unbounded pool.
    pub fn new() -> Self {
        Self::with_max_free(usize::MAX)
    }

    /// Create a pool that keeps at most `max_free` idle values.
    ///
    /// Values freed beyond that limit are dropped.
    pub fn with_max_free(max_free: usize) -> Self {
        Self {
            free: Vec::new(),
            max_free,
            created: 0,
        }
    }

    /// Take a value from the pool, creating one when the pool is empty.
    ///
    /// The returned value is always in its reset state.
    pub fn obtain(&mut self) -> T {
        match self.free.pop() {
            Some(value) => value,
            None => {
                self.created += 1;
                T::new_empty()
            }
        }
    }

    /// Reset a value and return it to the pool.
    pub fn free(&mut self, mut value: T) {
        if self.free.len() < self.max_free {
            value.reset();
            self.free.push(value);
        }
    }

    /// Return every value produced by `values` to the pool.
    pub fn free_all(&mut self, values: impl IntoIterator<Item = T>) {
        for value in values {
            self.free(value);
        }
    }

    /// Number of idle values ready for reuse.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Total number of values this pool has ever constructed.
    pub fn created_count(&self) -> usize {
        self.created
    }

    /// Drop every idle value.
    pub fn clear(&mut self) {
        self.free.clear();
    }
}

impl<T: Poolable> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}
