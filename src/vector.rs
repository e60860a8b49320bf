//! A growable array with an explicit growth policy and an optional element deleter.
//!
//! Storage grows by [`GROWTH_FACTOR`] when it runs out of room, and only shrinks
//! when asked to with [`DynamicArray::reserve_count`].
use std::{collections::TryReserveError, sync::Arc};

/// Multiplier applied to the capacity each time the array must grow.
pub const GROWTH_FACTOR: f64 = 1.5;

/// Capacity used when the requested initial capacity is below [`MINIMUM_COUNT`].
pub const DEFAULT_COUNT: usize = 8;

/// Smallest initial capacity accepted as-is by [`DynamicArray::new`].
pub const MINIMUM_COUNT: usize = 2;

/// Callback receiving every element that leaves the array.
///
/// It is handed each removed, overwritten, cleared or released element exactly once.
/// Arrays holding `Send` elements stay `Send`, so a parsed tree can move between threads.
pub type Deleter<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Errors produced by [`DynamicArray`] operations.
#[derive(Debug, thiserror::Error)]
pub enum VectorError {
    /// The element type has no size
    #[error("Elements of a dynamic array must have a non-zero size")]
    ZeroSizedElement,

    /// Growing or shrinking the backing storage failed
    #[error("Could not allocate storage: {0}")]
    Allocation(#[from] TryReserveError),

    /// Attempted to reserve less room than the live elements need
    #[error("Cannot reserve {requested} elements; the array holds {count}")]
    BelowCount {
        /// The requested capacity
        requested: usize,

        /// The number of live elements
        count: usize,
    },
}

/// Contiguous storage for elements of one type, with a logical capacity that
/// follows a fixed growth factor.
///
/// Indexing through [`DynamicArray::at`] is only checked in debug builds;
/// callers must keep `index < count()`.
pub struct DynamicArray<T> {
    data: Vec<T>,
    reserved: usize,
    deleter: Option<Deleter<T>>,
}
impl<T> DynamicArray<T> {
    /// Creates an empty array with room for `count_hint` elements.
    ///
    /// Hints below [`MINIMUM_COUNT`] are replaced by [`DEFAULT_COUNT`].
    ///
    /// # Errors
    /// Fails if `T` is zero-sized, or if the storage cannot be allocated.
    pub fn new(count_hint: usize, deleter: Option<Deleter<T>>) -> Result<Self, VectorError> {
        if size_of::<T>() == 0 {
            return Err(VectorError::ZeroSizedElement);
        }

        let count = if count_hint < MINIMUM_COUNT {
            DEFAULT_COUNT
        } else {
            count_hint
        };

        let mut array = Self {
            data: Vec::new(),
            reserved: 0,
            deleter,
        };
        array.realloc(count)?;
        Ok(array)
    }

    /// Creates an element-wise copy of this array, sharing its deleter.
    ///
    /// The copy reserves the same capacity as the source.
    ///
    /// # Errors
    /// Fails if the storage cannot be allocated.
    pub fn try_clone(&self) -> Result<Self, VectorError>
    where
        T: Clone,
    {
        let mut data = Vec::new();
        data.try_reserve_exact(self.reserved)?;
        data.extend_from_slice(&self.data);
        Ok(Self {
            data,
            reserved: self.reserved,
            deleter: self.deleter.clone(),
        })
    }

    /// Releases the array, passing every live element to the deleter.
    pub fn release(self) {
        drop(self);
    }

    /// Returns the growth factor shared by every array.
    #[inline]
    #[must_use]
    pub fn growth_factor() -> f64 {
        GROWTH_FACTOR
    }

    /// Returns the capacity used when no usable hint is given.
    #[inline]
    #[must_use]
    pub fn default_count() -> usize {
        DEFAULT_COUNT
    }

    //
    // Element access
    //

    /// Returns the element at `index`.
    ///
    /// The caller must ensure `index < count()`.
    #[inline]
    #[must_use]
    pub fn at(&self, index: usize) -> &T {
        debug_assert!(index < self.data.len(), "index {index} out of range");
        &self.data[index]
    }

    /// Returns the element at `index` mutably.
    ///
    /// The caller must ensure `index < count()`.
    #[inline]
    pub fn at_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.data.len(), "index {index} out of range");
        &mut self.data[index]
    }

    /// Returns the first element, if any.
    #[inline]
    #[must_use]
    pub fn front(&self) -> Option<&T> {
        self.data.first()
    }

    /// Returns the last element, if any.
    #[inline]
    #[must_use]
    pub fn back(&self) -> Option<&T> {
        self.data.last()
    }

    /// Returns the live elements as a slice.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the live elements as a mutable slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Iterates over the live elements in order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    //
    // Capacity
    //

    /// Returns true if the array holds no elements.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of live elements.
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.data.len()
    }

    /// Returns the size in bytes of the live elements.
    #[inline]
    #[must_use]
    pub fn byte_size(&self) -> usize {
        self.data.len() * size_of::<T>()
    }

    /// Returns the number of elements the array can hold before growing.
    #[inline]
    #[must_use]
    pub fn max_count(&self) -> usize {
        self.reserved
    }

    /// Returns the size in bytes of the reserved storage.
    #[inline]
    #[must_use]
    pub fn max_byte_size(&self) -> usize {
        self.reserved * size_of::<T>()
    }

    /// Sets the capacity to exactly `new_count` elements, growing or shrinking the storage.
    ///
    /// # Errors
    /// Fails if `new_count` is below the live element count, or if allocation fails.
    pub fn reserve_count(&mut self, new_count: usize) -> Result<(), VectorError> {
        if new_count < self.data.len() {
            return Err(VectorError::BelowCount {
                requested: new_count,
                count: self.data.len(),
            });
        }

        if new_count == self.reserved {
            return Ok(());
        }

        self.realloc(new_count)
    }

    /// Sets the capacity to `new_size / size_of::<T>()` elements.
    ///
    /// # Errors
    /// See [`DynamicArray::reserve_count`].
    pub fn reserve_size(&mut self, new_size: usize) -> Result<(), VectorError> {
        self.reserve_count(new_size / size_of::<T>())
    }

    //
    // Modifiers
    //

    /// Removes every element, keeping the capacity.
    pub fn clear(&mut self) {
        for value in self.data.drain(..) {
            if let Some(deleter) = &self.deleter {
                deleter(value);
            }
        }
    }

    /// Inserts `value` at `index`, shifting the following elements right.
    ///
    /// # Errors
    /// Fails without modifying the array if growing the storage fails.
    pub fn insert(&mut self, index: usize, value: T) -> Result<(), VectorError> {
        debug_assert!(index <= self.data.len(), "index {index} out of range");
        self.grow_for(self.data.len() + 1)?;
        self.data.insert(index, value);
        Ok(())
    }

    /// Removes the element at `index`, shifting the following elements left.
    pub fn erase(&mut self, index: usize) {
        debug_assert!(index < self.data.len(), "index {index} out of range");
        let value = self.data.remove(index);
        self.dispose(value);
    }

    /// Removes the elements in `[first, last)`.
    pub fn erase_range(&mut self, first: usize, last: usize) {
        debug_assert!(first <= last && last <= self.data.len(), "invalid range");
        for value in self.data.drain(first..last) {
            if let Some(deleter) = &self.deleter {
                deleter(value);
            }
        }
    }

    /// Appends every value to the end of the array.
    ///
    /// The capacity is multiplied by the growth factor as many times as needed.
    ///
    /// # Errors
    /// Fails without modifying the array if growing the storage fails.
    pub fn append<I>(&mut self, values: I) -> Result<(), VectorError>
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let values = values.into_iter();
        self.grow_for(self.data.len() + values.len())?;
        self.data.extend(values);
        Ok(())
    }

    /// Appends a single value.
    ///
    /// # Errors
    /// Fails without modifying the array if growing the storage fails.
    pub fn push_back(&mut self, value: T) -> Result<(), VectorError> {
        self.append(std::iter::once(value))
    }

    /// Removes the last element. Returns false if the array was empty.
    pub fn pop_back(&mut self) -> bool {
        match self.data.pop() {
            Some(value) => {
                self.dispose(value);
                true
            }
            None => false,
        }
    }

    /// Overwrites the element at `index`.
    pub fn replace(&mut self, index: usize, value: T) {
        debug_assert!(index < self.data.len(), "index {index} out of range");
        let old = std::mem::replace(&mut self.data[index], value);
        self.dispose(old);
    }

    /// Overwrites consecutive elements starting at `index`.
    ///
    /// `index + values.len()` must not exceed `count()`.
    pub fn replace_multiple<I>(&mut self, index: usize, values: I)
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: ExactSizeIterator,
    {
        let values = values.into_iter();
        debug_assert!(index + values.len() <= self.data.len(), "invalid range");
        for (offset, value) in values.enumerate() {
            let old = std::mem::replace(&mut self.data[index + offset], value);
            if let Some(deleter) = &self.deleter {
                deleter(old);
            }
        }
    }

    fn dispose(&self, value: T) {
        if let Some(deleter) = &self.deleter {
            deleter(value);
        }
    }

    fn grow_for(&mut self, required: usize) -> Result<(), VectorError> {
        if required <= self.reserved {
            return Ok(());
        }

        let mut target = self.reserved;
        while target < required {
            target = grown(target);
        }
        self.realloc(target)
    }

    fn realloc(&mut self, new_count: usize) -> Result<(), VectorError> {
        if new_count > self.data.capacity() {
            self.data.try_reserve_exact(new_count - self.data.len())?;
        } else {
            self.data.shrink_to(new_count);
        }

        self.reserved = new_count;
        Ok(())
    }
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    reason = "Capacities stay far below f64's integer range"
)]
fn grown(count: usize) -> usize {
    let next = (count as f64 * GROWTH_FACTOR).ceil() as usize;
    next.max(count + 1)
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        if let Some(deleter) = self.deleter.take() {
            for value in self.data.drain(..) {
                deleter(value);
            }
        }
    }
}
impl<T: Clone> Clone for DynamicArray<T> {
    fn clone(&self) -> Self {
        let mut data = Vec::with_capacity(self.reserved);
        data.extend_from_slice(&self.data);
        Self {
            data,
            reserved: self.reserved,
            deleter: self.deleter.clone(),
        }
    }
}
impl<T: PartialEq> PartialEq for DynamicArray<T> {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}
impl<T: std::fmt::Debug> std::fmt::Debug for DynamicArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DynamicArray")
            .field("data", &self.data)
            .field("reserved", &self.reserved)
            .field("deleter", &self.deleter.is_some())
            .finish()
    }
}
impl<'a, T> IntoIterator for &'a DynamicArray<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}
impl<T> std::ops::Deref for DynamicArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.data
    }
}
