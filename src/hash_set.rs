use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use tracing::trace;

use crate::DefaultHashBuilder;
use crate::Error;
use crate::Status;
use crate::hash_table::Entry;
use crate::hash_table::HashTable;
use crate::probe::Probing;

/// A fixed-capacity hash set using quadratic probing.
///
/// `HashSet<T, S>` stores up to `capacity` distinct values of type `T` and
/// uses the hasher builder `S` to find each value's home slot. Collisions are
/// resolved with quadratic probing, so on a capacity that is not prime an
/// insert may fail with [`Error::CollisionUnresolved`] before the set is full.
///
/// The outcome of the last `insert` and the last `remove` can be read back
/// through [`insert_status`](Self::insert_status) and
/// [`remove_status`](Self::remove_status).
#[derive(Clone)]
pub struct HashSet<T, S = DefaultHashBuilder> {
    table: HashTable<T>,
    hash_builder: S,
    insert_status: Status,
    remove_status: Status,
}

impl<T, S> PartialEq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn eq(&self, other: &Self) -> bool {
        if self.len() != other.len() {
            return false;
        }
        self.iter().all(|v| other.contains(v))
    }
}

impl<T, S> Eq for HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

impl<T, S> Debug for HashSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.table.iter()).finish()
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty set with exactly `capacity` slots and the given hasher
    /// builder.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(feature = "std")]
    /// # {
    /// use std::collections::hash_map::RandomState;
    ///
    /// use probe_table::HashSet;
    ///
    /// let set: HashSet<i32, _> = HashSet::with_capacity_and_hasher(100, RandomState::new()).unwrap();
    /// assert_eq!(set.capacity(), 100);
    /// assert!(set.is_empty());
    /// # }
    /// ```
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Result<Self, Error> {
        Ok(Self {
            table: HashTable::with_capacity(capacity, Probing::Quadratic)?,
            hash_builder,
            insert_status: Status::NotRun,
            remove_status: Status::NotRun,
        })
    }

    /// Returns the number of values in the set.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the fixed capacity of the set.
    pub fn capacity(&self) -> usize {
        self.table.capacity()
    }

    /// Outcome of the last call to [`insert`](Self::insert).
    pub fn insert_status(&self) -> Status {
        self.insert_status
    }

    /// Outcome of the last call to [`remove`](Self::remove).
    pub fn remove_status(&self) -> Status {
        self.remove_status
    }

    /// Adds a value to the set.
    ///
    /// Returns `Ok(true)` if the value was newly inserted and `Ok(false)` if
    /// it was already present. Fails with [`Error::Full`] when the set holds
    /// `capacity` values, and with [`Error::CollisionUnresolved`] when the
    /// probe sequence cycles without reaching a vacant slot. A failed insert
    /// leaves the set unchanged.
    ///
    /// # Examples
    ///
    /// With a hasher that maps integers to themselves, `1..=5` land on five
    /// different home slots and the set fills up completely:
    ///
    /// ```rust
    /// use core::hash::BuildHasherDefault;
    /// use core::hash::Hasher;
    ///
    /// use probe_table::Error;
    /// use probe_table::HashSet;
    ///
    /// #[derive(Default)]
    /// struct IntHasher(u64);
    ///
    /// impl Hasher for IntHasher {
    ///     fn finish(&self) -> u64 {
    ///         self.0
    ///     }
    ///
    ///     fn write(&mut self, bytes: &[u8]) {
    ///         for &byte in bytes {
    ///             self.0 = (self.0 << 8) | u64::from(byte);
    ///         }
    ///     }
    ///
    ///     fn write_i32(&mut self, i: i32) {
    ///         self.0 = i as u64;
    ///     }
    /// }
    ///
    /// let mut set: HashSet<i32, BuildHasherDefault<IntHasher>> = HashSet::with_capacity(5).unwrap();
    /// for v in 1..=5 {
    ///     assert_eq!(set.insert(v), Ok(true));
    /// }
    /// assert_eq!(set.insert(6), Err(Error::Full));
    /// assert_eq!(set.len(), 5);
    /// assert!(!set.contains(&6));
    /// ```
    pub fn insert(&mut self, value: T) -> Result<bool, Error> {
        let outcome = self.try_insert(value);
        self.insert_status = Status::from(&outcome);
        outcome
    }

    fn try_insert(&mut self, value: T) -> Result<bool, Error> {
        if self.table.len() == self.table.capacity() {
            trace!(
                capacity = self.table.capacity(),
                "insert rejected: set is full"
            );
            return Err(Error::Full);
        }

        let hash = self.hash_builder.hash_one(&value);
        match self.table.entry(hash, |v| v == &value)? {
            Entry::Occupied(_) => Ok(false),
            Entry::Vacant(entry) => {
                entry.insert(value);
                Ok(true)
            }
        }
    }

    /// Returns `true` if the set contains a value.
    pub fn contains(&self, value: &T) -> bool {
        self.get(value).is_some()
    }

    /// Returns a reference to the stored value equal to `value`, if any.
    pub fn get(&self, value: &T) -> Option<&T> {
        let hash = self.hash_builder.hash_one(value);
        self.table.find(hash, |v| v == value)
    }

    /// Removes a value from the set and returns it.
    ///
    /// Fails with [`Error::NotFound`] if the value is not present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_table::Error;
    /// use probe_table::HashSet;
    ///
    /// let mut set: HashSet<i32> = HashSet::with_capacity(4).unwrap();
    /// set.insert(1).unwrap();
    /// assert_eq!(set.remove(&1), Ok(1));
    /// assert_eq!(set.remove(&1), Err(Error::NotFound));
    /// # }
    /// ```
    pub fn remove(&mut self, value: &T) -> Result<T, Error> {
        let hash = self.hash_builder.hash_one(value);
        let outcome = self
            .table
            .remove(hash, |v| v == value)
            .ok_or(Error::NotFound);
        if outcome.is_err() {
            trace!(len = self.table.len(), "remove: value not present");
        }
        self.remove_status = Status::from(&outcome);
        outcome
    }

    /// Removes all values. The capacity and the status registers are kept.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the values of the set.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns how many values sit at each probe distance from their home
    /// slot.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> crate::hash_table::ProbeHistogram {
        self.table.probe_histogram()
    }

    /// Returns occupancy and probe statistics.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> crate::hash_table::DebugStats {
        self.table.debug_stats()
    }
}

impl<T, S> HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty set with exactly `capacity` slots using the default
    /// hasher builder.
    ///
    /// The default hasher is randomly seeded, so where a value lands differs
    /// from one set to the next. Quadratic probing reaches only part of the
    /// slots from any start, so such a set may reject an insert with
    /// [`Error::CollisionUnresolved`] before it holds `capacity` values. Pass
    /// a deterministic hasher to
    /// [`with_capacity_and_hasher`](Self::with_capacity_and_hasher) when the
    /// placement has to be reproducible.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_table::Error;
    /// use probe_table::HashSet;
    ///
    /// let set: HashSet<i32> = HashSet::with_capacity(10).unwrap();
    /// assert_eq!(set.capacity(), 10);
    ///
    /// assert_eq!(HashSet::<i32>::with_capacity(0).unwrap_err(), Error::InvalidCapacity);
    /// # }
    /// ```
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

/// An iterator over the values of a `HashSet`.
pub struct Iter<'a, T> {
    inner: crate::hash_table::Iter<'a, T>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

/// A consuming iterator over the values of a `HashSet`.
pub struct IntoIter<T> {
    inner: crate::hash_table::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<T, S> IntoIterator for HashSet<T, S> {
    type IntoIter = IntoIter<T>;
    type Item = T;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            inner: self.table.into_iter(),
        }
    }
}

impl<'a, T, S> IntoIterator for &'a HashSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    type IntoIter = Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
