use alloc::borrow::ToOwned;
use alloc::string::String;
use core::cell::Cell;
use core::fmt::Debug;

use tracing::trace;

use crate::Error;
use crate::Status;
use crate::hash_table::Entry;
use crate::hash_table::HashTable;
use crate::probe::Probing;

const KEY_HASH_MULTIPLIER: u64 = 7;
const KEY_HASH_INCREMENT: u64 = 11;
const KEY_HASH_MODULUS: u64 = 7127;

/// Hashes a key as `(7 · Σ char codes + 11) mod 7127`.
///
/// The table reduces the result modulo its capacity. Anagrams share a hash.
pub fn key_hash(key: &str) -> u64 {
    let sum = key
        .chars()
        .fold(0u64, |acc, c| acc.wrapping_add(u64::from(u32::from(c))));
    KEY_HASH_MULTIPLIER
        .wrapping_mul(sum)
        .wrapping_add(KEY_HASH_INCREMENT)
        % KEY_HASH_MODULUS
}

/// A fixed-capacity map from string keys to values.
///
/// Keys are placed with [`key_hash`] and collisions are resolved with linear
/// probing, which walks every slot. There is no separate "full" check: once
/// every slot on a key's probe sequence is taken, inserting that key fails with
/// [`Error::CollisionUnresolved`]. With the default policy that happens exactly
/// when the map holds `capacity` keys.
///
/// # Examples
///
/// ```rust
/// use probe_table::HashMap;
///
/// let mut map = HashMap::with_capacity(5).unwrap();
/// map.insert("a", "x").unwrap();
/// map.insert("a", "y").unwrap();
///
/// assert_eq!(map.len(), 1);
/// assert_eq!(map.get("a"), Ok(&"y"));
/// ```
#[derive(Clone)]
pub struct HashMap<V> {
    table: HashTable<(String, V)>,
    insert_status: Status,
    remove_status: Status,
    get_status: Cell<Status>,
}

impl<V: Debug> Debug for HashMap<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut map = f.debug_map();
        for (k, v) in self.iter() {
            map.entry(&k, v);
        }
        map.finish()
    }
}

impl<V> HashMap<V> {
    /// Creates an empty map with exactly `capacity` slots and linear probing
    /// with a stride of one.
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        Self::with_capacity_and_probing(capacity, Probing::LINEAR)
    }

    /// Creates an empty map with exactly `capacity` slots and the given
    /// probing policy.
    ///
    /// A policy that does not reach every slot, such as a linear stride that
    /// shares a factor with `capacity`, can make inserts fail before the map
    /// is full.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::HashMap;
    /// use probe_table::Probing;
    ///
    /// let map: HashMap<u32> =
    ///     HashMap::with_capacity_and_probing(16, Probing::Linear { stride: 3 }).unwrap();
    /// assert_eq!(map.capacity(), 16);
    /// ```
    pub fn with_capacity_and_probing(capacity: usize, probing: Probing) -> Result<Self, Error> {
        Ok(Self {
            table: HashTable::with_capacity(capacity, probing)?,
            insert_status: Status::NotRun,
            remove_status: Status::NotRun,
            get_status: Cell::new(Status::NotRun),
        })
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the map holds no entries.
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Returns the fixed capacity of the map.
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

    /// Outcome of the last call to [`get`](Self::get) or
    /// [`get_mut`](Self::get_mut).
    pub fn get_status(&self) -> Status {
        self.get_status.get()
    }

    /// Inserts a key-value pair.
    ///
    /// If the key is already present its value is replaced in place and the
    /// old value is returned; the number of entries does not change.
    /// Otherwise the pair takes the first vacant slot on the key's probe
    /// sequence. Fails with [`Error::CollisionUnresolved`] if there is none.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::Error;
    /// use probe_table::HashMap;
    ///
    /// let mut map = HashMap::with_capacity(2).unwrap();
    /// assert_eq!(map.insert("one", 1), Ok(None));
    /// assert_eq!(map.insert("one", 11), Ok(Some(1)));
    /// map.insert("two", 2).unwrap();
    /// assert_eq!(map.insert("three", 3), Err(Error::CollisionUnresolved));
    /// ```
    pub fn insert(&mut self, key: &str, value: V) -> Result<Option<V>, Error> {
        let outcome = self.try_insert(key, value);
        self.insert_status = Status::from(&outcome);
        outcome
    }

    fn try_insert(&mut self, key: &str, value: V) -> Result<Option<V>, Error> {
        match self.table.entry(key_hash(key), |(k, _)| k == key)? {
            Entry::Occupied(mut entry) => {
                Ok(Some(core::mem::replace(&mut entry.get_mut().1, value)))
            }
            Entry::Vacant(entry) => {
                entry.insert((key.to_owned(), value));
                Ok(None)
            }
        }
    }

    /// Removes a key and returns its value.
    ///
    /// Fails with [`Error::NotFound`] if the key is not present.
    pub fn remove(&mut self, key: &str) -> Result<V, Error> {
        let outcome = self
            .table
            .remove(key_hash(key), |(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or(Error::NotFound);
        if outcome.is_err() {
            trace!(key, "remove: key not present");
        }
        self.remove_status = Status::from(&outcome);
        outcome
    }

    /// Returns a reference to the value stored for `key`.
    ///
    /// Fails with [`Error::NotFound`] if the key is not present.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::Error;
    /// use probe_table::HashMap;
    /// use probe_table::Status;
    ///
    /// let mut map = HashMap::with_capacity(5).unwrap();
    /// map.insert("key", 42).unwrap();
    ///
    /// assert_eq!(map.get("key"), Ok(&42));
    /// assert_eq!(map.get_status(), Status::Ok);
    /// assert_eq!(map.get("nope"), Err(Error::NotFound));
    /// assert_eq!(map.get_status(), Status::Failed(Error::NotFound));
    /// ```
    pub fn get(&self, key: &str) -> Result<&V, Error> {
        let outcome = self
            .table
            .find(key_hash(key), |(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or(Error::NotFound);
        self.get_status.set(Status::from(&outcome));
        outcome
    }

    /// Returns a mutable reference to the value stored for `key`.
    ///
    /// Fails with [`Error::NotFound`] if the key is not present.
    pub fn get_mut(&mut self, key: &str) -> Result<&mut V, Error> {
        let outcome = self
            .table
            .find_mut(key_hash(key), |(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or(Error::NotFound);
        self.get_status.set(Status::from(&outcome));
        outcome
    }

    /// Returns `true` if the map holds an entry for `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.table
            .find(key_hash(key), |(k, _)| k == key)
            .is_some()
    }

    /// Removes all entries. The capacity and the status registers are kept.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Returns an iterator over the entries of the map.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            inner: self.table.iter(),
        }
    }

    /// Returns an iterator over the keys of the map.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.iter().map(|(k, _)| k)
    }

    /// Returns an iterator over the values of the map.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.iter().map(|(_, v)| v)
    }

    /// Returns how many entries sit at each probe distance from their home
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

/// An iterator over the entries of a `HashMap`.
pub struct Iter<'a, V> {
    inner: crate::hash_table::Iter<'a, (String, V)>,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = (&'a str, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|(k, v)| (k.as_str(), v))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<'a, V> IntoIterator for &'a HashMap<V> {
    type IntoIter = Iter<'a, V>;
    type Item = (&'a str, &'a V);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
