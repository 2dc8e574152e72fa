//! A fixed-capacity open-addressing hash table.
//!
//! [`HashTable`] stores values in a flat array of slots and resolves
//! collisions by walking a [`ProbeSeq`]. It never grows: a lookup that walks
//! its whole probe sequence without finding a match or a vacancy reports
//! [`Error::CollisionUnresolved`].
//!
//! Like a raw table, it does not hash anything itself. Callers pass the hash of
//! the value they are looking for together with an equality predicate, and
//! the table remembers the hash of each stored value.
//!
//! Removing a value leaves a tombstone behind. Lookups walk past tombstones,
//! so values placed further along the same probe chain stay reachable, and
//! inserts reuse the first tombstone they passed once the value is known to be
//! absent.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;

use tracing::debug;

use crate::Error;
use crate::probe::ProbeSeq;
use crate::probe::Probing;

#[derive(Clone, Debug)]
enum Slot<V> {
    Empty,
    Tombstone,
    Occupied { hash: u64, value: V },
}

impl<V> Slot<V> {
    #[inline(always)]
    fn value(&self) -> Option<&V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }

    #[inline(always)]
    fn value_mut(&mut self) -> Option<&mut V> {
        match self {
            Slot::Occupied { value, .. } => Some(value),
            _ => None,
        }
    }
}

/// Debug statistics for probe analysis.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone)]
pub struct DebugStats {
    /// Number of values currently in the table
    pub populated: usize,
    /// Fixed number of slots
    pub capacity: usize,
    /// Slots left behind by removals
    pub tombstones: usize,
    /// Slots that have never been filled since the last clear
    pub empty: usize,
    /// populated / capacity
    pub load_factor: f64,
    /// Longest probe distance of any stored value
    pub max_probe_distance: usize,
}

#[cfg(any(test, feature = "stats"))]
impl DebugStats {
    /// Pretty-print the debug statistics.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        println!("=== Hash Table Debug Statistics ===");
        println!(
            "Population: {}/{} ({:.2}% load factor)",
            self.populated,
            self.capacity,
            self.load_factor * 100.0
        );
        println!("Tombstones: {}", self.tombstones);
        println!("Empty slots: {}", self.empty);
        println!("Max probe distance: {}", self.max_probe_distance);
    }
}

/// Number of stored values found at each probe distance.
///
/// `distances[d]` counts the values that sit `d` attempts into their probe
/// sequence; `distances[0]` are the values stored at their home slot.
#[cfg(any(test, feature = "stats"))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProbeHistogram {
    /// Values per probe distance.
    pub distances: Vec<usize>,
}

#[cfg(any(test, feature = "stats"))]
impl ProbeHistogram {
    /// Total number of values counted.
    pub fn total(&self) -> usize {
        self.distances.iter().sum()
    }

    /// Print the histogram, one bar per distance.
    #[cfg(feature = "std")]
    pub fn print(&self) {
        let total = self.total().max(1);
        println!("=== Probe Length Histogram ===");
        for (distance, &count) in self.distances.iter().enumerate() {
            let pct = count as f64 / total as f64 * 100.0;
            let bar = "#".repeat((pct / 2.0).ceil() as usize);
            println!("{distance:>4}: {count:>8} ({pct:>6.2}%) {bar}");
        }
    }
}

/// A fixed-capacity hash table driven by caller-supplied hashes and equality
/// predicates.
///
/// # Examples
///
/// ```rust
/// use probe_table::HashTable;
/// use probe_table::Probing;
/// use probe_table::hash_table::Entry;
///
/// let mut table: HashTable<(u32, &str)> = HashTable::with_capacity(8, Probing::Quadratic).unwrap();
///
/// // The caller decides what the hash is; here it is just the id.
/// match table.entry(7, |&(id, _)| id == 7).unwrap() {
///     Entry::Vacant(entry) => {
///         entry.insert((7, "seven"));
///     }
///     Entry::Occupied(_) => unreachable!(),
/// }
///
/// assert_eq!(table.find(7, |&(id, _)| id == 7), Some(&(7, "seven")));
/// assert_eq!(table.len(), 1);
/// ```
#[derive(Clone)]
pub struct HashTable<V> {
    slots: Box<[Slot<V>]>,
    populated: usize,
    tombstones: usize,
    probing: Probing,
}

impl<V: Debug> Debug for HashTable<V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HashTable")
            .field("capacity", &self.capacity())
            .field("populated", &self.populated)
            .field("tombstones", &self.tombstones)
            .field("probing", &self.probing)
            .field("slots", &self.slots)
            .finish()
    }
}

impl<V> HashTable<V> {
    /// Creates an empty table with exactly `capacity` slots.
    ///
    /// Returns [`Error::InvalidCapacity`] if `capacity` is zero.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::Error;
    /// use probe_table::HashTable;
    /// use probe_table::Probing;
    ///
    /// let table: HashTable<u64> = HashTable::with_capacity(10, Probing::TRIANGULAR).unwrap();
    /// assert_eq!(table.capacity(), 10);
    /// assert!(table.is_empty());
    ///
    /// assert_eq!(
    ///     HashTable::<u64>::with_capacity(0, Probing::Quadratic).unwrap_err(),
    ///     Error::InvalidCapacity
    /// );
    /// ```
    pub fn with_capacity(capacity: usize, probing: Probing) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity);
        }

        Ok(Self {
            slots: (0..capacity).map(|_| Slot::Empty).collect(),
            populated: 0,
            tombstones: 0,
            probing,
        })
    }

    /// Returns the fixed number of slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the number of values in the table.
    pub fn len(&self) -> usize {
        self.populated
    }

    /// Returns `true` if the table holds no values.
    pub fn is_empty(&self) -> bool {
        self.populated == 0
    }

    /// Returns the probing policy the table was created with.
    pub fn probing(&self) -> Probing {
        self.probing
    }

    /// Removes every value, leaving all slots empty.
    pub fn clear(&mut self) {
        for slot in self.slots.iter_mut() {
            *slot = Slot::Empty;
        }
        self.populated = 0;
        self.tombstones = 0;
    }

    /// Returns an iterator over the stored values in slot order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter {
            slots: self.slots.iter(),
            remaining: self.populated,
        }
    }

    #[inline(always)]
    fn probe(&self, hash: u64) -> ProbeSeq {
        ProbeSeq::new(hash, self.capacity(), self.probing)
    }

    fn find_index(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<usize> {
        for index in self.probe(hash) {
            match &self.slots[index] {
                Slot::Empty => return None,
                Slot::Tombstone => {}
                Slot::Occupied { hash: stored, value } => {
                    if *stored == hash && eq(value) {
                        return Some(index);
                    }
                }
            }
        }
        None
    }

    /// Returns a reference to the value matching `eq`, if any.
    ///
    /// The search stops at the first empty slot or when the probe sequence is
    /// exhausted.
    pub fn find(&self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&V> {
        let index = self.find_index(hash, eq)?;
        self.slots[index].value()
    }

    /// Returns a mutable reference to the value matching `eq`, if any.
    ///
    /// The value must keep hashing to `hash`.
    pub fn find_mut(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<&mut V> {
        let index = self.find_index(hash, eq)?;
        self.slots[index].value_mut()
    }

    /// Removes and returns the value matching `eq`, if any.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::HashTable;
    /// use probe_table::Probing;
    ///
    /// let mut table = HashTable::with_capacity(4, Probing::Quadratic).unwrap();
    /// table.entry(1, |&v: &u64| v == 1).unwrap().or_insert(1);
    ///
    /// assert_eq!(table.remove(1, |&v| v == 1), Some(1));
    /// assert_eq!(table.remove(1, |&v| v == 1), None);
    /// assert!(table.is_empty());
    /// ```
    pub fn remove(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Option<V> {
        let index = self.find_index(hash, eq)?;
        Some(self.vacate(index))
    }

    fn vacate(&mut self, index: usize) -> V {
        match core::mem::replace(&mut self.slots[index], Slot::Tombstone) {
            Slot::Occupied { value, .. } => {
                self.populated -= 1;
                self.tombstones += 1;
                value
            }
            _ => unreachable!("only occupied slots are vacated"),
        }
    }

    /// Looks up the entry for `hash`/`eq`.
    ///
    /// Walks the probe sequence until it finds a matching value, which yields
    /// an occupied entry, or an empty slot, which yields a vacant entry (at the
    /// first tombstone passed on the way, if there was one). If the sequence
    /// is exhausted first, the vacant entry uses the first tombstone seen;
    /// with no tombstone either, the collision cannot be resolved.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::Error;
    /// use probe_table::HashTable;
    /// use probe_table::Probing;
    ///
    /// let mut table = HashTable::with_capacity(4, Probing::Quadratic).unwrap();
    ///
    /// // Squares mod 4 only reach two slots from any start.
    /// table.entry(0, |&v: &u64| v == 0).unwrap().or_insert(0);
    /// table.entry(4, |&v: &u64| v == 4).unwrap().or_insert(4);
    /// assert_eq!(
    ///     table.entry(8, |&v: &u64| v == 8).unwrap_err(),
    ///     Error::CollisionUnresolved
    /// );
    /// assert_eq!(table.len(), 2);
    /// ```
    pub fn entry(&mut self, hash: u64, eq: impl Fn(&V) -> bool) -> Result<Entry<'_, V>, Error> {
        let mut vacancy = None;
        let mut found = None;
        for index in self.probe(hash) {
            match &self.slots[index] {
                Slot::Empty => {
                    vacancy.get_or_insert(index);
                    break;
                }
                Slot::Tombstone => {
                    vacancy.get_or_insert(index);
                }
                Slot::Occupied { hash: stored, value } => {
                    if *stored == hash && eq(value) {
                        found = Some(index);
                        break;
                    }
                }
            }
        }

        match (found, vacancy) {
            (Some(index), _) => Ok(Entry::Occupied(OccupiedEntry { table: self, index })),
            (None, Some(index)) => Ok(Entry::Vacant(VacantEntry {
                table: self,
                hash,
                index,
            })),
            (None, None) => {
                debug!(
                    hash,
                    len = self.populated,
                    capacity = self.capacity(),
                    "probe sequence exhausted without a vacant slot"
                );
                Err(Error::CollisionUnresolved)
            }
        }
    }

    /// Returns how many values sit at each probe distance from their home
    /// slot.
    #[cfg(any(test, feature = "stats"))]
    pub fn probe_histogram(&self) -> ProbeHistogram {
        let mut distances = Vec::new();
        for (index, slot) in self.slots.iter().enumerate() {
            let Slot::Occupied { hash, .. } = slot else {
                continue;
            };
            if let Some(distance) = self.probe(*hash).position(|candidate| candidate == index) {
                if distances.len() <= distance {
                    distances.resize(distance + 1, 0);
                }
                distances[distance] += 1;
            }
        }
        ProbeHistogram { distances }
    }

    /// Returns occupancy and probe statistics.
    #[cfg(any(test, feature = "stats"))]
    pub fn debug_stats(&self) -> DebugStats {
        let capacity = self.capacity();
        DebugStats {
            populated: self.populated,
            capacity,
            tombstones: self.tombstones,
            empty: capacity - self.populated - self.tombstones,
            load_factor: self.populated as f64 / capacity as f64,
            max_probe_distance: self
                .probe_histogram()
                .distances
                .len()
                .saturating_sub(1),
        }
    }
}

/// A view into a single slot of the table, either holding a matching value or
/// ready to accept one.
pub enum Entry<'a, V> {
    /// The table holds a value matching the lookup.
    Occupied(OccupiedEntry<'a, V>),
    /// No matching value; the entry points at the slot a new value would use.
    Vacant(VacantEntry<'a, V>),
}

impl<'a, V> Entry<'a, V> {
    /// Inserts `default` if the entry is vacant and returns a mutable
    /// reference to the value in the entry.
    pub fn or_insert(self, default: V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default),
        }
    }

    /// Inserts the result of `default` if the entry is vacant and returns a
    /// mutable reference to the value in the entry.
    pub fn or_insert_with(self, default: impl FnOnce() -> V) -> &'a mut V {
        match self {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => entry.insert(default()),
        }
    }
}

impl<V: Debug> Debug for Entry<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Entry::Occupied(entry) => f.debug_tuple("Entry").field(entry).finish(),
            Entry::Vacant(entry) => f.debug_tuple("Entry").field(entry).finish(),
        }
    }
}

/// A vacant slot in the table.
pub struct VacantEntry<'a, V> {
    table: &'a mut HashTable<V>,
    hash: u64,
    index: usize,
}

impl<'a, V> VacantEntry<'a, V> {
    /// Stores `value` in the slot and returns a mutable reference to it.
    pub fn insert(self, value: V) -> &'a mut V {
        let table = self.table;
        if matches!(table.slots[self.index], Slot::Tombstone) {
            table.tombstones -= 1;
        }
        table.populated += 1;

        let slot = &mut table.slots[self.index];
        *slot = Slot::Occupied {
            hash: self.hash,
            value,
        };
        match slot {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!("slot was just filled"),
        }
    }

    /// The slot index the value will be written to.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<V> Debug for VacantEntry<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("VacantEntry")
            .field("hash", &self.hash)
            .field("index", &self.index)
            .finish()
    }
}

/// An occupied slot in the table holding a value that matched the lookup.
pub struct OccupiedEntry<'a, V> {
    table: &'a mut HashTable<V>,
    index: usize,
}

impl<'a, V> OccupiedEntry<'a, V> {
    /// Gets a reference to the value in the entry.
    pub fn get(&self) -> &V {
        match &self.table.slots[self.index] {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!("occupied entry points at an occupied slot"),
        }
    }

    /// Gets a mutable reference to the value in the entry.
    pub fn get_mut(&mut self) -> &mut V {
        match &mut self.table.slots[self.index] {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!("occupied entry points at an occupied slot"),
        }
    }

    /// Converts the entry into a mutable reference bound to the table's
    /// lifetime.
    pub fn into_mut(self) -> &'a mut V {
        match &mut self.table.slots[self.index] {
            Slot::Occupied { value, .. } => value,
            _ => unreachable!("occupied entry points at an occupied slot"),
        }
    }

    /// Removes the value, leaving a tombstone, and returns it.
    pub fn remove(self) -> V {
        self.table.vacate(self.index)
    }

    /// The slot index holding the value.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<V: Debug> Debug for OccupiedEntry<'_, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("OccupiedEntry")
            .field("index", &self.index)
            .field("value", self.get())
            .finish()
    }
}

/// An iterator over the values of a [`HashTable`].
pub struct Iter<'a, V> {
    slots: core::slice::Iter<'a, Slot<V>>,
    remaining: usize,
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for slot in self.slots.by_ref() {
            if let Some(value) = slot.value() {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

/// A consuming iterator over the values of a [`HashTable`].
pub struct IntoIter<V> {
    slots: alloc::vec::IntoIter<Slot<V>>,
    remaining: usize,
}

impl<V> Iterator for IntoIter<V> {
    type Item = V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        for slot in self.slots.by_ref() {
            if let Slot::Occupied { value, .. } = slot {
                self.remaining -= 1;
                return Some(value);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> ExactSizeIterator for IntoIter<V> {}

impl<V> IntoIterator for HashTable<V> {
    type IntoIter = IntoIter<V>;
    type Item = V;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter {
            remaining: self.populated,
            slots: Vec::from(self.slots).into_iter(),
        }
    }
}

impl<'a, V> IntoIterator for &'a HashTable<V> {
    type IntoIter = Iter<'a, V>;
    type Item = &'a V;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
