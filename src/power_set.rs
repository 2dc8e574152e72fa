use core::fmt::Debug;
use core::hash::BuildHasher;
use core::hash::Hash;

use tracing::debug;
use tracing::trace;

use crate::DefaultHashBuilder;
use crate::Error;
use crate::Status;

/// A set of at most `capacity` distinct values with set algebra.
///
/// Storage is an ordinary growable hash set; the capacity is a logical bound
/// enforced by [`insert`](Self::insert), [`union`](Self::union) and
/// [`differ`](Self::differ). The two bulk operations build their result on a
/// working copy and only replace the contents when the result fits, so a
/// failed call leaves the set exactly as it was.
///
/// Every operation that takes another set accepts one with any hasher, since
/// the algebra only uses `contains` and iteration.
///
/// # Examples
///
/// ```rust
/// # #[cfg(any(feature = "std", feature = "foldhash"))]
/// # {
/// use probe_table::Error;
/// use probe_table::PowerSet;
///
/// let mut a: PowerSet<char> = PowerSet::with_capacity(3).unwrap();
/// a.insert('a').unwrap();
/// a.insert('b').unwrap();
///
/// let mut b: PowerSet<char> = PowerSet::with_capacity(10).unwrap();
/// for c in ['c', 'd', 'e'] {
///     b.insert(c).unwrap();
/// }
///
/// assert_eq!(a.union(&b), Err(Error::Full));
/// assert_eq!(a.len(), 2);
/// assert!(a.contains(&'a') && a.contains(&'b'));
/// # }
/// ```
#[derive(Clone)]
pub struct PowerSet<T, S = DefaultHashBuilder> {
    elements: hashbrown::HashSet<T, S>,
    capacity: usize,
    insert_status: Status,
    remove_status: Status,
    union_status: Status,
    differ_status: Status,
}

impl<T, S> Debug for PowerSet<T, S>
where
    T: Debug,
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_set().entries(self.elements.iter()).finish()
    }
}

impl<T, S, S2> PartialEq<PowerSet<T, S2>> for PowerSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
    S2: BuildHasher,
{
    fn eq(&self, other: &PowerSet<T, S2>) -> bool {
        self.len() == other.len() && self.is_subset(other)
    }
}

impl<T, S> Eq for PowerSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
}

impl<T, S> PowerSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Creates an empty set bounded to `capacity` values, using the given
    /// hasher builder.
    ///
    /// Fails with [`Error::InvalidCapacity`] when `capacity` is zero.
    pub fn with_capacity_and_hasher(capacity: usize, hash_builder: S) -> Result<Self, Error> {
        if capacity == 0 {
            return Err(Error::InvalidCapacity);
        }
        Ok(Self {
            elements: hashbrown::HashSet::with_hasher(hash_builder),
            capacity,
            insert_status: Status::NotRun,
            remove_status: Status::NotRun,
            union_status: Status::NotRun,
            differ_status: Status::NotRun,
        })
    }

    /// Returns the number of values in the set.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Returns `true` if the set contains no values.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Returns the maximum number of values the set may hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Outcome of the last call to [`insert`](Self::insert).
    pub fn insert_status(&self) -> Status {
        self.insert_status
    }

    /// Outcome of the last call to [`remove`](Self::remove).
    pub fn remove_status(&self) -> Status {
        self.remove_status
    }

    /// Outcome of the last call to [`union`](Self::union).
    pub fn union_status(&self) -> Status {
        self.union_status
    }

    /// Outcome of the last call to [`differ`](Self::differ).
    pub fn differ_status(&self) -> Status {
        self.differ_status
    }

    /// Returns `true` if the set contains `value`.
    pub fn contains(&self, value: &T) -> bool {
        self.elements.contains(value)
    }

    /// Returns an iterator over the values in arbitrary order.
    pub fn iter(&self) -> hashbrown::hash_set::Iter<'_, T> {
        self.elements.iter()
    }

    /// Adds a value to the set.
    ///
    /// Returns `Ok(true)` if the value was added and `Ok(false)` if it was
    /// already present. A set at capacity rejects every insert with
    /// [`Error::Full`], including one of a value it already holds.
    pub fn insert(&mut self, value: T) -> Result<bool, Error> {
        let outcome = if self.elements.len() >= self.capacity {
            trace!(
                capacity = self.capacity,
                "insert rejected: set is full"
            );
            Err(Error::Full)
        } else {
            Ok(self.elements.insert(value))
        };
        self.insert_status = Status::from(&outcome);
        outcome
    }

    /// Removes a value and returns it.
    ///
    /// Fails with [`Error::NotFound`] if the value is not present.
    pub fn remove(&mut self, value: &T) -> Result<T, Error> {
        let outcome = self.elements.take(value).ok_or(Error::NotFound);
        self.remove_status = Status::from(&outcome);
        outcome
    }

    /// Keeps only the values also present in `other`.
    ///
    /// The result is never larger than the current set, so this cannot fail.
    pub fn intersect<S2: BuildHasher>(&mut self, other: &PowerSet<T, S2>) {
        self.elements.retain(|v| other.contains(v));
    }

    /// Returns how many values are in both sets.
    pub fn count_same<S2: BuildHasher>(&self, other: &PowerSet<T, S2>) -> usize {
        self.iter().filter(|v| other.contains(v)).count()
    }

    /// Returns how many values are in exactly one of the two sets.
    ///
    /// This is the size [`differ`](Self::differ) would produce.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_table::PowerSet;
    ///
    /// let mut a: PowerSet<&str> = PowerSet::with_capacity(10).unwrap();
    /// let mut b: PowerSet<&str> = PowerSet::with_capacity(10).unwrap();
    /// for v in ["a", "b", "c"] {
    ///     a.insert(v).unwrap();
    /// }
    /// for v in ["b", "d", "e"] {
    ///     b.insert(v).unwrap();
    /// }
    /// assert_eq!(a.count_same(&b), 1);
    /// assert_eq!(a.count_different(&b), 4);
    /// # }
    /// ```
    pub fn count_different<S2: BuildHasher>(&self, other: &PowerSet<T, S2>) -> usize {
        self.len() + other.len() - 2 * self.count_same(other)
    }

    /// Returns `true` if every value of `self` is in `other`.
    pub fn is_subset<S2: BuildHasher>(&self, other: &PowerSet<T, S2>) -> bool {
        self.len() <= other.len() && self.iter().all(|v| other.contains(v))
    }

    /// Returns `true` if every value of `other` is in `self`.
    pub fn is_superset<S2: BuildHasher>(&self, other: &PowerSet<T, S2>) -> bool {
        other.is_subset(self)
    }

    /// Returns `true` if the two sets share no value.
    pub fn is_disjoint<S2: BuildHasher>(&self, other: &PowerSet<T, S2>) -> bool {
        self.iter().all(|v| !other.contains(v))
    }
}

impl<T, S> PowerSet<T, S>
where
    T: Hash + Eq + Clone,
    S: BuildHasher + Clone,
{
    /// Adds every value of `other` that is not already present.
    ///
    /// Fails with [`Error::Full`] if the union would exceed the capacity, in
    /// which case the set is unchanged.
    pub fn union<S2: BuildHasher>(&mut self, other: &PowerSet<T, S2>) -> Result<(), Error> {
        let mut working = self.elements.clone();
        for value in other.iter() {
            if !working.contains(value) {
                working.insert(value.clone());
            }
        }
        let outcome = self.commit("union", working);
        self.union_status = Status::from(&outcome);
        outcome
    }

    /// Replaces the contents with the symmetric difference of both sets:
    /// values of `other` already present are removed, the rest are added.
    ///
    /// Fails with [`Error::Full`] if the result would exceed the capacity, in
    /// which case the set is unchanged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # #[cfg(any(feature = "std", feature = "foldhash"))]
    /// # {
    /// use probe_table::PowerSet;
    ///
    /// let mut a: PowerSet<u8> = PowerSet::with_capacity(10).unwrap();
    /// let mut b: PowerSet<u8> = PowerSet::with_capacity(10).unwrap();
    /// for v in [1, 2, 3] {
    ///     a.insert(v).unwrap();
    /// }
    /// for v in [2, 4] {
    ///     b.insert(v).unwrap();
    /// }
    ///
    /// a.differ(&b).unwrap();
    /// let mut values: Vec<u8> = a.iter().copied().collect();
    /// values.sort();
    /// assert_eq!(values, vec![1, 3, 4]);
    /// # }
    /// ```
    pub fn differ<S2: BuildHasher>(&mut self, other: &PowerSet<T, S2>) -> Result<(), Error> {
        let mut working = self.elements.clone();
        for value in other.iter() {
            if working.take(value).is_none() {
                working.insert(value.clone());
            }
        }
        let outcome = self.commit("differ", working);
        self.differ_status = Status::from(&outcome);
        outcome
    }

    fn commit(&mut self, op: &'static str, working: hashbrown::HashSet<T, S>) -> Result<(), Error> {
        if working.len() > self.capacity {
            debug!(
                op,
                would_be = working.len(),
                capacity = self.capacity,
                "set operation rolled back: result exceeds capacity"
            );
            return Err(Error::Full);
        }
        self.elements = working;
        Ok(())
    }
}

impl<T, S> PowerSet<T, S>
where
    T: Hash + Eq,
    S: BuildHasher + Default,
{
    /// Creates an empty set bounded to `capacity` values.
    ///
    /// Fails with [`Error::InvalidCapacity`] when `capacity` is zero.
    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        Self::with_capacity_and_hasher(capacity, S::default())
    }
}

impl<'a, T, S> IntoIterator for &'a PowerSet<T, S> {
    type IntoIter = hashbrown::hash_set::Iter<'a, T>;
    type Item = &'a T;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use proptest::prelude::*;
    use tracing_test::traced_test;

    use super::*;
    use crate::testing::SipHashBuilder;

    type TestSet<T> = PowerSet<T, SipHashBuilder>;

    fn set_of<T: Hash + Eq>(capacity: usize, values: impl IntoIterator<Item = T>) -> TestSet<T> {
        let mut set = TestSet::with_capacity(capacity).unwrap();
        for v in values {
            set.insert(v).unwrap();
        }
        set
    }

    fn sorted<T: Hash + Eq + Ord + Clone>(set: &PowerSet<T, impl BuildHasher>) -> Vec<T> {
        let mut values: Vec<T> = set.iter().cloned().collect();
        values.sort();
        values
    }

    #[test]
    fn test_constructor() {
        let set: TestSet<&str> = TestSet::with_capacity(5).unwrap();
        assert_eq!(set.len(), 0);
        assert_eq!(set.capacity(), 5);
        assert_eq!(set.insert_status(), Status::NotRun);
        assert_eq!(set.remove_status(), Status::NotRun);
        assert_eq!(set.union_status(), Status::NotRun);
        assert_eq!(set.differ_status(), Status::NotRun);

        assert_eq!(
            TestSet::<&str>::with_capacity(0).unwrap_err(),
            Error::InvalidCapacity
        );
    }

    #[test]
    fn test_insert() {
        let mut set = TestSet::with_capacity(10).unwrap();
        assert_eq!(set.insert("element1"), Ok(true));
        assert_eq!(set.insert_status(), Status::Ok);
        assert!(set.contains(&"element1"));

        assert_eq!(set.insert("element1"), Ok(false));
        assert_eq!(set.insert_status(), Status::Ok);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_insert_full() {
        let mut set = set_of(2, ["a", "b"]);
        assert_eq!(set.insert("c"), Err(Error::Full));
        assert_eq!(set.insert_status(), Status::Failed(Error::Full));
        assert_eq!(set.len(), 2);
        assert!(!set.contains(&"c"));

        // A full set rejects even values it already holds.
        assert_eq!(set.insert("a"), Err(Error::Full));
    }

    #[test]
    fn test_remove() {
        let mut set = set_of(10, ["a", "b"]);
        assert_eq!(set.remove(&"a"), Ok("a"));
        assert_eq!(set.remove_status(), Status::Ok);
        assert!(!set.contains(&"a"));
        assert_eq!(set.len(), 1);

        assert_eq!(set.remove(&"missing"), Err(Error::NotFound));
        assert_eq!(set.remove_status(), Status::Failed(Error::NotFound));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_intersect() {
        let mut set = set_of(10, ["a", "b", "c"]);
        set.intersect(&set_of(10, ["b", "c", "d"]));
        assert_eq!(sorted(&set), ["b", "c"]);

        let mut set = set_of(10, ["a", "b"]);
        set.intersect(&set_of(10, ["c", "d"]));
        assert!(set.is_empty());

        let mut set = set_of(10, ["a", "b"]);
        set.intersect(&TestSet::with_capacity(10).unwrap());
        assert!(set.is_empty());
    }

    #[test]
    fn test_union() {
        let mut set = set_of(10, ["a", "b"]);
        assert_eq!(set.union(&set_of(10, ["c", "d"])), Ok(()));
        assert_eq!(set.union_status(), Status::Ok);
        assert_eq!(sorted(&set), ["a", "b", "c", "d"]);

        let mut set = set_of(10, ["a", "b"]);
        set.union(&set_of(10, ["b", "c"])).unwrap();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_union_at_exact_capacity() {
        let mut set = set_of(3, ["a"]);
        set.union(&set_of(10, ["b", "c"])).unwrap();
        assert_eq!(set.len(), 3);
    }

    #[test]
    #[traced_test]
    fn test_union_over_capacity_rolls_back() {
        let mut set = set_of(3, ["a", "b"]);
        let before = set.clone();

        assert_eq!(set.union(&set_of(10, ["c", "d", "e"])), Err(Error::Full));
        assert_eq!(set.union_status(), Status::Failed(Error::Full));
        assert_eq!(set, before);
        assert!(logs_contain("rolled back"));
        assert!(logs_contain("would_be=5"));
    }

    #[test]
    fn test_differ() {
        let mut set = set_of(10, ["a", "b", "c"]);
        assert_eq!(set.differ(&set_of(10, ["b", "d", "e"])), Ok(()));
        assert_eq!(set.differ_status(), Status::Ok);
        assert_eq!(sorted(&set), ["a", "c", "d", "e"]);
    }

    #[test]
    fn test_differ_over_capacity_rolls_back() {
        let mut set = set_of(3, ["a"]);
        assert_eq!(
            set.differ(&set_of(10, ["b", "c", "d", "e"])),
            Err(Error::Full)
        );
        assert_eq!(set.differ_status(), Status::Failed(Error::Full));
        assert_eq!(sorted(&set), ["a"]);
    }

    #[test]
    fn test_differ_with_self_copy_empties() {
        let mut set = set_of(4, [1, 2, 3, 4]);
        let copy = set.clone();
        set.differ(&copy).unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_counts() {
        let a = set_of(10, ["a", "b", "c"]);
        assert_eq!(a.count_same(&set_of(10, ["b", "c", "d"])), 2);
        assert_eq!(a.count_same(&set_of(10, ["x", "y"])), 0);
        assert_eq!(a.count_different(&set_of(10, ["b", "d", "e"])), 4);
        assert_eq!(a.count_different(&set_of(10, ["a", "b", "c"])), 0);

        let empty: TestSet<&str> = TestSet::with_capacity(10).unwrap();
        assert_eq!(empty.count_same(&empty.clone()), 0);
        assert_eq!(
            set_of(10, ["a", "b"]).count_different(&set_of(10, ["c", "d", "e"])),
            5
        );
    }

    #[test]
    fn test_subset_relations() {
        let small = set_of(10, [1, 2]);
        let big = set_of(10, [1, 2, 3]);
        let other = set_of(10, [7, 8]);

        assert!(small.is_subset(&big));
        assert!(!big.is_subset(&small));
        assert!(big.is_superset(&small));
        assert!(small.is_disjoint(&other));
        assert!(!small.is_disjoint(&big));
    }

    #[test]
    fn test_mixed_hashers() {
        let a = set_of(10, [1, 2, 3]);
        let mut b: PowerSet<i32, crate::testing::IdentityState> =
            PowerSet::with_capacity(10).unwrap();
        for v in [3, 2, 1] {
            b.insert(v).unwrap();
        }
        assert!(a == b);
        assert_eq!(a.count_different(&b), 0);
    }

    fn values() -> impl Strategy<Value = Vec<u8>> {
        prop::collection::vec(0u8..32, 0..16)
    }

    proptest! {
        #[test]
        fn count_different_matches_differ(a in values(), b in values(), capacity in 1usize..24) {
            let mut left = TestSet::with_capacity(32).unwrap();
            for v in &a {
                left.insert(*v).unwrap();
            }
            let right = set_of(32, b.iter().copied());

            let expected = left.count_different(&right);
            prop_assert_eq!(
                expected,
                left.len() + right.len() - 2 * left.count_same(&right)
            );

            let mut bounded = TestSet::with_capacity(capacity.max(left.len())).unwrap();
            for v in left.iter() {
                bounded.insert(*v).unwrap();
            }
            let before = bounded.clone();
            match bounded.differ(&right) {
                Ok(()) => prop_assert_eq!(bounded.len(), expected),
                Err(e) => {
                    prop_assert_eq!(e, Error::Full);
                    prop_assert!(expected > bounded.capacity());
                    prop_assert_eq!(&bounded, &before);
                }
            }
        }

        #[test]
        fn union_is_transactional(a in values(), b in values(), capacity in 1usize..24) {
            let base = set_of(32, a.iter().copied());
            let other = set_of(32, b.iter().copied());

            let mut bounded = TestSet::with_capacity(capacity.max(base.len())).unwrap();
            for v in base.iter() {
                bounded.insert(*v).unwrap();
            }
            let before = bounded.clone();
            let union_len = base.len() + other.len() - base.count_same(&other);

            match bounded.union(&other) {
                Ok(()) => {
                    prop_assert_eq!(bounded.len(), union_len);
                    prop_assert!(bounded.is_superset(&before));
                    prop_assert!(bounded.is_superset(&other));
                }
                Err(e) => {
                    prop_assert_eq!(e, Error::Full);
                    prop_assert!(union_len > bounded.capacity());
                    prop_assert_eq!(&bounded, &before);
                }
            }
        }
    }
}
