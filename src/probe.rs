//! Probe sequences for open addressing.
//!
//! A probe sequence starts at `hash mod capacity` and walks candidate slots
//! according to a [`Probing`] policy until it arrives back at its start. The
//! sequence never yields the start slot twice, so a caller that exhausts the
//! iterator without finding what it wanted knows the collision could not be
//! resolved.
//!
//! Only linear probing with a stride coprime to the capacity is guaranteed to
//! visit every slot. Quadratic probing over a capacity that is not prime covers
//! only the quadratic residues, and may report exhaustion while other slots are
//! still empty. Triangular probing with a stride of one covers every slot when
//! the capacity is a power of two.

use core::iter::FusedIterator;

/// The step formula used to derive successive candidate slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Probing {
    /// Candidate `a` is `(start + stride · a) mod capacity`: the offset grows
    /// by `stride` on every attempt.
    Linear {
        /// Amount the offset grows by per attempt.
        stride: usize,
    },
    /// Candidate `a` is `(start + a²) mod capacity`.
    Quadratic,
    /// Candidate `a` is `(start + stride · a(a+1)/2) mod capacity`: the step
    /// grows by `stride` on every attempt.
    Triangular {
        /// Amount the step grows by per attempt.
        stride: usize,
    },
}

impl Probing {
    /// Linear probing with a stride of one.
    pub const LINEAR: Probing = Probing::Linear { stride: 1 };

    /// Triangular probing with a stride of one.
    pub const TRIANGULAR: Probing = Probing::Triangular { stride: 1 };

    /// Returns the slot examined on the given attempt of a sequence starting
    /// at `start`.
    ///
    /// Attempt `0` is always `start` itself. This is a pure function of its
    /// arguments.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use probe_table::Probing;
    ///
    /// assert_eq!(Probing::LINEAR.candidate(3, 4, 10), 7);
    /// assert_eq!(Probing::Quadratic.candidate(3, 0, 10), 3);
    /// assert_eq!(Probing::Quadratic.candidate(3, 2, 10), 7);
    /// assert_eq!(Probing::TRIANGULAR.candidate(3, 3, 10), 9);
    /// ```
    pub fn candidate(self, start: usize, attempt: usize, capacity: usize) -> usize {
        debug_assert!(capacity > 0);
        debug_assert!(start < capacity);

        // Every operand is below 2^64, so the products fit in u128.
        let cap = capacity as u128;
        let a = attempt as u128;
        let offset = match self {
            Probing::Linear { stride } => (a % cap) * (stride as u128 % cap) % cap,
            Probing::Quadratic => {
                let a = a % cap;
                a * a % cap
            }
            Probing::Triangular { stride } => {
                let steps = (a * (a + 1) / 2) % cap;
                steps * (stride as u128 % cap) % cap
            }
        };
        ((start as u128 + offset) % cap) as usize
    }
}

/// An iterator over the candidate slots for one lookup.
///
/// The first item is the start slot. Iteration ends as soon as the policy
/// produces the start slot again, which every policy is guaranteed to do:
/// linear and quadratic probing by attempt `capacity`, triangular probing by
/// attempt `2 · capacity - 1`.
///
/// # Examples
///
/// ```rust
/// use probe_table::ProbeSeq;
/// use probe_table::Probing;
///
/// let slots: Vec<usize> = ProbeSeq::new(7, 5, Probing::LINEAR).collect();
/// assert_eq!(slots, vec![2, 3, 4, 0, 1]);
///
/// let slots: Vec<usize> = ProbeSeq::new(4, 4, Probing::Quadratic).collect();
/// assert_eq!(slots, vec![0, 1]);
///
/// // Triangular sequences may revisit slots before closing the cycle.
/// let slots: Vec<usize> = ProbeSeq::new(0, 4, Probing::TRIANGULAR).collect();
/// assert_eq!(slots, vec![0, 1, 3, 2, 2, 3, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct ProbeSeq {
    start: usize,
    capacity: usize,
    probing: Probing,
    attempt: usize,
    exhausted: bool,
}

impl ProbeSeq {
    /// Creates the probe sequence for `hash` over `capacity` slots.
    ///
    /// `capacity` must be non-zero.
    pub fn new(hash: u64, capacity: usize, probing: Probing) -> Self {
        debug_assert!(capacity > 0);
        Self {
            start: (hash % capacity as u64) as usize,
            capacity,
            probing,
            attempt: 0,
            exhausted: false,
        }
    }

    /// The slot the sequence starts from.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Number of candidates yielded so far.
    pub fn attempts(&self) -> usize {
        self.attempt
    }

    /// Returns `true` if `index`, produced after `attempts_taken` earlier
    /// candidates, closes the cycle back to `start`.
    pub fn is_cycle(index: usize, start: usize, attempts_taken: usize) -> bool {
        attempts_taken > 0 && index == start
    }
}

impl Iterator for ProbeSeq {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }

        let index = self
            .probing
            .candidate(self.start, self.attempt, self.capacity);
        if Self::is_cycle(index, self.start, self.attempt) {
            self.exhausted = true;
            return None;
        }

        self.attempt += 1;
        Some(index)
    }
}

impl FusedIterator for ProbeSeq {}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeSet;
    use alloc::vec;
    use alloc::vec::Vec;

    use proptest::prelude::*;

    use super::*;

    fn visited(hash: u64, capacity: usize, probing: Probing) -> BTreeSet<usize> {
        ProbeSeq::new(hash, capacity, probing).collect()
    }

    #[test]
    fn starts_at_hash_mod_capacity() {
        let mut seq = ProbeSeq::new(17, 5, Probing::Quadratic);
        assert_eq!(seq.start(), 2);
        assert_eq!(seq.next(), Some(2));
        assert_eq!(seq.attempts(), 1);
    }

    #[test]
    fn quadratic_candidates() {
        let slots: Vec<usize> = (0..5)
            .map(|a| Probing::Quadratic.candidate(1, a, 11))
            .collect();
        assert_eq!(slots, vec![1, 2, 5, 10, 6]);
    }

    #[test]
    fn linear_candidates() {
        let slots: Vec<usize> = (0..5).map(|a| Probing::LINEAR.candidate(8, a, 10)).collect();
        assert_eq!(slots, vec![8, 9, 0, 1, 2]);

        let strided: Vec<usize> = (0..4)
            .map(|a| Probing::Linear { stride: 3 }.candidate(2, a, 100))
            .collect();
        assert_eq!(strided, vec![2, 5, 8, 11]);
    }

    #[test]
    fn linear_covers_every_slot() {
        for capacity in 1usize..50 {
            for start in [0u64, 1, capacity as u64 - 1] {
                let slots = visited(start, capacity, Probing::LINEAR);
                assert_eq!(slots.len(), capacity, "capacity {capacity}");
            }
        }
    }

    #[test]
    fn linear_stride_sharing_a_factor_skips_slots() {
        assert_eq!(visited(0, 4, Probing::Linear { stride: 2 }), [0, 2].into());
        assert_eq!(visited(1, 6, Probing::Linear { stride: 3 }), [1, 4].into());
    }

    #[test]
    fn linear_stride_zero_yields_only_start() {
        let slots: Vec<usize> = ProbeSeq::new(3, 5, Probing::Linear { stride: 0 }).collect();
        assert_eq!(slots, vec![3]);
    }

    #[test]
    fn triangular_candidates() {
        let slots: Vec<usize> = (0..5)
            .map(|a| Probing::TRIANGULAR.candidate(0, a, 100))
            .collect();
        assert_eq!(slots, vec![0, 1, 3, 6, 10]);

        let strided: Vec<usize> = (0..4)
            .map(|a| Probing::Triangular { stride: 3 }.candidate(2, a, 100))
            .collect();
        assert_eq!(strided, vec![2, 5, 11, 20]);
    }

    #[test]
    fn quadratic_non_prime_capacity_cycles_early() {
        // Squares mod 4 are {0, 1}, so only two slots are reachable.
        assert_eq!(visited(0, 4, Probing::Quadratic), [0, 1].into());
        assert_eq!(visited(0, 8, Probing::Quadratic), [0, 1, 4].into());
    }

    #[test]
    fn quadratic_prime_capacity_covers_half() {
        let slots = visited(0, 7, Probing::Quadratic);
        assert_eq!(slots, [0, 1, 2, 4].into());
    }

    #[test]
    fn triangular_power_of_two_covers_everything() {
        for capacity in [1usize, 2, 4, 8, 16, 64] {
            let slots = visited(3, capacity, Probing::TRIANGULAR);
            assert_eq!(slots.len(), capacity, "capacity {capacity}");
        }
    }

    #[test]
    fn triangular_capacity_five_revisits() {
        let slots: Vec<usize> = ProbeSeq::new(0, 5, Probing::TRIANGULAR).collect();
        assert_eq!(slots, vec![0, 1, 3, 1]);
    }

    #[test]
    fn capacity_one_yields_only_start() {
        let slots: Vec<usize> = ProbeSeq::new(99, 1, Probing::Quadratic).collect();
        assert_eq!(slots, vec![0]);
        let slots: Vec<usize> = ProbeSeq::new(99, 1, Probing::TRIANGULAR).collect();
        assert_eq!(slots, vec![0]);
        let slots: Vec<usize> = ProbeSeq::new(99, 1, Probing::LINEAR).collect();
        assert_eq!(slots, vec![0]);
    }

    #[test]
    fn is_cycle_requires_an_attempt() {
        assert!(!ProbeSeq::is_cycle(3, 3, 0));
        assert!(ProbeSeq::is_cycle(3, 3, 1));
        assert!(!ProbeSeq::is_cycle(4, 3, 7));
    }

    #[test]
    fn exhausted_sequence_stays_exhausted() {
        let mut seq = ProbeSeq::new(0, 2, Probing::Quadratic);
        assert_eq!(seq.next(), Some(0));
        assert_eq!(seq.next(), Some(1));
        assert_eq!(seq.next(), None);
        assert_eq!(seq.next(), None);
    }

    proptest! {
        #[test]
        fn sequences_are_bounded(hash in any::<u64>(), capacity in 1usize..200, stride in 1usize..5) {
            for probing in [Probing::Linear { stride }, Probing::Quadratic, Probing::Triangular { stride }] {
                let seq = ProbeSeq::new(hash, capacity, probing);
                let start = seq.start();
                let slots: Vec<usize> = seq.collect();
                prop_assert_eq!(slots[0], start);
                prop_assert!(slots.len() <= 2 * capacity);
                prop_assert!(slots.iter().all(|&s| s < capacity));
                prop_assert!(slots[1..].iter().all(|&s| s != start));
            }
        }
    }
}
