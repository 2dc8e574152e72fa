#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod error;
mod status;

/// A string-keyed map on top of a linear-probing [`HashTable`].
///
/// The key hash is a fixed polynomial over the key's characters, so the
/// placement of every key is reproducible across runs.
pub mod hash_map;

/// A value set on top of a quadratic-probing [`HashTable`].
///
/// This module provides a `HashSet` with a fixed capacity, an explicit
/// full-table check and a configurable hasher.
pub mod hash_set;

pub mod hash_table;

/// A capacity-bounded set with transactional set algebra.
pub mod power_set;

pub mod probe;

#[cfg(test)]
mod testing;

pub use error::Error;
pub use hash_map::HashMap;
pub use hash_set::HashSet;
pub use hash_table::HashTable;
pub use power_set::PowerSet;
pub use probe::ProbeSeq;
pub use probe::Probing;
pub use status::Status;

cfg_if::cfg_if! {
    if #[cfg(feature = "foldhash")] {
        /// The hasher builder used when none is given explicitly.
        pub type DefaultHashBuilder = foldhash::fast::RandomState;
    } else if #[cfg(feature = "std")] {
        /// The hasher builder used when none is given explicitly.
        pub type DefaultHashBuilder = std::hash::RandomState;
    } else {
        compile_error!("probe-table needs either the `foldhash` or the `std` feature for its default hasher");
    }
}
