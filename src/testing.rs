//! Hashers shared by the unit tests.

use core::hash::BuildHasher;
use core::hash::Hasher;

use rand::TryRngCore;
use rand::rngs::OsRng;
use siphasher::sip::SipHasher;

/// Keyed SipHash with fresh random keys per builder.
#[derive(Clone)]
pub(crate) struct SipHashBuilder {
    k1: u64,
    k2: u64,
}

impl BuildHasher for SipHashBuilder {
    type Hasher = SipHasher;

    fn build_hasher(&self) -> Self::Hasher {
        SipHasher::new_with_keys(self.k1, self.k2)
    }
}

impl Default for SipHashBuilder {
    fn default() -> Self {
        Self {
            k1: OsRng.try_next_u64().unwrap_or(0),
            k2: OsRng.try_next_u64().unwrap_or(0),
        }
    }
}

/// Hashes an integer to itself, so tests can place values in chosen slots.
#[derive(Clone, Copy, Default)]
pub(crate) struct IdentityState;

#[derive(Default)]
pub(crate) struct IdentityHasher(u64);

impl Hasher for IdentityHasher {
    fn finish(&self) -> u64 {
        self.0
    }

    fn write(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.0 = self.0.wrapping_shl(8) | u64::from(byte);
        }
    }

    fn write_u8(&mut self, i: u8) {
        self.0 = u64::from(i);
    }

    fn write_u32(&mut self, i: u32) {
        self.0 = u64::from(i);
    }

    fn write_u64(&mut self, i: u64) {
        self.0 = i;
    }

    fn write_usize(&mut self, i: usize) {
        self.0 = i as u64;
    }

    fn write_i32(&mut self, i: i32) {
        self.0 = i as u64;
    }

    fn write_i64(&mut self, i: i64) {
        self.0 = i as u64;
    }
}

impl BuildHasher for IdentityState {
    type Hasher = IdentityHasher;

    fn build_hasher(&self) -> Self::Hasher {
        IdentityHasher::default()
    }
}
