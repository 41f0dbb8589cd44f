//! Random utilities: short identifiers and the Fisher–Yates shuffle.
//!
//! None of this is security-sensitive. Identifiers made here are used for
//! session ids and log correlation; the shuffle deals tiles. Reconnection
//! tokens have their own generator in the manager.
//!
//! Both functions have a `_with` form that takes the random source
//! explicitly, so callers (and tests) can plug in a seeded `StdRng` and get
//! reproducible output.

use rand::Rng;

/// The 62-character alphanumeric alphabet.
const RANDOM_ID_CHARS: &[u8; 62] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Builds a string of `length` characters drawn uniformly, with replacement,
/// from [A-Za-z0-9]. Uses the thread-local generator.
pub fn create_random_id(length: usize) -> String {
    create_random_id_with(&mut rand::rng(), length)
}

/// Same as [`create_random_id`] with an explicit random source.
pub fn create_random_id_with<R: Rng + ?Sized>(rng: &mut R, length: usize) -> String {
    (0..length)
        .map(|_| RANDOM_ID_CHARS[rng.random_range(0..RANDOM_ID_CHARS.len())] as char)
        .collect()
}

/// Shuffles `items` in place with the Fisher–Yates algorithm.
///
/// Walks `i` from the last index down to 1 and swaps element `i` with a
/// uniformly chosen element in `[0, i]`, which yields every permutation with
/// equal probability.
pub fn shuffle_in_place<T, R: Rng + ?Sized>(items: &mut [T], rng: &mut R) {
    for i in (1..items.len()).rev() {
        let j = rng.random_range(0..=i);
        items.swap(i, j);
    }
}
