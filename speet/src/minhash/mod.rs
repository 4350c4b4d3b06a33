use std::collections::HashSet;
use std::hash::BuildHasher;

mod hashers;
mod scaled_min_hash;

pub use self::hashers::{hash_kmer, HASH_SEED};
pub use self::scaled_min_hash::{ScaledMinHash, SketchParams};

/// Largest possible hash value. A sketch with `scaled = s` keeps hashes below
/// `MAX_HASH / s`.
pub const MAX_HASH: u64 = u64::MAX;

pub const DEFAULT_SCALED: u64 = 500;
pub const DEFAULT_KSIZE: usize = 5;

/// Retention threshold for `scaled`. Integer (floor) division, so a hash is kept
/// iff `hash < MAX_HASH / scaled`.
///
/// ```
/// use speet::minhash::{max_hash_for_scaled, MAX_HASH};
///
/// assert_eq!(max_hash_for_scaled(1), MAX_HASH);
/// assert_eq!(max_hash_for_scaled(2), MAX_HASH / 2);
/// ```
#[inline]
pub fn max_hash_for_scaled(scaled: u64) -> u64 {
    MAX_HASH / scaled
}

/// Number of hashes present in both sets. Iterates the smaller set and probes
/// the larger one.
pub fn compute_intersection_size<S: BuildHasher>(
    hashes_1: &HashSet<u64, S>,
    hashes_2: &HashSet<u64, S>,
) -> usize {
    let (small, large) = if hashes_1.len() <= hashes_2.len() {
        (hashes_1, hashes_2)
    } else {
        (hashes_2, hashes_1)
    };
    small.iter().filter(|hash| large.contains(*hash)).count()
}

/// Calculates jaccard similarity between two hash sets. Two empty sets have
/// similarity 0.
/// # Examples
///
/// ```
/// use std::collections::HashSet;
/// use speet::minhash::compute_jaccard_similarity;
///
/// let h1: HashSet<u64> = [1, 2, 3, 4].into_iter().collect();
/// let h2: HashSet<u64> = [3, 4, 5, 6].into_iter().collect();
/// assert!((compute_jaccard_similarity(&h1, &h2) - 0.333).abs() < 0.01);
/// ```
pub fn compute_jaccard_similarity<S: BuildHasher>(
    hashes_1: &HashSet<u64, S>,
    hashes_2: &HashSet<u64, S>,
) -> f64 {
    let intersection_len = compute_intersection_size(hashes_1, hashes_2);
    let union_len = hashes_1.len() + hashes_2.len() - intersection_len;
    if union_len == 0 {
        return 0.0;
    }
    intersection_len as f64 / union_len as f64
}

/// Fraction of `hashes_1` found in `hashes_2`. Asymmetric: the size of
/// `hashes_2` only matters through the intersection.
///
/// ```
/// use std::collections::HashSet;
/// use speet::minhash::compute_containment;
///
/// let fragment: HashSet<u64> = [1, 2].into_iter().collect();
/// let document: HashSet<u64> = (0..100).collect();
/// assert_eq!(compute_containment(&fragment, &document), 1.0);
/// assert_eq!(compute_containment(&document, &fragment), 0.02);
/// ```
pub fn compute_containment<S: BuildHasher>(
    hashes_1: &HashSet<u64, S>,
    hashes_2: &HashSet<u64, S>,
) -> f64 {
    if hashes_1.is_empty() {
        return 0.0;
    }
    compute_intersection_size(hashes_1, hashes_2) as f64 / hashes_1.len() as f64
}
