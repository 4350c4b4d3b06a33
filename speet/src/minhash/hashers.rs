use murmurhash3::murmurhash3_x64_128;

/// Seed shared by every k-mer hash. Sketches built with a different seed
/// are not comparable.
pub const HASH_SEED: u64 = 42;

/// Hashes a k-mer into 64 bits.
///
/// The value is the lower half of MurmurHash3 x64_128 over the UTF-8 bytes of
/// the k-mer, read as an unsigned integer.
///
/// ```
/// use speet::minhash::hash_kmer;
///
/// assert_eq!(hash_kmer("hello"), hash_kmer("hello"));
/// assert_ne!(hash_kmer("hello"), hash_kmer("world"));
/// ```
#[inline]
pub fn hash_kmer(kmer: &str) -> u64 {
    murmurhash3_x64_128(kmer.as_bytes(), HASH_SEED).0
}
