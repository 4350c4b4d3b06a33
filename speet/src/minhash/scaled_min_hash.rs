use crate::error::{Result, SketchError};
use crate::minhash::{
    compute_containment, compute_jaccard_similarity, hash_kmer, max_hash_for_scaled,
    DEFAULT_KSIZE, DEFAULT_SCALED,
};
use fnv::FnvHashSet;
use std::collections::VecDeque;
use std::fmt;
use std::fmt::{Display, Formatter};

/// The two parameters that decide whether sketches are comparable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SketchParams {
    pub scaled: u64,
    pub ksize: usize,
}

impl SketchParams {
    pub fn new(scaled: u64, ksize: usize) -> Self {
        SketchParams { scaled, ksize }
    }

    pub fn validate(&self) -> Result<()> {
        if self.scaled == 0 {
            return Err(SketchError::InvalidParameter("scaled must be positive".to_string()));
        }
        if self.ksize == 0 {
            return Err(SketchError::InvalidParameter("ksize must be positive".to_string()));
        }
        Ok(())
    }
}

impl Default for SketchParams {
    fn default() -> Self {
        SketchParams::new(DEFAULT_SCALED, DEFAULT_KSIZE)
    }
}

/// A Scaled MinHash sketch of a text.
///
/// Every k-mer (a window of `ksize` characters, stride 1) is hashed and the hash
/// kept if it falls below `MAX_HASH / scaled`, so the sketch holds roughly
/// `1 / scaled` of the distinct k-mers. Unlike a fixed size MinHash signature this
/// supports containment as well as similarity.
///
/// ```
/// use speet::minhash::ScaledMinHash;
///
/// let mut m1 = ScaledMinHash::new(1, 5, "m1").unwrap();
/// let mut m2 = ScaledMinHash::new(1, 5, "m2").unwrap();
/// m1.add_text("hello");
/// m2.add_text("hello");
/// m1.add_text("world");
/// m2.add_text("fools");
/// assert_eq!(m1.similarity(&m2).unwrap(), 1.0 / 3.0);
/// ```
#[derive(Clone, Debug)]
pub struct ScaledMinHash {
    scaled: u64,
    ksize: usize,
    hashes: FnvHashSet<u64>,
    name: String,
}

impl ScaledMinHash {
    pub fn new<S: Into<String>>(scaled: u64, ksize: usize, name: S) -> Result<Self> {
        Self::with_params(SketchParams::new(scaled, ksize), name)
    }

    pub fn with_params<S: Into<String>>(params: SketchParams, name: S) -> Result<Self> {
        params.validate()?;
        Ok(ScaledMinHash {
            scaled: params.scaled,
            ksize: params.ksize,
            hashes: FnvHashSet::default(),
            name: name.into(),
        })
    }

    /// Rebuilds a sketch from stored parts. Hashes at or above the threshold
    /// are rejected.
    pub(crate) fn from_parts(
        params: SketchParams,
        name: String,
        hashes: impl IntoIterator<Item = u64>,
    ) -> Result<Self> {
        let mut sketch = Self::with_params(params, name)?;
        let max_hash = sketch.max_hash();
        for hash in hashes {
            if hash >= max_hash {
                return Err(SketchError::InvalidFormat(format!(
                    "hash {} is not below the threshold {} for scaled {}",
                    hash, max_hash, sketch.scaled
                )));
            }
            sketch.hashes.insert(hash);
        }
        Ok(sketch)
    }

    /// Hashes every k-mer of `text` and keeps those under the threshold.
    /// Does nothing if `text` is shorter than `ksize` characters. K-mers never
    /// span two calls.
    pub fn add_text(&mut self, text: &str) {
        let ksize = self.ksize;
        let max_hash = self.max_hash();

        // byte offsets of the last `ksize` chars
        let mut starts: VecDeque<usize> = VecDeque::with_capacity(ksize.min(text.len()) + 1);
        let hashes = &mut self.hashes;
        let ends = text
            .char_indices()
            .map(|(offset, _)| offset)
            .skip(1)
            .chain(std::iter::once(text.len()));
        for (start, end) in text.char_indices().map(|(offset, _)| offset).zip(ends) {
            starts.push_back(start);
            if starts.len() > ksize {
                starts.pop_front();
            }
            if starts.len() == ksize {
                let hash = hash_kmer(&text[starts[0]..end]);
                if hash < max_hash {
                    hashes.insert(hash);
                }
            }
        }
    }

    /// Adds a precomputed hash. Returns `false` if the hash is over the
    /// threshold or already present.
    pub fn add_hash(&mut self, hash: u64) -> bool {
        if hash < self.max_hash() {
            self.hashes.insert(hash)
        } else {
            false
        }
    }

    /// Jaccard similarity of the retained hashes.
    pub fn similarity(&self, other: &ScaledMinHash) -> Result<f64> {
        self.check_compatible(other)?;
        Ok(compute_jaccard_similarity(&self.hashes, &other.hashes))
    }

    /// Fraction of this sketch's hashes that are also in `other`.
    pub fn contained_by(&self, other: &ScaledMinHash) -> Result<f64> {
        self.check_compatible(other)?;
        Ok(compute_containment(&self.hashes, &other.hashes))
    }

    pub fn is_compatible(&self, other: &ScaledMinHash) -> bool {
        self.scaled == other.scaled && self.ksize == other.ksize
    }

    pub fn check_compatible(&self, other: &ScaledMinHash) -> Result<()> {
        if self.is_compatible(other) {
            Ok(())
        } else {
            Err(SketchError::IncompatibleSketch {
                scaled: (self.scaled, other.scaled),
                ksize: (self.ksize, other.ksize),
            })
        }
    }

    pub fn len(&self) -> usize {
        self.hashes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hashes.is_empty()
    }

    pub fn scaled(&self) -> u64 {
        self.scaled
    }

    pub fn ksize(&self) -> usize {
        self.ksize
    }

    pub fn params(&self) -> SketchParams {
        SketchParams::new(self.scaled, self.ksize)
    }

    /// Hashes below this value are retained.
    pub fn max_hash(&self) -> u64 {
        max_hash_for_scaled(self.scaled)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    pub fn hashes(&self) -> &FnvHashSet<u64> {
        &self.hashes
    }
}

impl Display for ScaledMinHash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ScaledMinHash {{ name: {}, scaled: {}, ksize: {}, hashes: {} }}",
            self.name,
            self.scaled,
            self.ksize,
            self.hashes.len()
        )
    }
}
