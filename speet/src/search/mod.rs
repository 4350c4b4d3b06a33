//! Ranking a query sketch against a collection of subject sketches.

use crate::error::Result;
use crate::minhash::ScaledMinHash;
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::fmt::{Display, Formatter};

pub mod fragment;

pub use self::fragment::{fragment_text, Fragment, FragmentQuery, FragmentReport};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchMode {
    /// Jaccard similarity between query and subject.
    Similarity,
    /// Fraction of the query contained in the subject.
    Containment,
}

impl SearchMode {
    pub fn score(&self, query: &ScaledMinHash, subject: &ScaledMinHash) -> Result<f64> {
        match self {
            SearchMode::Similarity => query.similarity(subject),
            SearchMode::Containment => query.contained_by(subject),
        }
    }
}

impl Display for SearchMode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            SearchMode::Similarity => write!(f, "similarity"),
            SearchMode::Containment => write!(f, "containment"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SearchHit {
    pub score: f64,
    /// Name of the matching subject sketch.
    pub label: String,
    /// Position of the subject in the searched collection.
    pub index: usize,
}

/// Scores `query` against every subject, drops zero scores and sorts the rest by
/// descending score. Ties keep the order of `subjects`.
///
/// Fails with `IncompatibleSketch` if any subject was built with a different
/// `scaled` or `ksize` than the query.
pub fn search(
    query: &ScaledMinHash,
    subjects: &[ScaledMinHash],
    mode: SearchMode,
) -> Result<Vec<SearchHit>> {
    let scores = subjects
        .par_iter()
        .map(|subject| mode.score(query, subject))
        .collect::<Result<Vec<f64>>>()?;

    let hits = scores
        .into_iter()
        .zip(subjects.iter())
        .enumerate()
        .filter(|(_, (score, _))| *score != 0.0)
        .map(|(index, (score, subject))| SearchHit {
            score,
            label: subject.name().to_string(),
            index,
        })
        .collect();
    Ok(rank_hits(hits))
}

/// Stable sort by descending score.
pub fn rank_hits(mut hits: Vec<SearchHit>) -> Vec<SearchHit> {
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits
}
