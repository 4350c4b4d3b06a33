/*!
This library compares text documents with Scaled MinHash sketches.

A sketch keeps the hashes of a document's character k-mers that fall below
`MAX_HASH / scaled`, roughly one in `scaled` of them. Two sketches built with the
same `scaled` and `ksize` estimate both
* [Jaccard similarity](https://en.wikipedia.org/wiki/Jaccard_index) of the documents and
* containment, the fraction of one document found in another.

Containment is what makes fragment queries work: a long document is cut into
fixed size fragments and each fragment is searched against a corpus of sketches.

## Example

 ```
 use speet::minhash::ScaledMinHash;
 use speet::search::{search, SearchMode};

 let corpus = [
     ("first", "This is the first document."),
     ("second", "This document is the second document."),
     ("third", "And this is the third document."),
 ];
 let subjects: Vec<ScaledMinHash> = corpus.iter()
     .map(|(name, text)| {
         let mut sketch = ScaledMinHash::new(1, 5, *name).unwrap();
         sketch.add_text(text);
         sketch
     })
     .collect();

 let mut query = ScaledMinHash::new(1, 5, "query").unwrap();
 query.add_text("Is this the first document?");
 let hits = search(&query, &subjects, SearchMode::Similarity).unwrap();
 assert_eq!(hits[0].label, "first");
 ```

## References
[[1] Chapter 3, Mining of Massive Datasets](http://www.mmds.org)

[[2] Lightweight compositional analysis of metagenomes with FracMinHash and minimum metagenome covers](https://www.biorxiv.org/content/10.1101/2022.01.11.475838)
 */

pub mod corpus;
pub mod error;
pub mod minhash;
pub mod persist;
pub mod search;

pub use error::{Result, SketchError};
pub use minhash::ScaledMinHash;
