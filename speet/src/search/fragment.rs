use crate::error::{Result, SketchError};
use crate::minhash::{ScaledMinHash, SketchParams};
use crate::search::{rank_hits, SearchHit, SearchMode};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_FRAGMENT_SIZE: usize = 5000;
pub const DEFAULT_THRESHOLD: f64 = 0.2;
pub const DEFAULT_NUM_TO_REPORT: usize = 5;

/// A fragment matching more than this fraction of the subjects is treated as
/// uninformative and its matches are not reported.
pub const SUPPRESS_FRACTION: f64 = 0.9;

/// A window of the query text. `start` and `end` are character offsets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub start: usize,
    pub end: usize,
    pub text: &'a str,
}

/// Splits `text` into consecutive, non-overlapping windows of `fragment_size`
/// characters. The last window holds whatever is left and may be shorter.
///
/// ```
/// use speet::search::fragment_text;
///
/// let fragments = fragment_text("abcdefg", 3);
/// let texts: Vec<&str> = fragments.iter().map(|f| f.text).collect();
/// assert_eq!(texts, vec!["abc", "def", "g"]);
/// assert_eq!((fragments[2].start, fragments[2].end), (6, 7));
/// ```
pub fn fragment_text(text: &str, fragment_size: usize) -> Vec<Fragment<'_>> {
    let mut fragments = Vec::new();
    if fragment_size == 0 {
        return fragments;
    }

    let mut start_byte = 0;
    let mut start_char = 0;
    let mut num_chars = 0;
    for (offset, _) in text.char_indices() {
        if num_chars == fragment_size {
            fragments.push(Fragment {
                start: start_char,
                end: start_char + num_chars,
                text: &text[start_byte..offset],
            });
            start_byte = offset;
            start_char += num_chars;
            num_chars = 0;
        }
        num_chars += 1;
    }
    if num_chars > 0 {
        fragments.push(Fragment {
            start: start_char,
            end: start_char + num_chars,
            text: &text[start_byte..],
        });
    }
    fragments
}

/// Outcome of searching one fragment against the subjects.
#[derive(Clone, Debug, Serialize)]
pub struct FragmentReport {
    pub name: String,
    pub start: usize,
    pub end: usize,
    /// Hashes retained from the fragment.
    pub sketch_len: usize,
    /// Subjects containing more than `threshold` of the fragment.
    pub match_count: usize,
    pub suppressed: bool,
    /// At most `num_to_report` best matches, empty when suppressed.
    pub top_matches: Vec<SearchHit>,
}

/// Locates which parts of a long query text occur in which subjects.
///
/// The query is cut into fragments of `fragment_size` characters, each fragment
/// is sketched on its own and searched by containment against every subject.
#[derive(Clone, Debug)]
pub struct FragmentQuery {
    params: SketchParams,
    fragment_size: usize,
    threshold: f64,
    num_to_report: usize,
}

impl Default for FragmentQuery {
    fn default() -> Self {
        FragmentQuery {
            params: SketchParams::default(),
            fragment_size: DEFAULT_FRAGMENT_SIZE,
            threshold: DEFAULT_THRESHOLD,
            num_to_report: DEFAULT_NUM_TO_REPORT,
        }
    }
}

impl FragmentQuery {
    pub fn new() -> Self {
        FragmentQuery::default()
    }

    pub fn with_params(mut self, params: SketchParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_fragment_size(mut self, fragment_size: usize) -> Self {
        self.fragment_size = fragment_size;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_num_to_report(mut self, num_to_report: usize) -> Self {
        self.num_to_report = num_to_report;
        self
    }

    pub fn params(&self) -> SketchParams {
        self.params
    }

    pub fn fragment_size(&self) -> usize {
        self.fragment_size
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn num_to_report(&self) -> usize {
        self.num_to_report
    }

    pub fn validate(&self) -> Result<()> {
        self.params.validate()?;
        if self.fragment_size == 0 {
            return Err(SketchError::InvalidParameter(
                "fragment size must be positive".to_string(),
            ));
        }
        if !(self.threshold.is_finite() && self.threshold >= 0.0) {
            return Err(SketchError::InvalidParameter(format!(
                "threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }
        Ok(())
    }

    /// Sketches every fragment of `text`. Fragment `i` is named
    /// `"{query_name} fragment {start}-{end}"`.
    pub fn sketch_fragments<'a>(
        &self,
        query_name: &str,
        text: &'a str,
    ) -> Result<Vec<(Fragment<'a>, ScaledMinHash)>> {
        self.validate()?;
        fragment_text(text, self.fragment_size)
            .into_iter()
            .map(|fragment| {
                let name = format!("{} fragment {}-{}", query_name, fragment.start, fragment.end);
                let mut sketch = ScaledMinHash::with_params(self.params, name)?;
                sketch.add_text(fragment.text);
                Ok((fragment, sketch))
            })
            .collect()
    }

    /// Searches one fragment sketch against all subjects.
    pub fn search_fragment(
        &self,
        fragment: &Fragment<'_>,
        sketch: &ScaledMinHash,
        subjects: &[ScaledMinHash],
    ) -> Result<FragmentReport> {
        let mut matches = Vec::new();
        for (index, subject) in subjects.iter().enumerate() {
            let containment = SearchMode::Containment.score(sketch, subject)?;
            if containment > self.threshold {
                matches.push(SearchHit {
                    score: containment,
                    label: subject.name().to_string(),
                    index,
                });
            }
        }

        let match_count = matches.len();
        let suppressed = is_uninformative(match_count, subjects.len());
        let top_matches = if suppressed {
            Vec::new()
        } else {
            let mut ranked = rank_hits(matches);
            ranked.truncate(self.num_to_report);
            ranked
        };
        debug!(
            "{}: {} hashes, {} matches{}",
            sketch.name(),
            sketch.len(),
            match_count,
            if suppressed { " (suppressed)" } else { "" }
        );

        Ok(FragmentReport {
            name: sketch.name().to_string(),
            start: fragment.start,
            end: fragment.end,
            sketch_len: sketch.len(),
            match_count,
            suppressed,
            top_matches,
        })
    }

    /// Fragments `text`, then searches every fragment against `subjects`.
    /// Reports come back in fragment order.
    pub fn run(
        &self,
        query_name: &str,
        text: &str,
        subjects: &[ScaledMinHash],
    ) -> Result<Vec<FragmentReport>> {
        let fragments = self.sketch_fragments(query_name, text)?;
        fragments
            .par_iter()
            .map(|(fragment, sketch)| self.search_fragment(fragment, sketch, subjects))
            .collect()
    }
}

/// True when `match_count` exceeds 90% of `num_subjects`, compared on the raw
/// product: with 10 subjects a fragment must match all 10.
pub fn is_uninformative(match_count: usize, num_subjects: usize) -> bool {
    match_count as f64 > SUPPRESS_FRACTION * num_subjects as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    static S4: &'static str = "we all scream for ice cream";
    static S5: &'static str = "hashing is a cool algorithm";

    fn subject(name: &str, text: &str) -> ScaledMinHash {
        let mut sketch = ScaledMinHash::new(1, 5, name).unwrap();
        sketch.add_text(text);
        sketch
    }

    fn query() -> FragmentQuery {
        FragmentQuery::new().with_params(SketchParams::new(1, 5))
    }

    #[test]
    fn test_fragment_sizes() {
        let text = "a".repeat(12_000);
        let fragments = fragment_text(&text, 5000);
        assert_eq!(fragments.len(), 3);
        let sizes: Vec<usize> = fragments.iter().map(|f| f.text.len()).collect();
        assert_eq!(sizes, vec![5000, 5000, 2000]);
        let ranges: Vec<(usize, usize)> = fragments.iter().map(|f| (f.start, f.end)).collect();
        assert_eq!(ranges, vec![(0, 5000), (5000, 10000), (10000, 12000)]);
    }

    #[test]
    fn test_fragment_edge_cases() {
        assert!(fragment_text("", 10).is_empty());
        assert!(fragment_text("abc", 0).is_empty());
        assert_eq!(fragment_text("abcdef", 3).len(), 2);
        assert_eq!(fragment_text("ab", 10)[0].text, "ab");
    }

    #[test]
    fn test_fragment_counts_characters() {
        let fragments = fragment_text("ééééé", 2);
        let texts: Vec<&str> = fragments.iter().map(|f| f.text).collect();
        assert_eq!(texts, vec!["éé", "éé", "é"]);
        assert_eq!((fragments[2].start, fragments[2].end), (4, 5));
    }

    #[test]
    fn test_sketch_fragments_names() {
        let text = "x".repeat(12_000);
        let sketches = query().sketch_fragments("query.txt", &text).unwrap();
        let names: Vec<&str> = sketches.iter().map(|(_, s)| s.name()).collect();
        assert_eq!(
            names,
            vec![
                "query.txt fragment 0-5000",
                "query.txt fragment 5000-10000",
                "query.txt fragment 10000-12000",
            ]
        );
        for (_, sketch) in sketches.iter() {
            assert_eq!(sketch.len(), 1);
        }
    }

    #[test]
    fn test_run_reports_matches() {
        let subjects = vec![
            subject("ice cream", S4),
            subject("lsh", S5),
            subject("both", &format!("{} {}", S4, S5)),
        ];
        let text = format!("{}{}", S4, S5);
        let reports = query()
            .with_fragment_size(S4.len())
            .with_threshold(0.5)
            .run("query", &text, &subjects)
            .unwrap();

        assert_eq!(reports.len(), 2);
        let first = &reports[0];
        assert_eq!(first.name, format!("query fragment 0-{}", S4.len()));
        assert!(!first.suppressed);
        assert_eq!(first.match_count, 2);
        let labels: Vec<&str> = first.top_matches.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["ice cream", "both"]);
        assert_eq!(first.top_matches[0].score, 1.0);

        let second = &reports[1];
        let labels: Vec<&str> = second.top_matches.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["lsh", "both"]);
    }

    #[test]
    fn test_num_to_report_limits_matches() {
        let subjects: Vec<ScaledMinHash> = (0..20)
            .map(|i| {
                let text = if i < 8 { S4.to_string() } else { format!("unrelated text {}", i) };
                subject(&format!("s{}", i), &text)
            })
            .collect();
        let reports = query()
            .with_num_to_report(3)
            .run("query", S4, &subjects)
            .unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].match_count, 8);
        assert!(!reports[0].suppressed);
        let labels: Vec<&str> = reports[0].top_matches.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["s0", "s1", "s2"]);
    }

    #[test]
    fn test_suppression() {
        let subjects: Vec<ScaledMinHash> = (0..10)
            .map(|i| subject(&format!("copy {}", i), &format!("{} #{}", S4, i)))
            .collect();
        let reports = query().run("boilerplate", S4, &subjects).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].match_count, 10);
        assert!(reports[0].suppressed);
        assert!(reports[0].top_matches.is_empty());

        // nine of ten is not more than 90%
        let mut subjects = subjects;
        subjects[9] = subject("other", S5);
        let reports = query().run("boilerplate", S4, &subjects).unwrap();
        assert_eq!(reports[0].match_count, 9);
        assert!(!reports[0].suppressed);
        assert_eq!(reports[0].top_matches.len(), DEFAULT_NUM_TO_REPORT);
    }

    #[test]
    fn test_is_uninformative() {
        assert!(is_uninformative(10, 10));
        assert!(!is_uninformative(9, 10));
        assert!(is_uninformative(1, 1));
        assert!(!is_uninformative(0, 0));
        assert!(is_uninformative(19, 20));
        assert!(!is_uninformative(18, 20));
    }

    #[test]
    fn test_threshold_is_strict() {
        let subjects = vec![subject("half", "hello"), subject("none", "fools")];
        let reports = query()
            .with_fragment_size(100)
            .with_threshold(0.5)
            .run("query", "hello world", &subjects)
            .unwrap();
        // "hello world" has 7 k-mers, only one of them is in "hello"
        assert_eq!(reports[0].match_count, 0);

        let reports = query()
            .with_threshold(0.0)
            .run("query", "hello world", &subjects)
            .unwrap();
        assert_eq!(reports[0].match_count, 1);
    }

    #[test]
    fn test_invalid_config() {
        let subjects = vec![subject("s", S4)];
        assert!(matches!(
            query().with_fragment_size(0).run("q", S4, &subjects),
            Err(SketchError::InvalidParameter(_))
        ));
        assert!(matches!(
            query().with_threshold(f64::NAN).run("q", S4, &subjects),
            Err(SketchError::InvalidParameter(_))
        ));
        assert!(query().with_threshold(-0.1).validate().is_err());
    }

    #[test]
    fn test_incompatible_subjects() {
        let mut other = ScaledMinHash::new(2, 5, "other").unwrap();
        other.add_text(S4);
        let result = query().run("q", S4, &[other]);
        assert!(matches!(result, Err(SketchError::IncompatibleSketch { .. })));
    }

    #[test]
    fn test_defaults() {
        let fq = FragmentQuery::default();
        assert_eq!(fq.fragment_size(), 5000);
        assert_eq!(fq.threshold(), 0.2);
        assert_eq!(fq.num_to_report(), 5);
        assert_eq!(fq.params(), SketchParams::new(500, 5));
    }
}
