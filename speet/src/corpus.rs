//! Getting documents and sketches in and out of the filesystem.
//!
//! Sketch files are recognised by the [`SKETCH_SUFFIX`] appended to the name of
//! the text file they were built from. Documents are produced by a
//! [`DocumentSource`], so the sketching loop can be fed from memory in tests.

use crate::error::{Result, SketchError};
use crate::minhash::{ScaledMinHash, SketchParams};
use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

pub const SKETCH_SUFFIX: &str = ".sketch";

/// `notes/a.txt` -> `notes/a.txt.sketch`
pub fn sketch_path_for<P: AsRef<Path>>(path: P) -> PathBuf {
    let mut name = OsString::from(path.as_ref().as_os_str());
    name.push(SKETCH_SUFFIX);
    PathBuf::from(name)
}

pub fn is_sketch_file<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .file_name()
        .and_then(|name| name.to_str())
        .map_or(false, |name| name.ends_with(SKETCH_SUFFIX))
}

#[derive(Clone, Debug)]
pub struct Document {
    pub label: String,
    /// Where the text came from, if it came from a file.
    pub path: Option<PathBuf>,
    pub text: String,
}

impl Document {
    pub fn new<S: Into<String>, T: Into<String>>(label: S, text: T) -> Self {
        Document { label: label.into(), path: None, text: text.into() }
    }
}

pub trait DocumentSource {
    fn documents(&self) -> Box<dyn Iterator<Item = Result<Document>> + '_>;
}

/// Documents kept in memory.
#[derive(Clone, Debug, Default)]
pub struct InMemoryDocuments {
    documents: Vec<Document>,
}

impl InMemoryDocuments {
    pub fn new(documents: Vec<Document>) -> Self {
        InMemoryDocuments { documents }
    }
}

impl DocumentSource for InMemoryDocuments {
    fn documents(&self) -> Box<dyn Iterator<Item = Result<Document>> + '_> {
        Box::new(self.documents.iter().cloned().map(Ok))
    }
}

/// Every non-sketch file under a directory, read as UTF-8 text.
///
/// Files that are not valid UTF-8 are skipped with a warning. Any other I/O
/// error ends the iteration with that error.
#[derive(Clone, Debug)]
pub struct DirectoryDocuments {
    root: PathBuf,
}

impl DirectoryDocuments {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        DirectoryDocuments { root: root.into() }
    }
}

impl DocumentSource for DirectoryDocuments {
    fn documents(&self) -> Box<dyn Iterator<Item = Result<Document>> + '_> {
        let iter = walk_files(&self.root)
            .filter(|entry| !matches!(entry, Ok(path) if is_sketch_file(path)))
            .filter_map(|entry| {
                let path = match entry {
                    Ok(path) => path,
                    Err(e) => return Some(Err(e)),
                };
                match read_text(&path) {
                    Ok(Some(text)) => Some(Ok(Document {
                        label: path.display().to_string(),
                        path: Some(path),
                        text,
                    })),
                    Ok(None) => {
                        warn!("Skipping {}: not valid UTF-8 text", path.display());
                        None
                    }
                    Err(e) => Some(Err(e)),
                }
            });
        Box::new(iter)
    }
}

/// Regular files under `root`, in file name order.
fn walk_files(root: &Path) -> impl Iterator<Item = Result<PathBuf>> {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) if entry.file_type().is_file() => Some(Ok(entry.into_path())),
            Ok(_) => None,
            Err(e) => Some(Err(SketchError::from(e))),
        })
}

/// Reads `path` as text, `None` if it does not decode as UTF-8.
pub fn read_text<P: AsRef<Path>>(path: P) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::InvalidData => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Builds one sketch per document, named by the document label, and hands it
/// to `on_sketch`. Returns the number of documents sketched.
pub fn sketch_documents<S, F>(source: &S, params: SketchParams, mut on_sketch: F) -> Result<usize>
where
    S: DocumentSource + ?Sized,
    F: FnMut(&Document, ScaledMinHash) -> Result<()>,
{
    params.validate()?;
    let mut count = 0;
    for document in source.documents() {
        let document = document?;
        let mut sketch = ScaledMinHash::with_params(params, document.label.as_str())?;
        sketch.add_text(&document.text);
        debug!(
            "sketch #{} from {}: {} chars, {} hashes",
            count,
            document.label,
            document.text.chars().count(),
            sketch.len()
        );
        on_sketch(&document, sketch)?;
        count += 1;
    }
    Ok(count)
}

/// Sketches every readable text file under `root` into `<file>.sketch` next to
/// it. Existing sketch files are not re-sketched.
pub fn sketch_directory<P: AsRef<Path>>(root: P, params: SketchParams) -> Result<usize> {
    let source = DirectoryDocuments::new(root.as_ref());
    let count = sketch_documents(&source, params, |document, sketch| {
        match &document.path {
            Some(path) => sketch.save_to_path(sketch_path_for(path)),
            None => Ok(()),
        }
    })?;
    info!("sketched {} files under {}", count, root.as_ref().display());
    Ok(count)
}

/// Loads every sketch file under `dir`, in file name order.
pub fn load_sketch_dir<P: AsRef<Path>>(dir: P) -> Result<Vec<ScaledMinHash>> {
    let mut sketches = Vec::new();
    for path in walk_files(dir.as_ref()) {
        let path = path?;
        if !is_sketch_file(&path) {
            continue;
        }
        debug!("loading sketch {}", path.display());
        sketches.push(ScaledMinHash::load_from_path(&path)?);
    }
    info!("loaded {} sketches from {}", sketches.len(), dir.as_ref().display());
    Ok(sketches)
}

pub fn load_sketches<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<ScaledMinHash>> {
    paths
        .iter()
        .map(|path| ScaledMinHash::load_from_path(path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    static S4: &'static str = "we all scream for ice cream";
    static S5: &'static str = "we all scream for ice cream sandwich";
    static S6: &'static str = "i like ice cream sandwich";

    fn write(path: &Path, bytes: &[u8]) {
        let mut file = File::create(path).unwrap();
        file.write_all(bytes).unwrap();
    }

    #[test]
    fn test_sketch_path_for() {
        assert_eq!(sketch_path_for("notes/a.txt"), PathBuf::from("notes/a.txt.sketch"));
        assert!(is_sketch_file("notes/a.txt.sketch"));
        assert!(!is_sketch_file("notes/a.txt"));
        assert!(!is_sketch_file("notes.sketch/a.txt"));
    }

    #[test]
    fn test_sketch_in_memory_documents() {
        let source = InMemoryDocuments::new(vec![
            Document::new("s4", S4),
            Document::new("s5", S5),
            Document::new("short", "ice"),
        ]);
        let mut sketches = Vec::new();
        let count = sketch_documents(&source, SketchParams::new(1, 5), |_, sketch| {
            sketches.push(sketch);
            Ok(())
        })
        .unwrap();

        assert_eq!(count, 3);
        let names: Vec<&str> = sketches.iter().map(|s| s.name()).collect();
        assert_eq!(names, vec!["s4", "s5", "short"]);
        assert_eq!(sketches[0].contained_by(&sketches[1]).unwrap(), 1.0);
        assert!(sketches[2].is_empty());
    }

    #[test]
    fn test_sketch_documents_stops_on_error() {
        let source = InMemoryDocuments::new(vec![Document::new("a", S4), Document::new("b", S5)]);
        let mut seen = 0;
        let result = sketch_documents(&source, SketchParams::new(1, 5), |_, _| {
            seen += 1;
            Err(SketchError::InvalidParameter("stop".to_string()))
        });
        assert!(result.is_err());
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_sketch_directory_skips_binary_files() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        write(&dir.path().join("a.txt"), S4.as_bytes());
        write(&nested.join("b.txt"), S6.as_bytes());
        write(&dir.path().join("c.bin"), &[0xff, 0xfe, 0x00, 0x80]);

        let count = sketch_directory(dir.path(), SketchParams::new(1, 5)).unwrap();
        assert_eq!(count, 2);
        assert!(dir.path().join("a.txt.sketch").exists());
        assert!(nested.join("b.txt.sketch").exists());
        assert!(!dir.path().join("c.bin.sketch").exists());

        // running again must not sketch the sketches
        let count = sketch_directory(dir.path(), SketchParams::new(1, 5)).unwrap();
        assert_eq!(count, 2);

        let sketches = load_sketch_dir(dir.path()).unwrap();
        assert_eq!(sketches.len(), 2);
        assert_eq!(sketches[0].name(), dir.path().join("a.txt").display().to_string());
        assert_eq!(sketches[1].name(), nested.join("b.txt").display().to_string());
    }

    #[test]
    fn test_load_sketch_dir_ignores_other_files() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("readme.md"), b"not a sketch");
        let mut sketch = ScaledMinHash::new(1, 5, "s6").unwrap();
        sketch.add_text(S6);
        sketch.save_to_path(dir.path().join("s6.txt.sketch")).unwrap();

        let sketches = load_sketch_dir(dir.path()).unwrap();
        assert_eq!(sketches.len(), 1);
        assert_eq!(sketches[0].hashes(), sketch.hashes());
    }

    #[test]
    fn test_corrupt_sketch_fails_load() {
        let dir = tempfile::tempdir().unwrap();
        write(&dir.path().join("bad.sketch"), b"garbage");
        assert!(load_sketch_dir(dir.path()).is_err());
        let paths = vec![dir.path().join("bad.sketch")];
        assert!(load_sketches(paths.as_slice()).is_err());
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(matches!(load_sketch_dir(&missing), Err(SketchError::Walk(_))));
    }

    #[test]
    fn test_read_text() {
        let dir = tempfile::tempdir().unwrap();
        let text = dir.path().join("a.txt");
        let binary = dir.path().join("b.bin");
        write(&text, S4.as_bytes());
        write(&binary, &[0xc3, 0x28]);
        assert_eq!(read_text(&text).unwrap().as_deref(), Some(S4));
        assert_eq!(read_text(&binary).unwrap(), None);
        assert!(read_text(dir.path().join("missing")).is_err());
    }
}
