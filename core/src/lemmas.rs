//! Reading the per-document lemma files produced by the text-processing stage.
//!
//! Each document has one file named `<prefix><N>.txt`; every line holds a lemma
//! followed by the surface forms that reduce to it.

use crate::error::{Error, Result};
use crate::DocId;
use regex::Regex;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const DEFAULT_FILE_PREFIX: &str = "page_";
pub const LEMMA_EXTENSION: &str = "txt";

/// Recognizes lemma file names and extracts the document ordinal from them.
#[derive(Debug, Clone)]
pub struct LemmaFilePattern {
    re: Regex,
}

impl LemmaFilePattern {
    pub fn new(prefix: &str) -> Self {
        let re = Regex::new(&format!(r"^{}(\d+)\.{}$", regex::escape(prefix), LEMMA_EXTENSION))
            .expect("escaped prefix yields a valid regex");
        Self { re }
    }

    /// Ordinal embedded in `file_name`, or `None` when the name does not match
    /// or the number does not fit a document id.
    pub fn ordinal(&self, file_name: &str) -> Option<DocId> {
        let caps = self.re.captures(file_name)?;
        caps.get(1)?.as_str().parse().ok()
    }
}

impl Default for LemmaFilePattern {
    fn default() -> Self { Self::new(DEFAULT_FILE_PREFIX) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LemmaFile {
    pub ordinal: DocId,
    pub file_name: String,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LemmaEntry {
    pub lemma: String,
    pub forms: Vec<String>,
}

/// List the lemma files directly inside `dir`, sorted by ordinal.
///
/// Entries without the lemma extension are ignored; `.txt` files whose name does not
/// match `pattern`, or that repeat an ordinal already taken, are skipped with a warning.
pub fn list_lemma_files(dir: &Path, pattern: &LemmaFilePattern) -> Result<Vec<LemmaFile>> {
    if !dir.is_dir() {
        return Err(Error::LemmaDirNotFound(dir.to_path_buf()));
    }

    let mut candidates: Vec<(String, PathBuf)> = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| Error::Io(e.into()))?;
        if !entry.file_type().is_file() { continue; }
        let p = entry.path();
        if p.extension().and_then(|s| s.to_str()) != Some(LEMMA_EXTENSION) { continue; }
        if let Some(name) = p.file_name().and_then(|s| s.to_str()) {
            candidates.push((name.to_string(), p.to_path_buf()));
        }
    }
    // Directory order is platform dependent.
    candidates.sort();

    let mut taken: HashMap<DocId, String> = HashMap::new();
    let mut files = Vec::with_capacity(candidates.len());
    for (file_name, path) in candidates {
        let Some(ordinal) = pattern.ordinal(&file_name) else {
            tracing::warn!(file = %file_name, "skipping lemma file with unexpected name");
            continue;
        };
        if let Some(first) = taken.get(&ordinal) {
            tracing::warn!(file = %file_name, %first, ordinal, "skipping lemma file with duplicate ordinal");
            continue;
        }
        taken.insert(ordinal, file_name.clone());
        files.push(LemmaFile { ordinal, file_name, path });
    }
    files.sort_by_key(|f| f.ordinal);
    Ok(files)
}

/// Parse one lemma file. Blank lines and lines that are not valid UTF-8 are
/// skipped; a lemma with no forms is kept.
pub fn read_lemma_file(path: &Path) -> Result<Vec<LemmaEntry>> {
    let mut reader = BufReader::new(File::open(path)?);
    let mut entries = Vec::new();
    let mut buf = Vec::new();
    let mut line_no = 0usize;
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 { break; }
        line_no += 1;
        let line = match std::str::from_utf8(&buf) {
            Ok(l) => l,
            Err(err) => {
                tracing::warn!(file = %path.display(), line = line_no, %err, "skipping undecodable lemma line");
                continue;
            }
        };
        let mut parts = line.split_whitespace();
        let Some(lemma) = parts.next() else { continue };
        entries.push(LemmaEntry {
            lemma: lemma.to_string(),
            forms: parts.map(str::to_string).collect(),
        });
    }
    Ok(entries)
}
