use crate::{DocId, PostingSet};
use regex::Regex;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;

lazy_static::lazy_static! {
    static ref TITLE_RE: Regex = Regex::new(r"(?i)<title>(.*?)</title>").expect("valid regex");
}

pub const DEFAULT_SITE_NAME: &str = "Википедия";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub id: DocId,
    pub file: String,
    pub title: String,
}

/// Three aligned views over the same document ids: file -> id, id -> file and id -> title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentCatalog {
    doc_ids: HashMap<String, DocId>,
    id_to_file: BTreeMap<DocId, String>,
    id_to_title: BTreeMap<DocId, String>,
}

impl DocumentCatalog {
    pub fn new() -> Self { Self::default() }

    /// Register a document. Re-inserting an id replaces its file and title.
    pub fn insert(&mut self, id: DocId, file: impl Into<String>, title: impl Into<String>) {
        let file = file.into();
        if let Some(old) = self.id_to_file.insert(id, file.clone()) {
            self.doc_ids.remove(&old);
        }
        if let Some(prev) = self.doc_ids.insert(file, id) {
            if prev != id {
                self.id_to_file.remove(&prev);
                self.id_to_title.remove(&prev);
            }
        }
        self.id_to_title.insert(id, title.into());
    }

    pub fn id_of(&self, file: &str) -> Option<DocId> { self.doc_ids.get(file).copied() }

    pub fn file(&self, id: DocId) -> Option<&str> { self.id_to_file.get(&id).map(String::as_str) }

    pub fn title(&self, id: DocId) -> Option<&str> { self.id_to_title.get(&id).map(String::as_str) }

    pub fn contains(&self, id: DocId) -> bool { self.id_to_file.contains_key(&id) }

    pub fn document(&self, id: DocId) -> Option<Document> {
        let file = self.id_to_file.get(&id)?;
        let title = self.id_to_title.get(&id).cloned().unwrap_or_else(|| file.clone());
        Some(Document { id, file: file.clone(), title })
    }

    /// All documents by ascending id.
    pub fn documents(&self) -> impl Iterator<Item = Document> + '_ {
        self.id_to_file.keys().filter_map(|id| self.document(*id))
    }

    /// Every known id; the complement base for `NOT`.
    pub fn universe(&self) -> PostingSet { self.id_to_file.keys().copied().collect() }

    pub fn len(&self) -> usize { self.id_to_file.len() }

    pub fn is_empty(&self) -> bool { self.id_to_file.is_empty() }

    pub(crate) fn doc_ids(&self) -> &HashMap<String, DocId> { &self.doc_ids }

    pub(crate) fn id_to_file(&self) -> &BTreeMap<DocId, String> { &self.id_to_file }

    pub(crate) fn id_to_title(&self) -> &BTreeMap<DocId, String> { &self.id_to_title }

    /// Assemble from persisted parts, checking that all three describe the same ids.
    pub(crate) fn from_parts(
        doc_ids: HashMap<String, DocId>,
        id_to_file: BTreeMap<DocId, String>,
        id_to_title: BTreeMap<DocId, String>,
    ) -> Result<Self, String> {
        if doc_ids.len() != id_to_file.len() {
            return Err(format!(
                "doc_ids has {} entries but id_to_file has {}",
                doc_ids.len(),
                id_to_file.len()
            ));
        }
        for (file, id) in &doc_ids {
            match id_to_file.get(id) {
                Some(f) if f == file => {}
                Some(f) => return Err(format!("doc_ids maps {file:?} to {id}, but id_to_file maps {id} to {f:?}")),
                None => return Err(format!("doc_ids maps {file:?} to unknown id {id}")),
            }
        }
        if let Some(id) = id_to_file.keys().find(|id| !id_to_title.contains_key(id)) {
            return Err(format!("id {id} has no title"));
        }
        if let Some(id) = id_to_title.keys().find(|id| !id_to_file.contains_key(id)) {
            return Err(format!("title for unknown id {id}"));
        }
        Ok(Self { doc_ids, id_to_file, id_to_title })
    }
}

/// Pulls a display title out of a raw HTML page.
#[derive(Debug, Clone)]
pub struct TitleExtractor {
    suffix: Regex,
}

impl TitleExtractor {
    /// `site_name` is the trailing "- Site" suffix stripped from titles.
    pub fn new(site_name: &str) -> Self {
        let suffix = Regex::new(&format!(r"[-–—]\s*{}.*$", regex::escape(site_name)))
            .expect("escaped site name yields a valid regex");
        Self { suffix }
    }

    /// Title found in `html`, if any and non-empty after cleanup.
    pub fn extract(&self, html: &str) -> Option<String> {
        let raw = TITLE_RE.captures(html)?.get(1)?.as_str();
        let title = self.suffix.replace(raw, "");
        let title = title.trim();
        if title.is_empty() { None } else { Some(title.to_string()) }
    }

    /// Title of the page at `path`, falling back to `fallback` when the page is
    /// missing, unreadable or untitled.
    pub fn title_for(&self, path: &Path, fallback: &str) -> String {
        match fs::read_to_string(path) {
            Ok(html) => self.extract(&html).unwrap_or_else(|| {
                tracing::warn!(page = %path.display(), "no title tag, using file name");
                fallback.to_string()
            }),
            Err(err) => {
                tracing::warn!(page = %path.display(), %err, "page unreadable, using file name as title");
                fallback.to_string()
            }
        }
    }
}

impl Default for TitleExtractor {
    fn default() -> Self { Self::new(DEFAULT_SITE_NAME) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn strips_site_suffix() {
        let t = TitleExtractor::default();
        let html = "<html><head><TITLE>Рим — Википедия</TITLE></head><title>второй</title></html>";
        assert_eq!(t.extract(html).as_deref(), Some("Рим"));
        assert_eq!(t.extract("<title> Город - Википедия, свободная энциклопедия</title>").as_deref(), Some("Город"));
        assert_eq!(t.extract("<title>Plain</title>").as_deref(), Some("Plain"));
    }

    #[test]
    fn missing_or_empty_title_falls_back() {
        let t = TitleExtractor::default();
        assert_eq!(t.extract("<html><body>no title</body></html>"), None);
        assert_eq!(t.extract("<title> – Википедия</title>"), None);

        let dir = tempdir().unwrap();
        assert_eq!(t.title_for(&dir.path().join("page_1.html"), "page_1.txt"), "page_1.txt");
        fs::write(dir.path().join("page_2.html"), "<p>untitled</p>").unwrap();
        assert_eq!(t.title_for(&dir.path().join("page_2.html"), "page_2.txt"), "page_2.txt");
    }

    #[test]
    fn catalog_views_stay_aligned() {
        let mut c = DocumentCatalog::new();
        c.insert(3, "page_3.txt", "Рим");
        c.insert(1, "page_1.txt", "Город");
        assert_eq!(c.id_of("page_3.txt"), Some(3));
        assert_eq!(c.file(1), Some("page_1.txt"));
        assert_eq!(c.title(3), Some("Рим"));
        assert_eq!(c.universe().into_iter().collect::<Vec<_>>(), vec![1, 3]);
        let ids: Vec<DocId> = c.documents().map(|d| d.id).collect();
        assert_eq!(ids, vec![1, 3]);

        c.insert(3, "page_03.txt", "Рим");
        assert_eq!(c.id_of("page_3.txt"), None);
        assert_eq!(c.len(), 2);
    }

    #[test]
    fn from_parts_rejects_misaligned_maps() {
        let doc_ids = HashMap::from([("a.txt".to_string(), 0)]);
        let files = BTreeMap::from([(0, "a.txt".to_string())]);
        let titles = BTreeMap::from([(0, "A".to_string())]);
        assert!(DocumentCatalog::from_parts(doc_ids.clone(), files.clone(), titles).is_ok());
        assert!(DocumentCatalog::from_parts(doc_ids.clone(), files.clone(), BTreeMap::new()).is_err());
        let wrong = BTreeMap::from([(1, "a.txt".to_string())]);
        assert!(DocumentCatalog::from_parts(doc_ids, wrong, BTreeMap::from([(1, "A".to_string())])).is_err());
    }
}
