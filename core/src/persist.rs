use crate::catalog::DocumentCatalog;
use crate::error::{Error, Result};
use crate::index::InvertedIndex;
use crate::DocId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub const DEFAULT_INDEX_FILE: &str = "inverted_index.json";

/// On-disk shape. Maps are ordered so that rebuilding from the same input
/// produces the same bytes; id keys are written as strings by serde_json.
#[derive(Debug, Serialize, Deserialize)]
struct IndexFile {
    index: BTreeMap<String, Vec<DocId>>,
    doc_ids: BTreeMap<String, DocId>,
    id_to_file: BTreeMap<DocId, String>,
    id_to_title: BTreeMap<DocId, String>,
}

/// Write the index and catalog to `path` as JSON.
///
/// Each call writes its own uniquely named temp file next to the destination and
/// renames it into place, so concurrent readers see either the old or the new
/// snapshot even when several writers race.
pub fn save(index: &InvertedIndex, catalog: &DocumentCatalog, path: &Path) -> Result<()> {
    let data = IndexFile {
        index: index
            .iter()
            .map(|(lemma, set)| (lemma.to_string(), set.iter().copied().collect()))
            .collect(),
        doc_ids: catalog.doc_ids().iter().map(|(k, v)| (k.clone(), *v)).collect(),
        id_to_file: catalog.id_to_file().clone(),
        id_to_title: catalog.id_to_title().clone(),
    };

    let dir = match path.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    // Removed on drop if anything below fails.
    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut w = BufWriter::new(tmp.as_file_mut());
        serde_json::to_writer_pretty(&mut w, &data)?;
        w.write_all(b"\n")?;
        w.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;

    tracing::info!(path = %path.display(), num_docs = catalog.len(), num_lemmas = index.num_lemmas(), "index saved");
    Ok(())
}

/// Read an index previously written by [`save`].
///
/// Fails with [`Error::NotFound`] when nothing exists at `path`, and with
/// [`Error::Corrupt`] when the file is malformed or references unknown documents.
pub fn load(path: &Path) -> Result<(InvertedIndex, DocumentCatalog)> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Err(Error::NotFound(path.to_path_buf())),
        Err(err) if err.kind() == std::io::ErrorKind::InvalidData => return Err(Error::corrupt(path, err.to_string())),
        Err(err) => return Err(err.into()),
    };
    let data: IndexFile = serde_json::from_str(&text).map_err(|e| Error::corrupt(path, e.to_string()))?;

    let doc_ids: HashMap<String, DocId> = data.doc_ids.into_iter().collect();
    let catalog = DocumentCatalog::from_parts(doc_ids, data.id_to_file, data.id_to_title)
        .map_err(|reason| Error::corrupt(path, reason))?;

    let mut index = InvertedIndex::new();
    for (lemma, ids) in data.index {
        if lemma.is_empty() {
            return Err(Error::corrupt(path, "empty lemma key"));
        }
        if let Some(id) = ids.iter().find(|id| !catalog.contains(**id)) {
            return Err(Error::corrupt(path, format!("lemma {lemma:?} references unknown document {id}")));
        }
        index.extend(&lemma, ids);
    }

    tracing::info!(path = %path.display(), num_docs = catalog.len(), num_lemmas = index.num_lemmas(), "index loaded");
    Ok((index, catalog))
}
