use crate::catalog::{DocumentCatalog, TitleExtractor, DEFAULT_SITE_NAME};
use crate::error::Result;
use crate::index::InvertedIndex;
use crate::lemmas::{list_lemma_files, read_lemma_file, LemmaFile, LemmaFilePattern, DEFAULT_FILE_PREFIX};
use crate::tokenizer::Normalizer;
use std::path::{Path, PathBuf};

/// Where to find the inputs of an index build and how to interpret their names.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Directory of per-document lemma files (`<prefix><N>.txt`).
    pub lemmas_dir: PathBuf,
    /// Directory of the raw pages the lemma files were produced from.
    pub pages_dir: PathBuf,
    pub file_prefix: String,
    /// Extension of the raw pages, without the dot.
    pub page_extension: String,
    /// Site name stripped from the end of page titles.
    pub site_name: String,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            lemmas_dir: PathBuf::from("./lemmas"),
            pages_dir: PathBuf::from("./pages"),
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            page_extension: "html".to_string(),
            site_name: DEFAULT_SITE_NAME.to_string(),
        }
    }
}

impl BuildConfig {
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(lemmas_dir: P, pages_dir: Q) -> Self {
        Self {
            lemmas_dir: lemmas_dir.as_ref().to_path_buf(),
            pages_dir: pages_dir.as_ref().to_path_buf(),
            ..Self::default()
        }
    }

    /// Raw page sharing the lemma file's stem.
    fn page_path(&self, lemma_file: &LemmaFile) -> PathBuf {
        let page_name = Path::new(&lemma_file.file_name).with_extension(&self.page_extension);
        self.pages_dir.join(page_name)
    }
}

pub struct IndexBuilder<'a> {
    config: BuildConfig,
    normalizer: &'a dyn Normalizer,
}

impl<'a> IndexBuilder<'a> {
    pub fn new(config: BuildConfig, normalizer: &'a dyn Normalizer) -> Self {
        Self { config, normalizer }
    }

    /// Read every lemma file and produce the inverted index and document catalog.
    ///
    /// Document ids are the ordinals embedded in the file names, so they stay stable
    /// across builds even when some inputs are missing.
    pub fn build(&self) -> Result<(InvertedIndex, DocumentCatalog)> {
        let pattern = LemmaFilePattern::new(&self.config.file_prefix);
        let titles = TitleExtractor::new(&self.config.site_name);
        let files = list_lemma_files(&self.config.lemmas_dir, &pattern)?;

        let mut index = InvertedIndex::new();
        let mut catalog = DocumentCatalog::new();
        for file in &files {
            let doc_id = file.ordinal;
            let title = titles.title_for(&self.config.page_path(file), &file.file_name);
            catalog.insert(doc_id, file.file_name.clone(), title);

            for entry in read_lemma_file(&file.path)? {
                let lemma = self.normalizer.normalize(&entry.lemma);
                index.add(&lemma, doc_id);
            }
        }

        tracing::info!(num_docs = catalog.len(), num_lemmas = index.num_lemmas(), "index built");
        Ok((index, catalog))
    }
}
