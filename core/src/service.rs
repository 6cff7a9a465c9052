use crate::builder::{BuildConfig, IndexBuilder};
use crate::catalog::{Document, DocumentCatalog};
use crate::error::Result;
use crate::index::{DocId, InvertedIndex, PostingSet};
use crate::persist::{self, DEFAULT_INDEX_FILE};
use crate::query::QueryEvaluator;
use crate::tokenizer::Normalizer;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Persisted index; created from `build` when missing.
    pub index_path: PathBuf,
    pub build: BuildConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self { index_path: PathBuf::from(DEFAULT_INDEX_FILE), build: BuildConfig::default() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub title: String,
    pub file: String,
}

/// A loaded index plus the normalizer used for query terms. Read-only once constructed.
pub struct SearchService {
    index: InvertedIndex,
    catalog: DocumentCatalog,
    normalizer: Box<dyn Normalizer>,
}

impl SearchService {
    pub fn new(index: InvertedIndex, catalog: DocumentCatalog, normalizer: Box<dyn Normalizer>) -> Self {
        Self { index, catalog, normalizer }
    }

    /// Load the persisted index, or build and persist it if there is none yet.
    /// A corrupt index file is an error, not a trigger for rebuilding.
    pub fn open(config: &ServiceConfig, normalizer: Box<dyn Normalizer>) -> Result<Self> {
        let (index, catalog) = match persist::load(&config.index_path) {
            Ok(loaded) => loaded,
            Err(err) if err.is_not_found() => {
                tracing::info!(path = %config.index_path.display(), "index file not found, building");
                let built = IndexBuilder::new(config.build.clone(), &*normalizer).build()?;
                persist::save(&built.0, &built.1, &config.index_path)?;
                built
            }
            Err(err) => return Err(err),
        };
        Ok(Self::new(index, catalog, normalizer))
    }

    /// Matching document ids for `query`.
    pub fn evaluate(&self, query: &str) -> PostingSet {
        QueryEvaluator::new(&self.index, &self.catalog, &*self.normalizer).evaluate(query)
    }

    /// Matching documents ordered by ascending id. No match is an empty list.
    pub fn search(&self, query: &str) -> Vec<SearchHit> {
        self.evaluate(query)
            .into_iter()
            .filter_map(|id| self.catalog.document(id))
            .map(|d| SearchHit { doc_id: d.id, title: d.title, file: d.file })
            .collect()
    }

    pub fn document(&self, id: DocId) -> Option<Document> { self.catalog.document(id) }

    pub fn num_docs(&self) -> usize { self.catalog.len() }

    pub fn num_lemmas(&self) -> usize { self.index.num_lemmas() }

    pub fn index(&self) -> &InvertedIndex { &self.index }

    pub fn catalog(&self) -> &DocumentCatalog { &self.catalog }
}
