pub mod builder;
pub mod catalog;
pub mod error;
pub mod index;
pub mod lemmas;
pub mod persist;
pub mod query;
pub mod service;
pub mod tokenizer;

pub use catalog::{Document, DocumentCatalog};
pub use error::{Error, Result};
pub use index::{DocId, InvertedIndex, PostingSet};
