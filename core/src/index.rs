use std::collections::{BTreeSet, HashMap};

pub type DocId = u32;

/// Set of documents containing a lemma. Kept ordered so results come out by ascending id.
pub type PostingSet = BTreeSet<DocId>;

static EMPTY: PostingSet = PostingSet::new();

/// Mapping from lemma to the documents that contain it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvertedIndex {
    postings: HashMap<String, PostingSet>,
}

impl InvertedIndex {
    pub fn new() -> Self { Self::default() }

    /// Record that `doc_id` contains `lemma`. Empty lemmas are ignored.
    pub fn add(&mut self, lemma: &str, doc_id: DocId) {
        if lemma.is_empty() { return; }
        match self.postings.get_mut(lemma) {
            Some(set) => { set.insert(doc_id); }
            None => { self.postings.insert(lemma.to_string(), PostingSet::from([doc_id])); }
        }
    }

    /// Insert a whole posting set, merging with any existing one.
    pub fn extend<I: IntoIterator<Item = DocId>>(&mut self, lemma: &str, doc_ids: I) {
        if lemma.is_empty() { return; }
        self.postings.entry(lemma.to_string()).or_default().extend(doc_ids);
    }

    pub fn get(&self, lemma: &str) -> Option<&PostingSet> { self.postings.get(lemma) }

    /// Posting set for `lemma`, or the shared empty set. Never inserts.
    pub fn postings_or_empty(&self, lemma: &str) -> &PostingSet {
        self.postings.get(lemma).unwrap_or(&EMPTY)
    }

    pub fn contains(&self, lemma: &str) -> bool { self.postings.contains_key(lemma) }

    pub fn num_lemmas(&self) -> usize { self.postings.len() }

    pub fn is_empty(&self) -> bool { self.postings.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PostingSet)> {
        self.postings.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_deduplicates_postings() {
        let mut idx = InvertedIndex::new();
        idx.add("город", 1);
        idx.add("город", 1);
        idx.add("город", 3);
        assert_eq!(idx.get("город").unwrap().iter().copied().collect::<Vec<_>>(), vec![1, 3]);
    }

    #[test]
    fn lookup_of_unknown_lemma_does_not_insert() {
        let idx = InvertedIndex::new();
        assert!(idx.postings_or_empty("рим").is_empty());
        assert!(!idx.contains("рим"));
        assert_eq!(idx.num_lemmas(), 0);
    }

    #[test]
    fn empty_lemma_is_ignored() {
        let mut idx = InvertedIndex::new();
        idx.add("", 0);
        idx.extend("", [1, 2]);
        assert!(idx.is_empty());
    }
}
