//! Boolean query evaluation over an [`InvertedIndex`].
//!
//! Queries combine bare terms with `NOT`, `AND` and `OR` (binding tightest to
//! loosest) and parentheses. Evaluation is a single operator-precedence pass
//! over the tokens with one stack of posting sets and one of operators.
//!
//! Parsing is lenient: an operator lacking operands is dropped, a stray `)` is
//! ignored and an unclosed `(` is discarded. A malformed query therefore still
//! yields a (possibly partial) result and never an error.

use crate::catalog::DocumentCatalog;
use crate::index::{InvertedIndex, PostingSet};
use crate::tokenizer::{tokenize_query, Normalizer, Operator, QueryToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StackOp {
    Open,
    Op(Operator),
}

pub struct QueryEvaluator<'a> {
    index: &'a InvertedIndex,
    catalog: &'a DocumentCatalog,
    normalizer: &'a dyn Normalizer,
}

impl<'a> QueryEvaluator<'a> {
    pub fn new(index: &'a InvertedIndex, catalog: &'a DocumentCatalog, normalizer: &'a dyn Normalizer) -> Self {
        Self { index, catalog, normalizer }
    }

    /// Documents matching `query`.
    pub fn evaluate(&self, query: &str) -> PostingSet {
        let query = query.trim();
        if !query.chars().any(|c| c.is_whitespace() || c == '(' || c == ')') {
            // A single word is always a term, even if it spells an operator.
            return self.term(query);
        }

        let mut values: Vec<PostingSet> = Vec::new();
        let mut ops: Vec<StackOp> = Vec::new();
        for token in tokenize_query(query) {
            match token {
                QueryToken::LParen => ops.push(StackOp::Open),
                QueryToken::RParen => {
                    while let Some(StackOp::Op(op)) = ops.last().copied() {
                        ops.pop();
                        self.apply(op, &mut values);
                    }
                    // the matching `(`, if there is one
                    ops.pop();
                }
                QueryToken::Op(incoming) => {
                    // Prefix NOT never forces out a pending NOT, so `NOT NOT a` nests.
                    if !incoming.is_unary() {
                        while let Some(StackOp::Op(top)) = ops.last().copied() {
                            if top.precedence() < incoming.precedence() { break; }
                            ops.pop();
                            self.apply(top, &mut values);
                        }
                    }
                    ops.push(StackOp::Op(incoming));
                }
                QueryToken::Term(word) => values.push(self.term(&word)),
            }
        }
        while let Some(top) = ops.pop() {
            if let StackOp::Op(op) = top {
                self.apply(op, &mut values);
            }
        }

        // Leftover operands (e.g. `a b`) are ignored; the first one wins.
        values.into_iter().next().unwrap_or_default()
    }

    fn term(&self, word: &str) -> PostingSet {
        if word.is_empty() { return PostingSet::new(); }
        let lemma = self.normalizer.normalize(&word.to_lowercase());
        self.index.postings_or_empty(&lemma).clone()
    }

    fn apply(&self, op: Operator, values: &mut Vec<PostingSet>) {
        match op {
            Operator::Not => {
                let Some(set) = values.pop() else {
                    tracing::debug!("NOT without operand, dropped");
                    return;
                };
                let universe = self.catalog.universe();
                values.push(universe.difference(&set).copied().collect());
            }
            Operator::And | Operator::Or => {
                if values.len() < 2 {
                    tracing::debug!(?op, operands = values.len(), "binary operator without enough operands, dropped");
                    return;
                }
                let (Some(b), Some(a)) = (values.pop(), values.pop()) else { return };
                let combined = if op == Operator::And {
                    a.intersection(&b).copied().collect()
                } else {
                    a.union(&b).copied().collect()
                };
                values.push(combined);
            }
        }
    }
}

/// Evaluate `query` against `index` using `normalizer` for operands.
pub fn evaluate(query: &str, index: &InvertedIndex, catalog: &DocumentCatalog, normalizer: &dyn Normalizer) -> PostingSet {
    QueryEvaluator::new(index, catalog, normalizer).evaluate(query)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::LowercaseNormalizer;
    use crate::DocId;

    fn fixture() -> (InvertedIndex, DocumentCatalog) {
        let mut index = InvertedIndex::new();
        let mut catalog = DocumentCatalog::new();
        for id in 0..3 {
            catalog.insert(id, format!("page_{id}.txt"), format!("Doc {id}"));
        }
        index.add("город", 0);
        index.add("рим", 0);
        index.add("город", 1);
        index.add("рим", 2);
        (index, catalog)
    }

    fn eval(q: &str) -> Vec<DocId> {
        let (index, catalog) = fixture();
        evaluate(q, &index, &catalog, &LowercaseNormalizer).into_iter().collect()
    }

    #[test]
    fn basic_operators() {
        assert_eq!(eval("город AND рим"), vec![0]);
        assert_eq!(eval("город OR рим"), vec![0, 1, 2]);
        assert_eq!(eval("NOT город"), vec![2]);
        assert_eq!(eval("город and not рим"), vec![1]);
    }

    #[test]
    fn and_binds_tighter_than_or() {
        // рим OR (город AND NOT рим)
        assert_eq!(eval("рим OR город AND NOT рим"), vec![0, 1, 2]);
        assert_eq!(eval("(рим OR город) AND NOT рим"), vec![1]);
        assert_eq!(eval("NOT город OR город AND рим"), vec![0, 2]);
    }

    #[test]
    fn fast_path_is_a_single_term() {
        assert_eq!(eval("Город"), vec![0, 1]);
        assert_eq!(eval("  рим  "), vec![0, 2]);
        assert!(eval("NOT").is_empty());
        assert!(eval("море").is_empty());
        assert!(eval("").is_empty());
        // a glued `)` sends the word through the parser, which ignores the stray paren
        assert_eq!(eval("рим)"), vec![0, 2]);
    }

    #[test]
    fn double_negation_cancels() {
        assert_eq!(eval("NOT NOT город"), vec![0, 1]);
        assert_eq!(eval("NOT (NOT рим)"), vec![0, 2]);
    }

    #[test]
    fn malformed_queries_are_lenient() {
        // dangling operators are dropped
        assert_eq!(eval("город AND"), vec![0, 1]);
        assert_eq!(eval("OR рим"), vec![0, 2]);
        assert_eq!(eval("AND OR"), Vec::<DocId>::new());
        assert_eq!(eval("NOT ( )"), Vec::<DocId>::new());
        // unbalanced parentheses
        assert_eq!(eval("(город AND рим"), vec![0]);
        assert_eq!(eval("город AND рим)"), vec![0]);
        assert_eq!(eval(") рим ("), vec![0, 2]);
        // missing operator: first operand wins
        assert_eq!(eval("город рим"), vec![0, 1]);
    }

    #[test]
    fn negation_respects_sparse_ids() {
        let mut index = InvertedIndex::new();
        let mut catalog = DocumentCatalog::new();
        catalog.insert(5, "page_5.txt", "a");
        catalog.insert(40, "page_40.txt", "b");
        index.add("рим", 40);
        let got: Vec<DocId> = evaluate("NOT рим", &index, &catalog, &LowercaseNormalizer).into_iter().collect();
        assert_eq!(got, vec![5]);
    }
}
