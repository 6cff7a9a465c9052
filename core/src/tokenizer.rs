use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;

/// Maps a raw query term (or a lemma read from disk) to the key used in the index.
///
/// Implementations are handed to the builder and the evaluator explicitly; nothing in
/// this crate constructs one on its own.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, term: &str) -> String;
}

impl<F> Normalizer for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    fn normalize(&self, term: &str) -> String { self(term) }
}

/// NFKC + lowercase. Leaves lemmas produced by an external lemmatizer untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowercaseNormalizer;

impl Normalizer for LowercaseNormalizer {
    fn normalize(&self, term: &str) -> String {
        term.trim().nfkc().collect::<String>().to_lowercase()
    }
}

/// Lowercasing followed by a Snowball stemmer.
pub struct StemmingNormalizer {
    stemmer: Stemmer,
}

impl StemmingNormalizer {
    pub fn new(algorithm: Algorithm) -> Self {
        Self { stemmer: Stemmer::create(algorithm) }
    }

    pub fn russian() -> Self { Self::new(Algorithm::Russian) }

    pub fn english() -> Self { Self::new(Algorithm::English) }

    /// Resolve a language name as accepted on the command line.
    pub fn for_language(lang: &str) -> Option<Self> {
        match lang.to_ascii_lowercase().as_str() {
            "ru" | "russian" => Some(Self::russian()),
            "en" | "english" => Some(Self::english()),
            _ => None,
        }
    }
}

/// Normalizer selected by an optional stemmer language: plain lowercasing when
/// `stem` is `None`, `None` when the language is not supported.
pub fn normalizer_for(stem: Option<&str>) -> Option<Box<dyn Normalizer>> {
    match stem {
        None => Some(Box::new(LowercaseNormalizer)),
        Some(lang) => StemmingNormalizer::for_language(lang).map(|n| Box::new(n) as Box<dyn Normalizer>),
    }
}

impl Normalizer for StemmingNormalizer {
    fn normalize(&self, term: &str) -> String {
        let lowered = LowercaseNormalizer.normalize(term);
        self.stemmer.stem(&lowered).into_owned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Not,
    And,
    Or,
}

impl Operator {
    /// Operator keywords are matched case-insensitively.
    pub fn parse(word: &str) -> Option<Self> {
        match word.to_uppercase().as_str() {
            "NOT" => Some(Operator::Not),
            "AND" => Some(Operator::And),
            "OR" => Some(Operator::Or),
            _ => None,
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            Operator::Not => 3,
            Operator::And => 2,
            Operator::Or => 1,
        }
    }

    pub fn is_unary(self) -> bool { matches!(self, Operator::Not) }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryToken {
    LParen,
    RParen,
    Op(Operator),
    /// Operand as typed; normalization happens at evaluation time.
    Term(String),
}

/// Split a boolean query into tokens. Parentheses are always token boundaries,
/// even when glued to a term (`(рим` -> `(`, `рим`).
pub fn tokenize_query(query: &str) -> Vec<QueryToken> {
    let spaced = query.replace('(', " ( ").replace(')', " ) ");
    spaced
        .split_whitespace()
        .map(|word| match word {
            "(" => QueryToken::LParen,
            ")" => QueryToken::RParen,
            _ => match Operator::parse(word) {
                Some(op) => QueryToken::Op(op),
                None => QueryToken::Term(word.to_string()),
            },
        })
        .collect()
}
