//! TF-IDF vectorizer
//!
//! Learns a sorted vocabulary and smoothed inverse document frequencies from
//! a corpus, then maps text to L2-normalized sparse vectors.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::tokenizer::Tokenizer;
use crate::error::{DetectorError, Result};

/// Sparse feature vector, entries sorted by feature index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Build from `(index, value)` pairs; indices must be unique
    pub fn from_entries(mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|&(index, _)| index);
        Self { entries }
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Dot product with a dense vector
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|&(index, value)| value * dense[index])
            .sum()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt()
    }
}

/// Fitted TF-IDF vectorizer
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    tokenizer: Tokenizer,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfidfVectorizer {
    /// Learn vocabulary and IDF weights from the documents
    pub fn fit<S: AsRef<str>>(tokenizer: Tokenizer, documents: &[S]) -> Result<Self> {
        if documents.is_empty() {
            return Err(DetectorError::EmptyCorpus);
        }

        let mut document_frequency: BTreeMap<String, usize> = BTreeMap::new();
        for document in documents {
            let distinct: BTreeSet<String> =
                tokenizer.tokenize(document.as_ref()).into_iter().collect();
            for token in distinct {
                *document_frequency.entry(token).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(DetectorError::EmptyVocabulary);
        }

        // BTreeMap iteration gives the sorted vocabulary order
        let n = documents.len() as f64;
        let mut vocabulary = HashMap::with_capacity(document_frequency.len());
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (index, (token, df)) in document_frequency.into_iter().enumerate() {
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
            vocabulary.insert(token, index);
        }

        Ok(Self {
            tokenizer,
            vocabulary,
            idf,
        })
    }

    /// Vectorize one text; terms outside the vocabulary are ignored
    pub fn transform(&self, text: &str) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in self.tokenizer.tokenize(text) {
            if let Some(&index) = self.vocabulary.get(&token) {
                *counts.entry(index).or_insert(0.0) += 1.0;
            }
        }

        let weighted: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(index, count)| (index, count * self.idf[index]))
            .collect();

        let mut vector = SparseVector::from_entries(weighted);
        let norm = vector.norm();
        if norm > 0.0 {
            for (_, value) in vector.entries.iter_mut() {
                *value /= norm;
            }
        }
        vector
    }

    pub fn transform_all<S: AsRef<str>>(&self, documents: &[S]) -> Vec<SparseVector> {
        documents.iter().map(|d| self.transform(d.as_ref())).collect()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f64> {
        self.index_of(term).map(|index| self.idf[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(documents: &[&str]) -> TfidfVectorizer {
        TfidfVectorizer::fit(Tokenizer::new(), documents).unwrap()
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let vectorizer = fit(&["zebra apple", "mango apple"]);
        assert_eq!(vectorizer.vocabulary_size(), 3);
        assert_eq!(vectorizer.index_of("apple"), Some(0));
        assert_eq!(vectorizer.index_of("mango"), Some(1));
        assert_eq!(vectorizer.index_of("zebra"), Some(2));
        assert_eq!(vectorizer.index_of("the"), None);
    }

    #[test]
    fn test_smoothed_idf() {
        let vectorizer = fit(&["zebra apple", "mango apple"]);
        // df = 2 of n = 2
        assert!((vectorizer.idf("apple").unwrap() - 1.0).abs() < 1e-12);
        // df = 1 of n = 2
        let expected = (3.0f64 / 2.0).ln() + 1.0;
        assert!((vectorizer.idf("zebra").unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_transform_is_l2_normalized() {
        let vectorizer = fit(&["free prize free", "lunch meeting"]);
        let vector = vectorizer.transform("free free prize");
        assert_eq!(vector.nnz(), 2);
        assert!((vector.norm() - 1.0).abs() < 1e-12);

        let free = vector.entries()[0].1;
        let prize = vector.entries()[1].1;
        assert!(free > prize);
    }

    #[test]
    fn test_unknown_terms_give_empty_vector() {
        let vectorizer = fit(&["free prize", "lunch meeting"]);
        assert!(vectorizer.transform("completely unseen words").is_empty());
        assert!(vectorizer.transform("").is_empty());
    }

    #[test]
    fn test_empty_inputs_are_errors() {
        let empty: [&str; 0] = [];
        assert!(matches!(
            TfidfVectorizer::fit(Tokenizer::new(), &empty),
            Err(DetectorError::EmptyCorpus)
        ));
        assert!(matches!(
            TfidfVectorizer::fit(Tokenizer::new(), &["the and a", "!!!"]),
            Err(DetectorError::EmptyVocabulary)
        ));
    }

    #[test]
    fn test_sparse_dot() {
        let vector = SparseVector::from_entries(vec![(2, 0.5), (0, 2.0)]);
        assert_eq!(vector.entries()[0], (0, 2.0));
        assert_eq!(vector.dot(&[1.0, 10.0, 4.0]), 4.0);
    }
}
