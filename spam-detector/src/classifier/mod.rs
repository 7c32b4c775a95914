//! Text classification module
//!
//! Tokenizer, TF-IDF vectorizer and logistic regression composed into a
//! spam/ham pipeline.

pub mod logistic;
pub mod pipeline;
pub mod stop_words;
pub mod tfidf;
pub mod tokenizer;

pub use logistic::{FitSummary, LogisticParams, LogisticRegression};
pub use pipeline::{SpamPipeline, TrainingReport};
pub use tfidf::{SparseVector, TfidfVectorizer};
pub use tokenizer::Tokenizer;

use crate::dataset::Label;

/// A fitted text classifier shared read-only between requests
pub trait Classifier: Send + Sync {
    /// Model name reported by the health endpoint
    fn name(&self) -> &str;

    /// Classify one text; never fails
    fn predict(&self, text: &str) -> Label;

    /// Probability that the text is spam, in `[0, 1]`
    fn spam_probability(&self, text: &str) -> f64;

    fn vocabulary_size(&self) -> usize {
        0
    }
}
