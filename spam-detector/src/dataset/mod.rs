//! Training data module
//!
//! Loads labeled messages from heterogeneous CSV sources and normalizes them
//! into a single `(text, label)` corpus.

pub mod sources;
pub mod types;

pub use sources::{
    load_corpus, sources_from_config, CategoryCsvSource, ExampleSource, IndicatorCsvSource,
};
pub use types::*;
