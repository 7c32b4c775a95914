//! spam-detector: spam/ham text classifier with an interactive web form
//!
//! Trains a TF-IDF + logistic regression pipeline on two labeled CSV
//! datasets at startup, then serves a single-page form that classifies
//! submitted text.
//!
//! # Example
//!
//! ```no_run
//! use spam_detector::classifier::SpamPipeline;
//! use spam_detector::config::Config;
//! use spam_detector::api::ApiServer;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let pipeline = SpamPipeline::train(&config)?;
//!
//!     let server = ApiServer::new(Arc::new(pipeline), config.listen_addr()?);
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`dataset`]: Dataset source adapters and label normalization
//! - [`classifier`]: Tokenizer, TF-IDF vectorizer and logistic regression
//! - [`api`]: Web form and health endpoint

pub mod api;
pub mod classifier;
pub mod config;
pub mod dataset;
pub mod error;

// Re-export commonly used types
pub use classifier::{Classifier, SpamPipeline};
pub use config::Config;
pub use dataset::{Label, LabeledExample};
pub use error::{DetectorError, Result};
