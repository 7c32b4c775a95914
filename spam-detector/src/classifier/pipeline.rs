//! Spam pipeline: TF-IDF vectorizer followed by logistic regression

use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::logistic::{FitSummary, LogisticParams, LogisticRegression};
use super::tfidf::TfidfVectorizer;
use super::tokenizer::Tokenizer;
use super::Classifier;
use crate::config::Config;
use crate::dataset::{load_corpus, sources_from_config, ClassBalance, Label, LabeledExample};
use crate::error::{DetectorError, Result};

/// Training report kept alongside the fitted model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingReport {
    pub examples: usize,
    pub balance: ClassBalance,
    pub vocabulary_size: usize,
    pub optimizer: FitSummary,
    pub elapsed: Duration,
}

/// Fitted, immutable spam classifier
#[derive(Debug, Clone)]
pub struct SpamPipeline {
    vectorizer: TfidfVectorizer,
    model: LogisticRegression,
    report: TrainingReport,
}

impl SpamPipeline {
    /// Fit the vectorizer and the classifier on a labeled corpus
    pub fn fit(corpus: &[LabeledExample], params: &LogisticParams) -> Result<Self> {
        let started = Instant::now();

        if corpus.is_empty() {
            return Err(DetectorError::EmptyCorpus);
        }

        let balance = ClassBalance::of(corpus);
        if balance.spam == 0 || balance.ham == 0 {
            let only = if balance.spam == 0 { Label::Ham } else { Label::Spam };
            return Err(DetectorError::SingleClass(only.to_string()));
        }

        let texts: Vec<&str> = corpus.iter().map(|e| e.text.as_str()).collect();
        let targets: Vec<bool> = corpus.iter().map(|e| e.label.is_spam()).collect();

        let vectorizer = TfidfVectorizer::fit(Tokenizer::new(), &texts)?;
        let vocabulary_size = vectorizer.vocabulary_size();
        info!("Vocabulary: {} terms", vocabulary_size);

        let features = vectorizer.transform_all(&texts);
        let (model, optimizer) =
            LogisticRegression::fit(&features, &targets, vocabulary_size, params)?;

        let report = TrainingReport {
            examples: corpus.len(),
            balance,
            vocabulary_size,
            optimizer,
            elapsed: started.elapsed(),
        };

        info!(
            "Model trained on {} examples in {:?} ({} iterations, loss {:.4}, converged: {})",
            report.examples,
            report.elapsed,
            optimizer.iterations,
            optimizer.loss,
            optimizer.converged
        );

        Ok(Self {
            vectorizer,
            model,
            report,
        })
    }

    /// Load the configured datasets and fit on their concatenation
    pub fn train(config: &Config) -> Result<Self> {
        let sources = sources_from_config(&config.datasets);
        let corpus = load_corpus(&sources)?;
        Self::fit(&corpus, &LogisticParams::from(&config.model))
    }

    /// Spam probability of a text
    pub fn predict_proba(&self, text: &str) -> f64 {
        let features = self.vectorizer.transform(text);
        self.model.predict_proba(&features)
    }

    pub fn predict(&self, text: &str) -> Label {
        let probability = self.predict_proba(text);
        debug!("Spam probability {:.4} for {} chars", probability, text.len());
        if probability > 0.5 {
            Label::Spam
        } else {
            Label::Ham
        }
    }

    pub fn report(&self) -> &TrainingReport {
        &self.report
    }

    pub fn model(&self) -> &LogisticRegression {
        &self.model
    }
}

impl Classifier for SpamPipeline {
    fn name(&self) -> &str {
        "tfidf+logistic-regression"
    }

    fn predict(&self, text: &str) -> Label {
        SpamPipeline::predict(self, text)
    }

    fn spam_probability(&self, text: &str) -> f64 {
        self.predict_proba(text)
    }

    fn vocabulary_size(&self) -> usize {
        self.vectorizer.vocabulary_size()
    }
}
