//! Dataset source adapters
//!
//! Each source knows its own on-disk schema and yields normalized
//! `LabeledExample`s. Rows that cannot be normalized are dropped and counted.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::types::*;
use crate::config::{CategoryDatasetConfig, DatasetsConfig, IndicatorDatasetConfig};
use crate::error::{DetectorError, Result};

/// A source of labeled training examples
pub trait ExampleSource: Send + Sync {
    /// Human-readable source name used in logs and errors
    fn name(&self) -> &str;

    /// Load every usable example from the source
    fn load_examples(&self) -> Result<Vec<LabeledExample>>;
}

/// Headerless-or-not CSV whose label column holds "spam" / "ham"
#[derive(Debug, Clone)]
pub struct CategoryCsvSource {
    name: String,
    path: PathBuf,
    has_header: bool,
    label_column: usize,
    text_column: usize,
}

impl CategoryCsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: display_name(&path),
            path,
            has_header: false,
            label_column: 0,
            text_column: 1,
        }
    }

    pub fn from_config(config: &CategoryDatasetConfig) -> Self {
        Self::new(&config.path)
            .with_header(config.has_header)
            .with_columns(config.label_column, config.text_column)
    }

    pub fn with_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    pub fn with_columns(mut self, label_column: usize, text_column: usize) -> Self {
        self.label_column = label_column;
        self.text_column = text_column;
        self
    }

    /// Read examples from any CSV stream using this source's schema
    pub fn read_from<R: Read>(&self, reader: R) -> Result<(Vec<LabeledExample>, LoadStats)> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(self.has_header)
            .flexible(true)
            .from_reader(reader);

        let mut width = self.label_column.max(self.text_column) + 1;
        if self.has_header {
            let headers = csv_reader.headers().map_err(|error| self.csv_error(error))?;
            width = width.max(headers.len());
        }

        let mut examples = Vec::new();
        let mut stats = LoadStats::default();

        for record in csv_reader.records() {
            let record = record.map_err(|error| self.csv_error(error))?;
            check_width(&self.name, &record, width)?;

            let text = match record.get(self.text_column) {
                Some(text) if !text.trim().is_empty() => text,
                _ => {
                    stats.missing_text += 1;
                    continue;
                }
            };

            match record.get(self.label_column).and_then(Label::from_category) {
                Some(label) => {
                    examples.push(LabeledExample::new(text, label));
                    stats.loaded += 1;
                }
                None => {
                    debug!(
                        "{}: dropping row {} with label {:?}",
                        self.name,
                        record.position().map(|p| p.line()).unwrap_or_default(),
                        record.get(self.label_column)
                    );
                    stats.unknown_label += 1;
                }
            }
        }

        Ok((examples, stats))
    }

    fn csv_error(&self, error: csv::Error) -> DetectorError {
        DetectorError::Csv {
            source_name: self.name.clone(),
            error,
        }
    }
}

impl ExampleSource for CategoryCsvSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_examples(&self) -> Result<Vec<LabeledExample>> {
        let file = File::open(&self.path).map_err(|e| {
            DetectorError::Dataset(format!("Failed to open {}: {}", self.path.display(), e))
        })?;
        let (examples, stats) = self.read_from(file)?;
        report(&self.name, &stats);
        Ok(examples)
    }
}

/// CSV with a header row, a text column and a 0/1 spam indicator column
#[derive(Debug, Clone)]
pub struct IndicatorCsvSource {
    name: String,
    path: PathBuf,
    text_column: String,
    indicator_column: String,
}

impl IndicatorCsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: display_name(&path),
            path,
            text_column: "text".to_string(),
            indicator_column: "spam".to_string(),
        }
    }

    pub fn from_config(config: &IndicatorDatasetConfig) -> Self {
        Self::new(&config.path).with_columns(&config.text_column, &config.indicator_column)
    }

    pub fn with_columns(mut self, text_column: &str, indicator_column: &str) -> Self {
        self.text_column = text_column.to_string();
        self.indicator_column = indicator_column.to_string();
        self
    }

    /// Read examples from any CSV stream using this source's schema
    pub fn read_from<R: Read>(&self, reader: R) -> Result<(Vec<LabeledExample>, LoadStats)> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|error| DetectorError::Csv {
                source_name: self.name.clone(),
                error,
            })?
            .clone();

        let text_idx = self.column_index(&headers, &self.text_column)?;
        let indicator_idx = self.column_index(&headers, &self.indicator_column)?;

        let mut examples = Vec::new();
        let mut stats = LoadStats::default();

        for record in csv_reader.records() {
            let record = record.map_err(|error| DetectorError::Csv {
                source_name: self.name.clone(),
                error,
            })?;
            check_width(&self.name, &record, headers.len())?;

            let text = match record.get(text_idx) {
                Some(text) if !text.trim().is_empty() => text,
                _ => {
                    stats.missing_text += 1;
                    continue;
                }
            };

            match record.get(indicator_idx).and_then(Label::from_indicator) {
                Some(label) => {
                    examples.push(LabeledExample::new(text, label));
                    stats.loaded += 1;
                }
                None => stats.unknown_label += 1,
            }
        }

        Ok((examples, stats))
    }

    fn column_index(&self, headers: &csv::StringRecord, column: &str) -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| {
                DetectorError::Dataset(format!(
                    "{}: column '{}' not found in header {:?}",
                    self.name,
                    column,
                    headers.iter().collect::<Vec<_>>()
                ))
            })
    }
}

impl ExampleSource for IndicatorCsvSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn load_examples(&self) -> Result<Vec<LabeledExample>> {
        let file = File::open(&self.path).map_err(|e| {
            DetectorError::Dataset(format!("Failed to open {}: {}", self.path.display(), e))
        })?;
        let (examples, stats) = self.read_from(file)?;
        report(&self.name, &stats);
        Ok(examples)
    }
}

/// Build the configured sources: category dataset first, then indicator dataset
pub fn sources_from_config(config: &DatasetsConfig) -> Vec<Box<dyn ExampleSource>> {
    vec![
        Box::new(CategoryCsvSource::from_config(&config.category)),
        Box::new(IndicatorCsvSource::from_config(&config.indicator)),
    ]
}

/// Concatenate the examples of every source, in order
pub fn load_corpus(sources: &[Box<dyn ExampleSource>]) -> Result<Vec<LabeledExample>> {
    let mut corpus = Vec::new();

    for source in sources {
        let examples = source.load_examples()?;
        info!("Loaded {} examples from {}", examples.len(), source.name());
        corpus.extend(examples);
    }

    let balance = ClassBalance::of(&corpus);
    info!(
        "Training corpus: {} examples ({} spam, {} ham)",
        balance.total(),
        balance.spam,
        balance.ham
    );

    Ok(corpus)
}

/// Short rows are tolerated (their missing fields read as empty); a row
/// with more fields than the schema is malformed
fn check_width(name: &str, record: &csv::StringRecord, width: usize) -> Result<()> {
    if record.len() > width {
        return Err(DetectorError::Dataset(format!(
            "{}: line {} has {} fields, expected {}",
            name,
            record.position().map(|p| p.line()).unwrap_or_default(),
            record.len(),
            width
        )));
    }
    Ok(())
}

fn report(name: &str, stats: &LoadStats) {
    if stats.dropped() > 0 {
        warn!(
            "{}: dropped {} rows ({} without text, {} with unrecognized label)",
            name,
            stats.dropped(),
            stats.missing_text,
            stats.unknown_label
        );
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
