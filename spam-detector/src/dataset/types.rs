//! Dataset types and data structures

use serde::{Deserialize, Serialize};
use std::fmt;

/// Class of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// Unsolicited message
    Spam,
    /// Legitimate message
    Ham,
}

impl Label {
    /// Parse a category token ("spam" / "ham", any case, surrounding whitespace ignored)
    pub fn from_category(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("spam") {
            Some(Label::Spam)
        } else if value.eq_ignore_ascii_case("ham") {
            Some(Label::Ham)
        } else {
            None
        }
    }

    /// Parse a 0/1 spam indicator
    pub fn from_indicator(value: &str) -> Option<Self> {
        match value.trim().parse::<i64>().ok()? {
            1 => Some(Label::Spam),
            0 => Some(Label::Ham),
            _ => None,
        }
    }

    pub fn is_spam(self) -> bool {
        self == Label::Spam
    }

    /// Text shown to the user for this label
    pub fn verdict(self) -> &'static str {
        match self {
            Label::Spam => "SPAM",
            Label::Ham => "NOT SPAM",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Spam => f.write_str("spam"),
            Label::Ham => f.write_str("ham"),
        }
    }
}

/// A single training example
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub text: String,
    pub label: Label,
}

impl LabeledExample {
    pub fn new(text: impl Into<String>, label: Label) -> Self {
        Self {
            text: text.into(),
            label,
        }
    }
}

/// Per-source loading statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Rows kept
    pub loaded: usize,
    /// Rows without usable text
    pub missing_text: usize,
    /// Rows whose label could not be normalized
    pub unknown_label: usize,
}

impl LoadStats {
    pub fn dropped(&self) -> usize {
        self.missing_text + self.unknown_label
    }
}

/// Class counts of a corpus
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassBalance {
    pub spam: usize,
    pub ham: usize,
}

impl ClassBalance {
    pub fn of(examples: &[LabeledExample]) -> Self {
        examples.iter().fold(Self::default(), |mut acc, example| {
            match example.label {
                Label::Spam => acc.spam += 1,
                Label::Ham => acc.ham += 1,
            }
            acc
        })
    }

    pub fn total(&self) -> usize {
        self.spam + self.ham
    }
}
