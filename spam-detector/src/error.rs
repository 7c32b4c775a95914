use thiserror::Error;

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV error in {source_name}: {error}")]
    Csv {
        source_name: String,
        #[source]
        error: csv::Error,
    },

    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Training corpus is empty")]
    EmptyCorpus,

    #[error("Vocabulary is empty after tokenization; corpus contains only stop words or no words")]
    EmptyVocabulary,

    #[error("Training corpus contains a single class: {0}")]
    SingleClass(String),

    #[error("Training error: {0}")]
    Training(String),

    #[error("Server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, DetectorError>;
