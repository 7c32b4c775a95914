//! Integration tests for dataset loading and model training

mod common;

use spam_detector::classifier::{Classifier, LogisticParams, SpamPipeline};
use spam_detector::dataset::{load_corpus, sources_from_config, ClassBalance, Label};
use spam_detector::DetectorError;

#[test]
fn test_corpus_concatenates_both_sources() {
    let (_dir, config) = common::write_datasets();
    let sources = sources_from_config(&config.datasets);
    let corpus = load_corpus(&sources).unwrap();

    assert_eq!(corpus.len(), 16);
    // Category source comes first
    assert_eq!(corpus[0].label, Label::Ham);
    assert!(corpus[0].text.starts_with("Go until jurong"));
    assert!(corpus[10].text.starts_with("Subject: naturally"));
    assert_eq!(corpus[10].label, Label::Spam);

    let balance = ClassBalance::of(&corpus);
    assert_eq!(balance.spam, 8);
    assert_eq!(balance.ham, 8);
}

#[test]
fn test_spam_vocabulary_is_flagged() {
    let (_dir, config) = common::write_datasets();
    let pipeline = SpamPipeline::train(&config).unwrap();

    assert_eq!(pipeline.predict("WIN a free prize now!!!"), Label::Spam);
    assert_eq!(pipeline.predict("WIN a free prize now!!!").verdict(), "SPAM");
}

#[test]
fn test_everyday_message_is_ham() {
    let (_dir, config) = common::write_datasets();
    let pipeline = SpamPipeline::train(&config).unwrap();

    let label = pipeline.predict("Let's meet for lunch tomorrow at noon");
    assert_eq!(label, Label::Ham);
    assert_eq!(label.verdict(), "NOT SPAM");
}

#[test]
fn test_prediction_is_idempotent() {
    let (_dir, config) = common::write_datasets();
    let pipeline = SpamPipeline::train(&config).unwrap();

    for text in ["claim your cash", "see you tonight", "", "zzz qqq"] {
        assert_eq!(pipeline.predict(text), pipeline.predict(text));
        assert_eq!(
            pipeline.spam_probability(text),
            pipeline.spam_probability(text)
        );
    }
}

#[test]
fn test_retraining_gives_identical_predictions() {
    let (_dir, config) = common::write_datasets();
    let first = SpamPipeline::train(&config).unwrap();
    let second = SpamPipeline::train(&config).unwrap();

    let held_out = [
        "free tickets for the winner",
        "dinner plans for tonight",
        "urgent reward waiting",
        "agenda for the review",
        "completely unrelated words",
    ];
    for text in held_out {
        assert_eq!(first.predict(text), second.predict(text));
        assert_eq!(first.predict_proba(text), second.predict_proba(text));
    }
}

#[test]
fn test_bad_rows_are_dropped_not_fatal() {
    let category = "Category,Message\nham,see you soon\nunknown,what\nspam,free prize\n";
    let indicator = "text,spam\nwin cash now,1\n,0\nhello friend,maybe\n";
    let (_dir, config) = common::write_datasets_with(category, indicator);

    let corpus = load_corpus(&sources_from_config(&config.datasets)).unwrap();
    assert_eq!(corpus.len(), 3);

    let pipeline = SpamPipeline::fit(&corpus, &LogisticParams::default()).unwrap();
    assert_eq!(pipeline.report().examples, 3);
}

#[test]
fn test_missing_dataset_is_fatal() {
    let (_dir, mut config) = common::write_datasets();
    config.datasets.indicator.path = "/nonexistent/spam.csv".to_string();

    assert!(matches!(
        SpamPipeline::train(&config),
        Err(DetectorError::Dataset(_))
    ));
}

#[test]
fn test_empty_datasets_are_fatal() {
    let (_dir, config) = common::write_datasets_with("", "text,spam\n");
    assert!(matches!(
        SpamPipeline::train(&config),
        Err(DetectorError::EmptyCorpus)
    ));
}
