//! Shared fixtures for integration tests

#![allow(dead_code)]

use spam_detector::config::Config;
use std::fs;
use tempfile::TempDir;

/// Headerless "category,message" rows
pub const CATEGORY_CSV: &str = "\
ham,Go until jurong point crazy available only in bugis
spam,WINNER!! You have been selected to receive a free prize reward
ham,Ok lar joking wif u oni
spam,\"Free entry in a weekly competition to win cash, text WIN now\"
ham,I'll meet you at the cafe for lunch tomorrow
spam,URGENT! You have won a guaranteed cash prize claim now
ham,Sorry I missed your call let's talk later tonight
spam,Congratulations! Claim your free holiday voucher now
ham,Are we still on for dinner at noon
spam,You won a free mobile phone call to claim your prize
";

/// "text,spam" rows with a header
pub const INDICATOR_CSV: &str = "\
text,spam
\"Subject: naturally irresistible corporate identity, win free offer\",1
\"Subject: meeting notes for tomorrow, see agenda attached\",0
\"Subject: free cash prize winner, act now\",1
\"Subject: lunch with the project team at noon\",0
\"Subject: claim your free reward today\",1
\"Subject: re: schedule for the review meeting tomorrow\",0
";

/// Write both datasets into a temp dir and point a config at them
pub fn write_datasets() -> (TempDir, Config) {
    write_datasets_with(CATEGORY_CSV, INDICATOR_CSV)
}

pub fn write_datasets_with(category: &str, indicator: &str) -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    let category_path = dir.path().join("email.csv");
    let indicator_path = dir.path().join("spam.csv");
    fs::write(&category_path, category).unwrap();
    fs::write(&indicator_path, indicator).unwrap();

    let mut config = Config::default();
    config.datasets.category.path = category_path.to_string_lossy().into_owned();
    config.datasets.indicator.path = indicator_path.to_string_lossy().into_owned();
    config.server.open_browser = false;

    (dir, config)
}
