//! HTTP module for spam-detector
//!
//! Serves the classification form and a health endpoint

pub mod handlers;
pub mod server;
pub mod web;

pub use handlers::AppState;
pub use server::{browser_url, router, spawn_browser_launch, ApiServer};
