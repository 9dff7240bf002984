//! Configuration module for Corpus-Crawler
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; missing keys fall back to the defaults the
//! crawler was tuned with.
//!
//! # Example
//!
//! ```no_run
//! use corpus_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawler.toml")).unwrap();
//! println!("Database: {}", config.storage.database_path);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlConfig, FetcherConfig, ServerConfig, StorageConfig, DEFAULT_USER_AGENT,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
