//! URL handling module for Corpus-Crawler
//!
//! This module provides the pure URL classification rules the crawler relies
//! on: syntactic validation, text-content heuristics, and wiki-site detection.
//! None of these functions fail; malformed input is simply classified `false`.

mod classify;
mod validate;
mod wiki;

// Re-export main functions
pub use classify::{has_text_hint, is_likely_text_content, TEXT_INDICATORS};
pub use validate::is_syntactically_valid;
pub use wiki::{is_wiki_article_link, is_wiki_url, WIKI_EXCLUDED_MARKERS};
