//! Output module for crawl statistics
//!
//! This module handles:
//! - Aggregating frontier, queue and corpus counts from storage
//! - Printing statistics for the command line

pub mod stats;

pub use stats::{print_statistics, realtime_stats, RealtimeStats};
