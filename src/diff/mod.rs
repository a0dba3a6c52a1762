//! Structural diffing and report rendering
//!
//! The analyzer is a pure function over two graph states; the report layer
//! renders its output. Neither knows where the states came from, so the
//! same code diffs live graphs, mirrors, and committed snapshots.

pub mod analyzer;
pub mod types;
pub mod visualizer;

// Re-export main types
pub use analyzer::{diff_graphs, ChangeAnalyzer};
pub use types::{ChangeKind, GraphChange};
pub use visualizer::ChangeReport;
