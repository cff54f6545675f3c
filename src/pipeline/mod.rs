//! Document processing pipeline.
//!
//! Turns fetched markup into a self-contained document whose references all
//! resolve against the remote static-file origin.

mod prepare;
pub mod rewrite;

pub use rewrite::rewrite_document;
