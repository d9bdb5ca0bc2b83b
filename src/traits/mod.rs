//! Trait definitions for pluggable components
//!
//! These traits let embedders supply their own storage backend for the
//! metrics collector.

pub mod issue_store;

pub use issue_store::IssueStore;
