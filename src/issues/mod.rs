//! Issue domain types consumed by the metrics collector.
//!
//! Issues are only ever read in aggregate here: grouped counts by
//! namespace, severity, state and type.

mod in_memory;
mod types;

pub use in_memory::InMemoryIssueStore;
pub use types::{AggregateRow, IssueDimension, IssueRecord, PoolSnapshot};
