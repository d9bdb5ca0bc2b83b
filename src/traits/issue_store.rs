//! Issue store trait
//!
//! The metrics collector only needs two things from persistent storage:
//! grouped counts over the issues table and a view of connection pool
//! occupancy. Implement this trait to plug in any backend.

use crate::error::Result;
use crate::issues::{AggregateRow, IssueDimension, PoolSnapshot};
use async_trait::async_trait;

#[async_trait]
pub trait IssueStore: Send + Sync {
    /// Count issues grouped by `dimensions`.
    ///
    /// Equivalent to `SELECT <dims>, COUNT(*) FROM issues GROUP BY <dims>`.
    /// Each row's dimension values follow the order of `dimensions`. Groups
    /// with no issues are never returned.
    async fn count_grouped(&self, dimensions: &[IssueDimension]) -> Result<Vec<AggregateRow>>;

    /// Current connection pool occupancy
    fn pool_snapshot(&self) -> Result<PoolSnapshot>;
}
