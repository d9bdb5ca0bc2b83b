//! In-memory issue store
//!
//! Suitable for tests, demos and embedders that keep issue state in
//! process. Grouping happens on every call, like the SQL implementation.

use super::types::{AggregateRow, IssueDimension, IssueRecord, PoolSnapshot};
use crate::error::{KiteError, Result};
use crate::traits::issue_store::IssueStore;
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

/// In-memory [`IssueStore`].
///
/// Cloning is cheap and clones share state, so a test can keep one handle
/// and give another to the collector.
#[derive(Clone, Default)]
pub struct InMemoryIssueStore {
    issues: Arc<RwLock<HashMap<String, IssueRecord>>>,
    pool: Arc<RwLock<Option<PoolSnapshot>>>,
    /// When set, every grouped query fails
    failing: Arc<AtomicBool>,
}

impl InMemoryIssueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store preloaded with `issues`
    pub fn with_issues(issues: impl IntoIterator<Item = IssueRecord>) -> Self {
        let store = Self::new();
        for issue in issues {
            store.insert(issue);
        }
        store
    }

    /// Insert or replace an issue by id
    pub fn insert(&self, issue: IssueRecord) {
        self.issues
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(issue.id.clone(), issue);
    }

    /// Change the state of an existing issue. Returns false if it does not exist.
    pub fn set_state(&self, id: &str, state: impl Into<String>) -> bool {
        let mut issues = self.issues.write().unwrap_or_else(PoisonError::into_inner);
        match issues.get_mut(id) {
            Some(issue) => {
                issue.state = state.into();
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, id: &str) -> Option<IssueRecord> {
        self.issues
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
    }

    pub fn clear(&self) {
        self.issues
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    pub fn len(&self) -> usize {
        self.issues.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Make subsequent grouped queries fail (or succeed again)
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Set the pool statistics reported to the collector; `None` makes them unavailable
    pub fn set_pool_snapshot(&self, snapshot: Option<PoolSnapshot>) {
        *self.pool.write().unwrap_or_else(PoisonError::into_inner) = snapshot;
    }
}

#[async_trait]
impl IssueStore for InMemoryIssueStore {
    async fn count_grouped(&self, dimensions: &[IssueDimension]) -> Result<Vec<AggregateRow>> {
        if dimensions.is_empty() {
            return Err(KiteError::bad_request("at least one grouping dimension is required"));
        }
        if self.failing.load(Ordering::SeqCst) {
            return Err(KiteError::database("in-memory store is configured to fail"));
        }

        let issues = self.issues.read().unwrap_or_else(PoisonError::into_inner);
        let mut groups: BTreeMap<Vec<String>, i64> = BTreeMap::new();
        for issue in issues.values() {
            let key = dimensions
                .iter()
                .map(|dimension| issue.dimension(*dimension).to_string())
                .collect();
            *groups.entry(key).or_insert(0) += 1;
        }

        Ok(groups
            .into_iter()
            .map(|(dimensions, count)| AggregateRow::new(dimensions, count))
            .collect())
    }

    fn pool_snapshot(&self) -> Result<PoolSnapshot> {
        let snapshot = *self.pool.read().unwrap_or_else(PoisonError::into_inner);
        snapshot.ok_or_else(|| KiteError::store_unavailable("no connection pool attached"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_store() -> InMemoryIssueStore {
        InMemoryIssueStore::with_issues([
            IssueRecord::new("1", "team-alpha", "major", "active", "build"),
            IssueRecord::new("2", "team-alpha", "critical", "active", "test"),
            IssueRecord::new("3", "team-beta", "minor", "resolved", "build"),
            IssueRecord::new("4", "team-alpha", "minor", "resolved", "build"),
        ])
    }

    #[tokio::test]
    async fn test_count_grouped_by_namespace_and_state() {
        let store = sample_store();
        let rows = store
            .count_grouped(&[IssueDimension::Namespace, IssueDimension::State])
            .await
            .unwrap();

        assert_eq!(
            rows,
            vec![
                AggregateRow::new(vec!["team-alpha".into(), "active".into()], 2),
                AggregateRow::new(vec!["team-alpha".into(), "resolved".into()], 1),
                AggregateRow::new(vec!["team-beta".into(), "resolved".into()], 1),
            ]
        );
    }

    #[tokio::test]
    async fn test_dimension_order_is_respected() {
        let store = sample_store();
        let rows = store
            .count_grouped(&[IssueDimension::State, IssueDimension::Severity])
            .await
            .unwrap();
        assert!(rows.contains(&AggregateRow::new(vec!["resolved".into(), "minor".into()], 2)));
    }

    #[tokio::test]
    async fn test_state_changes_move_counts() {
        let store = sample_store();
        assert!(store.set_state("1", "resolved"));
        assert!(!store.set_state("missing", "resolved"));

        let rows = store.count_grouped(&[IssueDimension::State]).await.unwrap();
        assert_eq!(
            rows,
            vec![
                AggregateRow::new(vec!["active".into()], 1),
                AggregateRow::new(vec!["resolved".into()], 3),
            ]
        );
    }

    #[tokio::test]
    async fn test_failure_switch_and_empty_dimensions() {
        let store = sample_store();
        assert!(store.count_grouped(&[]).await.is_err());

        store.set_failing(true);
        assert!(matches!(
            store.count_grouped(&[IssueDimension::State]).await,
            Err(KiteError::Database(_))
        ));

        store.set_failing(false);
        assert!(store.count_grouped(&[IssueDimension::State]).await.is_ok());
    }

    #[test]
    fn test_pool_snapshot_unavailable_until_set() {
        let store = InMemoryIssueStore::new();
        assert!(matches!(
            store.pool_snapshot(),
            Err(KiteError::StoreUnavailable(_))
        ));

        store.set_pool_snapshot(Some(PoolSnapshot::new(2, 3)));
        assert_eq!(store.pool_snapshot().unwrap(), PoolSnapshot::new(2, 3));
    }
}
