//! SeaORM-backed issue store.
//!
//! Counts are computed with a plain `GROUP BY` over the issues table on every
//! call; nothing is cached between scrapes.
//!
//! # Example
//!
//! ```rust,ignore
//! use kite_exporter::database::{DatabaseConfig, SeaOrmIssueStore};
//!
//! let store = SeaOrmIssueStore::connect(&DatabaseConfig::from_env()?).await?;
//! let app = App::new().with_issue_store(Arc::new(store));
//! ```

use super::config::DatabaseConfig;
use crate::error::{KiteError, Result};
use crate::issues::{AggregateRow, IssueDimension, PoolSnapshot};
use crate::traits::issue_store::IssueStore;
use async_trait::async_trait;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::time::Duration;

const DEFAULT_TABLE: &str = "issues";

/// [`IssueStore`] over a SeaORM connection pool (PostgreSQL or SQLite)
#[derive(Clone)]
pub struct SeaOrmIssueStore {
    conn: DatabaseConnection,
    table: String,
}

impl SeaOrmIssueStore {
    /// Wrap an existing connection, reading from the `issues` table
    pub fn new(conn: DatabaseConnection) -> Self {
        Self {
            conn,
            table: DEFAULT_TABLE.to_string(),
        }
    }

    /// Read from a different table. The name is interpolated into SQL, so
    /// only plain identifiers (optionally schema-qualified) are accepted.
    pub fn with_table(mut self, table: impl Into<String>) -> Result<Self> {
        let table = table.into();
        if !is_valid_table_name(&table) {
            return Err(KiteError::bad_request(format!(
                "invalid issues table name '{}'",
                table
            )));
        }
        self.table = table;
        Ok(self)
    }

    /// Open a pool from config
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let mut opt = ConnectOptions::new(&config.url);
        opt.max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .sqlx_logging(false);
        if config.idle_timeout > 0 {
            opt.idle_timeout(Duration::from_secs(config.idle_timeout));
        }

        let conn = Database::connect(opt).await.map_err(|e| {
            KiteError::store_unavailable(format!(
                "Failed to connect to {}: {}",
                config.redacted_url(),
                e
            ))
        })?;

        tracing::info!(
            url = %config.redacted_url(),
            max_connections = config.max_connections,
            "Issue store connected"
        );

        Self::new(conn).with_table(config.issues_table.clone())
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    fn grouped_count_sql(&self, dimensions: &[IssueDimension]) -> String {
        let columns = dimensions
            .iter()
            .map(|d| d.column())
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "SELECT {columns}, COUNT(*) AS count FROM {table} GROUP BY {columns}",
            columns = columns,
            table = self.table
        )
    }
}

#[async_trait]
impl IssueStore for SeaOrmIssueStore {
    async fn count_grouped(&self, dimensions: &[IssueDimension]) -> Result<Vec<AggregateRow>> {
        if dimensions.is_empty() {
            return Err(KiteError::bad_request("at least one grouping dimension is required"));
        }

        let backend = self.conn.get_database_backend();
        let sql = self.grouped_count_sql(dimensions);
        tracing::trace!(sql = %sql, "Counting issues");

        let rows = self
            .conn
            .query_all(Statement::from_string(backend, sql))
            .await?;

        rows.iter()
            .map(|row| -> Result<AggregateRow> {
                let values = dimensions
                    .iter()
                    .map(|d| {
                        // NULL groups are exported with an empty label value
                        row.try_get::<Option<String>>("", d.column())
                            .map(Option::unwrap_or_default)
                    })
                    .collect::<std::result::Result<Vec<_>, _>>()?;
                let count = row.try_get::<i64>("", "count")?;
                Ok(AggregateRow::new(values, count))
            })
            .collect()
    }

    fn pool_snapshot(&self) -> Result<PoolSnapshot> {
        match self.conn {
            DatabaseConnection::SqlxPostgresPoolConnection(_) => {
                let pool = self.conn.get_postgres_connection_pool();
                Ok(PoolSnapshot::from_pool_size(pool.size(), pool.num_idle()))
            }
            DatabaseConnection::SqlxSqlitePoolConnection(_) => {
                let pool = self.conn.get_sqlite_connection_pool();
                Ok(PoolSnapshot::from_pool_size(pool.size(), pool.num_idle()))
            }
            _ => Err(KiteError::store_unavailable(
                "connection does not expose pool statistics",
            )),
        }
    }
}

fn is_valid_table_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_name_validation() {
        assert!(is_valid_table_name("issues"));
        assert!(is_valid_table_name("tracker.issues"));
        assert!(is_valid_table_name("_issues_v2"));
        assert!(!is_valid_table_name(""));
        assert!(!is_valid_table_name("2issues"));
        assert!(!is_valid_table_name("issues; DROP TABLE issues"));
        assert!(!is_valid_table_name("tracker..issues"));
    }

    #[tokio::test]
    async fn test_grouped_count_sql() {
        let conn = Database::connect("sqlite::memory:").await.unwrap();
        let store = SeaOrmIssueStore::new(conn);
        assert_eq!(
            store.grouped_count_sql(&[IssueDimension::Namespace, IssueDimension::Type]),
            "SELECT namespace, issue_type, COUNT(*) AS count FROM issues GROUP BY namespace, issue_type"
        );
        assert!(store.with_table("bad name").is_err());
    }
}
