//! Database testing utilities
//!
//! A SQLite in-memory database with the issues schema, for exercising
//! [`SeaOrmIssueStore`] without a running PostgreSQL.
//!
//! # Example
//!
//! ```rust,ignore
//! use kite_exporter::testing::TestDb;
//!
//! #[tokio::test]
//! async fn test_with_database() {
//!     let db = TestDb::new().await.expect("Failed to create test database");
//!     db.insert_issue(&IssueRecord::new("1", "team-alpha", "major", "active", "build"))
//!         .await
//!         .unwrap();
//!     let store = db.store();
//! }
//! ```

use crate::database::SeaOrmIssueStore;
use crate::issues::IssueRecord;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, Statement};

const CREATE_ISSUES_TABLE: &str = "CREATE TABLE issues (
    id TEXT PRIMARY KEY NOT NULL,
    namespace TEXT NOT NULL,
    severity TEXT NOT NULL,
    state TEXT NOT NULL,
    issue_type TEXT NOT NULL
)";

/// Manages a test database connection
pub struct TestDb {
    pub connection: DatabaseConnection,
}

impl TestDb {
    /// Create an in-memory SQLite database with an empty `issues` table.
    ///
    /// The pool holds a single connection: every SQLite `:memory:`
    /// connection opens its own private database.
    pub async fn new() -> Result<Self, DbErr> {
        let db = Self::empty().await?;
        db.connection.execute_unprepared(CREATE_ISSUES_TABLE).await?;
        Ok(db)
    }

    /// Create an in-memory SQLite database without any tables
    pub async fn empty() -> Result<Self, DbErr> {
        let mut opt = ConnectOptions::new("sqlite::memory:");
        opt.max_connections(1).min_connections(1).sqlx_logging(false);
        let connection = Database::connect(opt).await?;
        Ok(Self { connection })
    }

    /// Get a clone of the database connection
    pub fn connection(&self) -> DatabaseConnection {
        self.connection.clone()
    }

    /// Issue store reading this database
    pub fn store(&self) -> SeaOrmIssueStore {
        SeaOrmIssueStore::new(self.connection())
    }

    pub async fn insert_issue(&self, issue: &IssueRecord) -> Result<(), DbErr> {
        self.connection
            .execute(Statement::from_sql_and_values(
                self.connection.get_database_backend(),
                "INSERT INTO issues (id, namespace, severity, state, issue_type) VALUES (?, ?, ?, ?, ?)",
                [
                    issue.id.clone().into(),
                    issue.namespace.clone().into(),
                    issue.severity.clone().into(),
                    issue.state.clone().into(),
                    issue.issue_type.clone().into(),
                ],
            ))
            .await?;
        Ok(())
    }

    /// Execute raw SQL statements, e.g. to update or delete fixture rows
    pub async fn seed(&self, statements: &[&str]) -> Result<(), DbErr> {
        for statement in statements {
            self.connection.execute_unprepared(statement).await?;
        }
        Ok(())
    }

    /// Drop the issues table so that every grouped query fails
    pub async fn drop_issues_table(&self) -> Result<(), DbErr> {
        self.connection
            .execute_unprepared("DROP TABLE IF EXISTS issues")
            .await?;
        Ok(())
    }
}
