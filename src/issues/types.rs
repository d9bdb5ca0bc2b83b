use serde::{Deserialize, Serialize};
use std::fmt;

/// A column issues can be grouped and counted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueDimension {
    Namespace,
    Severity,
    State,
    Type,
}

impl IssueDimension {
    /// Column name in the `issues` table
    pub fn column(&self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::Severity => "severity",
            Self::State => "state",
            Self::Type => "issue_type",
        }
    }

    /// Label name used on exported metrics
    pub fn label(&self) -> &'static str {
        match self {
            Self::Namespace => "namespace",
            Self::Severity => "severity",
            Self::State => "state",
            Self::Type => "type",
        }
    }
}

impl fmt::Display for IssueDimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of a grouped count: the group's dimension values and its size.
///
/// `dimensions` is ordered like the dimension list passed to the query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRow {
    pub dimensions: Vec<String>,
    pub count: i64,
}

impl AggregateRow {
    pub fn new(dimensions: Vec<String>, count: i64) -> Self {
        Self { dimensions, count }
    }
}

/// Connection pool occupancy at one instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PoolSnapshot {
    pub in_use: u32,
    pub idle: u32,
}

impl PoolSnapshot {
    pub fn new(in_use: u32, idle: u32) -> Self {
        Self { in_use, idle }
    }

    /// Build from a pool's total size and idle count
    pub fn from_pool_size(size: u32, idle: usize) -> Self {
        let idle = u32::try_from(idle).unwrap_or(u32::MAX);
        Self {
            in_use: size.saturating_sub(idle),
            idle,
        }
    }
}

/// The fields of an issue that metrics are derived from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub id: String,
    pub namespace: String,
    pub severity: String,
    pub state: String,
    pub issue_type: String,
}

impl IssueRecord {
    pub fn new(
        id: impl Into<String>,
        namespace: impl Into<String>,
        severity: impl Into<String>,
        state: impl Into<String>,
        issue_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            namespace: namespace.into(),
            severity: severity.into(),
            state: state.into(),
            issue_type: issue_type.into(),
        }
    }

    /// Value of one dimension
    pub fn dimension(&self, dimension: IssueDimension) -> &str {
        match dimension {
            IssueDimension::Namespace => &self.namespace,
            IssueDimension::Severity => &self.severity,
            IssueDimension::State => &self.state,
            IssueDimension::Type => &self.issue_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_dimension_maps_to_issue_type_column() {
        assert_eq!(IssueDimension::Type.column(), "issue_type");
        assert_eq!(IssueDimension::Type.label(), "type");
    }

    #[test]
    fn test_pool_snapshot_from_pool_size() {
        assert_eq!(PoolSnapshot::from_pool_size(5, 2), PoolSnapshot::new(3, 2));
        // Idle can briefly exceed size while connections are being returned
        assert_eq!(PoolSnapshot::from_pool_size(1, 2), PoolSnapshot::new(0, 2));
    }
}
