//! JSON snapshot file as a [`RecordSource`].

use std::path::{Path, PathBuf};
use tracing::{debug, info};
use xpense_core::{
    AccountScope, Expense, LedgerSnapshot, RecordSource, Settlement, SourceError, SourceResult,
};

/// Records read from one JSON document.
///
/// The file is read once at open; every scope is answered from that copy, so
/// expenses and settlements always come from the same read.
#[derive(Debug, Clone)]
pub struct JsonSnapshotSource {
    origin: Option<PathBuf>,
    records: LedgerSnapshot,
}

impl JsonSnapshotSource {
    /// Reads and decodes a snapshot file.
    pub fn open(path: &Path) -> SourceResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SourceError::Unavailable(format!("{}: {}", path.display(), e)))?;
        let mut source = Self::from_json(&contents)?;
        source.origin = Some(path.to_path_buf());
        info!(
            ?path,
            expenses = source.records.expenses.len(),
            settlements = source.records.settlements.len(),
            "Opened ledger snapshot"
        );
        Ok(source)
    }

    /// Decodes a snapshot document.
    pub fn from_json(json: &str) -> SourceResult<Self> {
        let records: LedgerSnapshot =
            serde_json::from_str(json).map_err(|e| SourceError::Malformed(e.to_string()))?;
        Ok(JsonSnapshotSource {
            origin: None,
            records,
        })
    }

    pub fn origin(&self) -> Option<&Path> {
        self.origin.as_deref()
    }
}

impl RecordSource for JsonSnapshotSource {
    fn list_expenses(&self, scope: &AccountScope) -> SourceResult<Vec<Expense>> {
        let expenses: Vec<Expense> = self
            .records
            .expenses
            .iter()
            .filter(|e| e.involves(&scope.user_id))
            .cloned()
            .collect();
        debug!(user_id = %scope.user_id, count = expenses.len(), "Listed expenses");
        Ok(expenses)
    }

    fn list_settlements(&self, scope: &AccountScope) -> SourceResult<Vec<Settlement>> {
        Ok(self
            .records
            .settlements
            .iter()
            .filter(|s| s.involves(&scope.user_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SNAPSHOT: &str = r#"{
        "expenses": [
            {
                "id": "e1",
                "description": "Dinner",
                "amount": 90000,
                "payerId": "u1",
                "participantIds": ["u1", "u2", "u3"],
                "date": "2024-03-01T19:30:00Z"
            },
            {
                "id": "e2",
                "description": "Movie",
                "amount": 60000,
                "payerId": "u4",
                "participantIds": ["u4", "u5"],
                "date": "2024-03-02T19:30:00Z"
            }
        ],
        "settlements": [
            {
                "id": "s1",
                "fromUserId": "u2",
                "toUserId": "u1",
                "amount": 30000,
                "date": "2024-03-03T09:00:00Z"
            }
        ]
    }"#;

    #[test]
    fn test_scoped_listing() {
        let source = JsonSnapshotSource::from_json(SNAPSHOT).unwrap();
        let snapshot = source.snapshot(&AccountScope::new("u2")).unwrap();
        assert_eq!(snapshot.expenses.len(), 1);
        assert_eq!(snapshot.settlements.len(), 1);

        let other = source.snapshot(&AccountScope::new("u5")).unwrap();
        assert_eq!(other.expenses[0].id, "e2");
        assert!(other.settlements.is_empty());
    }

    #[test]
    fn test_malformed_json() {
        let err = JsonSnapshotSource::from_json(r#"{"expenses": [{"id": 1}]}"#).unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let err = JsonSnapshotSource::open(Path::new("/nonexistent/xpense/ledger.json"))
            .unwrap_err();
        assert!(matches!(err, SourceError::Unavailable(_)));
    }
}
