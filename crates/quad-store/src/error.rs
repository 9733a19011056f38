#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("corrupt row in {table}.{column}: {detail}")]
    CorruptRow {
        table: &'static str,
        column: &'static str,
        detail: String,
    },

    #[error("IO error: {0}")]
    Io(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        match &e {
            // Constraint failures (UNIQUE, NOT NULL, CHECK) are client
            // errors, not server faults. The message keeps SQLite's own
            // wording, e.g. "UNIQUE constraint failed: students.email".
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::Conflict(e.to_string())
            }
            _ => StoreError::Database(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_violation_maps_to_conflict() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (v TEXT UNIQUE);").unwrap();
        conn.execute("INSERT INTO t (v) VALUES ('x')", []).unwrap();
        let err: StoreError = conn
            .execute("INSERT INTO t (v) VALUES ('x')", [])
            .unwrap_err()
            .into();
        match err {
            StoreError::Conflict(msg) => assert!(msg.contains("UNIQUE"), "got: {msg}"),
            other => panic!("expected Conflict, got {other:?}"),
        }
    }

    #[test]
    fn other_errors_map_to_database() {
        let conn = rusqlite::Connection::open_in_memory().unwrap();
        let err: StoreError = conn
            .execute("INSERT INTO missing (v) VALUES (1)", [])
            .unwrap_err()
            .into();
        assert!(matches!(err, StoreError::Database(_)));
    }
}
