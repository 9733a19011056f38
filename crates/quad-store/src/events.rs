use rusqlite::params;
use tracing::instrument;

use quad_core::ids::{CollegeId, EventId};

use crate::database::Database;
use crate::error::StoreError;

pub struct EventRepo {
    db: Database,
}

impl EventRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert an event. A missing name trips the NOT NULL constraint and
    /// surfaces as [`StoreError::Conflict`]; type, date and college are
    /// stored as given, NULL when absent.
    #[instrument(skip(self), fields(name, event_type))]
    pub fn create(
        &self,
        name: Option<&str>,
        event_type: Option<&str>,
        date: Option<&str>,
        college_id: Option<CollegeId>,
    ) -> Result<EventId, StoreError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO events (event_name, event_type, date, college_id) \
                 VALUES (?1, ?2, ?3, ?4)",
                params![name, event_type, date, college_id.map(|c| c.as_i64())],
            )?;
            Ok(EventId::from_raw(conn.last_insert_rowid()))
        })
    }
}
