use serde::{Deserialize, Serialize};
use tracing::instrument;

use quad_core::ids::CollegeId;

use crate::database::Database;
use crate::error::StoreError;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CollegeRow {
    pub college_id: CollegeId,
    pub college_name: String,
}

pub struct CollegeRepo {
    db: Database,
}

impl CollegeRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a college and return it with its store-assigned id.
    /// Name presence/non-emptiness is the caller's concern.
    #[instrument(skip(self), fields(name))]
    pub fn create(&self, name: &str) -> Result<CollegeRow, StoreError> {
        self.db.with_conn(|conn| {
            conn.execute("INSERT INTO colleges (college_name) VALUES (?1)", [name])?;
            Ok(CollegeRow {
                college_id: CollegeId::from_raw(conn.last_insert_rowid()),
                college_name: name.to_string(),
            })
        })
    }
}
