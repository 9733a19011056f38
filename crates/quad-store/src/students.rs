use rusqlite::params;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quad_core::ids::{CollegeId, StudentId};

use crate::database::Database;
use crate::error::StoreError;
use crate::row_helpers::{get, get_opt};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StudentRow {
    pub student_id: StudentId,
    pub name: String,
    pub email: Option<String>,
    pub college_id: Option<CollegeId>,
}

pub struct StudentRepo {
    db: Database,
}

impl StudentRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Insert a student. Absent fields are stored as NULL; a missing name or a
    /// reused email surfaces as [`StoreError::Conflict`] from the constraint.
    #[instrument(skip(self), fields(name, email))]
    pub fn create(
        &self,
        name: Option<&str>,
        email: Option<&str>,
        college_id: Option<CollegeId>,
    ) -> Result<StudentId, StoreError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "INSERT INTO students (name, email, college_id) VALUES (?1, ?2, ?3)",
                params![name, email, college_id.map(|c| c.as_i64())],
            )?;
            Ok(StudentId::from_raw(conn.last_insert_rowid()))
        })
    }

    /// All students in insertion order.
    #[instrument(skip(self))]
    pub fn list(&self) -> Result<Vec<StudentRow>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT student_id, name, email, college_id FROM students")?;
            let mut rows = stmt.query([])?;
            let mut students = Vec::new();
            while let Some(row) = rows.next()? {
                students.push(row_to_student(row)?);
            }
            Ok(students)
        })
    }
}

fn row_to_student(row: &rusqlite::Row<'_>) -> Result<StudentRow, StoreError> {
    Ok(StudentRow {
        student_id: StudentId::from_raw(get(row, 0, "students", "student_id")?),
        name: get(row, 1, "students", "name")?,
        email: get_opt(row, 2, "students", "email")?,
        college_id: get_opt::<i64>(row, 3, "students", "college_id")?.map(CollegeId::from_raw),
    })
}
