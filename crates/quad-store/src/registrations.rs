use std::fmt;
use std::str::FromStr;

use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use quad_core::ids::{EventId, RegId, StudentId};

use crate::database::Database;
use crate::error::StoreError;
use crate::row_helpers::{get, get_opt, parse_enum};

/// Lifecycle of a registration. Transitions only move forward:
/// `Registered` -> `Attended`, never back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegStatus {
    Registered,
    Attended,
}

impl fmt::Display for RegStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegStatus::Registered => write!(f, "registered"),
            RegStatus::Attended => write!(f, "attended"),
        }
    }
}

impl FromStr for RegStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registered" => Ok(RegStatus::Registered),
            "attended" => Ok(RegStatus::Attended),
            other => Err(format!("unknown registration status: {other}")),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RegistrationRow {
    pub reg_id: RegId,
    pub student_id: StudentId,
    pub event_id: EventId,
    pub status: RegStatus,
    pub feedback: Option<i64>,
}

/// Result of one register attempt. The store either minted a new row or
/// found the pair already present; repeat attempts never duplicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RegisterOutcome {
    Created(RegId),
    AlreadyRegistered(RegId),
}

impl RegisterOutcome {
    pub fn reg_id(&self) -> RegId {
        match self {
            RegisterOutcome::Created(id) | RegisterOutcome::AlreadyRegistered(id) => *id,
        }
    }
}

/// Per-entry result of a batch register.
#[derive(Clone, Copy, Debug)]
pub struct BatchEntry {
    pub student_id: StudentId,
    pub event_id: EventId,
    pub outcome: RegisterOutcome,
}

pub struct RegistrationRepo {
    db: Database,
}

impl RegistrationRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Register a student for an event. Looks the pair up first and returns
    /// the existing row's id when found. The lookup and insert run under one
    /// connection lock, so concurrent requests through this handle cannot
    /// double-insert; a second process writing the same file still could.
    #[instrument(skip(self), fields(student_id = %student_id, event_id = %event_id))]
    pub fn register(
        &self,
        student_id: StudentId,
        event_id: EventId,
    ) -> Result<RegisterOutcome, StoreError> {
        self.db
            .with_conn(|conn| register_one(conn, student_id, event_id))
    }

    /// Register many pairs in a single transaction. Each entry gets the same
    /// lookup-or-insert treatment as [`register`](Self::register); an insert
    /// earlier in the batch is visible to later entries. Any error rolls the
    /// whole batch back.
    #[instrument(skip_all, fields(entries = entries.len()))]
    pub fn register_batch(
        &self,
        entries: &[(StudentId, EventId)],
    ) -> Result<Vec<BatchEntry>, StoreError> {
        self.db.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let mut results = Vec::with_capacity(entries.len());
            for &(student_id, event_id) in entries {
                let outcome = register_one(&tx, student_id, event_id)?;
                results.push(BatchEntry {
                    student_id,
                    event_id,
                    outcome,
                });
            }
            tx.commit()?;
            Ok(results)
        })
    }

    /// Look up the registration for a (student, event) pair, if any.
    #[instrument(skip(self), fields(student_id = %student_id, event_id = %event_id))]
    pub fn find_by_pair(
        &self,
        student_id: StudentId,
        event_id: EventId,
    ) -> Result<Option<RegistrationRow>, StoreError> {
        self.db
            .with_conn(|conn| find_pair(conn, student_id, event_id))
    }

    /// Move a registration to `attended`. Idempotent.
    #[instrument(skip(self), fields(reg_id = %reg_id))]
    pub fn mark_attended(&self, reg_id: RegId) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "UPDATE registrations SET status = 'attended' WHERE reg_id = ?1",
                [reg_id.as_i64()],
            )?;
            Ok(())
        })
    }

    /// Store a feedback score. Overwrites any previous score; range checks
    /// belong to the caller.
    #[instrument(skip(self), fields(reg_id = %reg_id, score))]
    pub fn set_feedback(&self, reg_id: RegId, score: i64) -> Result<(), StoreError> {
        self.db.with_conn(|conn| {
            conn.execute(
                "UPDATE registrations SET feedback = ?1 WHERE reg_id = ?2",
                params![score, reg_id.as_i64()],
            )?;
            Ok(())
        })
    }
}

fn register_one(
    conn: &Connection,
    student_id: StudentId,
    event_id: EventId,
) -> Result<RegisterOutcome, StoreError> {
    if let Some(existing) = find_pair(conn, student_id, event_id)? {
        return Ok(RegisterOutcome::AlreadyRegistered(existing.reg_id));
    }
    conn.execute(
        "INSERT INTO registrations (student_id, event_id, status) \
         VALUES (?1, ?2, 'registered')",
        params![student_id.as_i64(), event_id.as_i64()],
    )?;
    Ok(RegisterOutcome::Created(RegId::from_raw(
        conn.last_insert_rowid(),
    )))
}

fn find_pair(
    conn: &Connection,
    student_id: StudentId,
    event_id: EventId,
) -> Result<Option<RegistrationRow>, StoreError> {
    let mut stmt = conn.prepare(
        "SELECT reg_id, student_id, event_id, status, feedback \
         FROM registrations WHERE student_id = ?1 AND event_id = ?2",
    )?;
    let mut rows = stmt.query(params![student_id.as_i64(), event_id.as_i64()])?;
    match rows.next()? {
        Some(row) => Ok(Some(row_to_registration(row)?)),
        None => Ok(None),
    }
}

fn row_to_registration(row: &rusqlite::Row<'_>) -> Result<RegistrationRow, StoreError> {
    let status: String = get(row, 3, "registrations", "status")?;
    Ok(RegistrationRow {
        reg_id: RegId::from_raw(get(row, 0, "registrations", "reg_id")?),
        student_id: StudentId::from_raw(get(row, 1, "registrations", "student_id")?),
        event_id: EventId::from_raw(get(row, 2, "registrations", "event_id")?),
        status: parse_enum(&status, "registrations", "status")?,
        feedback: get_opt(row, 4, "registrations", "feedback")?,
    })
}
