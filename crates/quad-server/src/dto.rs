//! Request and response bodies for the REST API.
//!
//! Field names here are the wire contract. Store row types double as
//! response bodies where they already match (colleges, reports); everything
//! else gets an explicit shape in this module.

use serde::{Deserialize, Serialize};

use quad_core::ids::{EventId, RegId, StudentId};
use quad_store::registrations::{BatchEntry, RegisterOutcome};
use quad_store::students::StudentRow;

// ── Requests ──

#[derive(Debug, Deserialize)]
pub struct CollegeRequest {
    pub college_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StudentRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub college_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct EventRequest {
    pub event_name: Option<String>,
    pub event_type: Option<String>,
    pub date: Option<String>,
    pub college_id: Option<i64>,
}

/// One register entry. Both ids are required; a body that does not parse
/// into this shape is a format error, not a lookup miss.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub student_id: i64,
    pub event_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct AttendanceRequest {
    pub student_id: Option<i64>,
    pub event_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct FeedbackRequest {
    pub student_id: Option<i64>,
    pub event_id: Option<i64>,
    /// Accepted as a JSON integer or a numeric string, so it stays a raw
    /// value until the handler has decided the registration exists.
    pub feedback: Option<serde_json::Value>,
}

// ── Responses ──

#[derive(Debug, Serialize)]
pub struct Msg {
    pub msg: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StudentCreated {
    pub student_id: StudentId,
    pub name: Option<String>,
}

/// List entry for GET /students. The id key is `id` here, unlike the
/// `student_id` used everywhere else.
#[derive(Debug, Serialize)]
pub struct StudentSummary {
    pub id: StudentId,
    pub name: String,
    pub email: Option<String>,
}

impl From<StudentRow> for StudentSummary {
    fn from(row: StudentRow) -> Self {
        Self {
            id: row.student_id,
            name: row.name,
            email: row.email,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct EventCreated {
    pub event_id: EventId,
    pub event_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub msg: &'static str,
    pub reg_id: RegId,
}

/// Per-entry batch result. Only fresh registrations carry a `reg_id`;
/// entries that were already present report just their status.
#[derive(Debug, Serialize)]
pub struct BatchRegisterEntry {
    pub student_id: StudentId,
    pub event_id: EventId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reg_id: Option<RegId>,
    pub status: &'static str,
}

impl From<BatchEntry> for BatchRegisterEntry {
    fn from(entry: BatchEntry) -> Self {
        let (reg_id, status) = match entry.outcome {
            RegisterOutcome::Created(reg_id) => (Some(reg_id), "ok"),
            RegisterOutcome::AlreadyRegistered(_) => (None, "already"),
        };
        Self {
            student_id: entry.student_id,
            event_id: entry.event_id,
            reg_id,
            status,
        }
    }
}
