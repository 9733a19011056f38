//! HTTP handlers, one per route. Each pulls a repo off the shared state,
//! shapes the result into the wire types from [`crate::dto`], and leaves
//! error mapping to [`ApiError`].

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use quad_core::ids::{CollegeId, EventId, StudentId};
use quad_store::colleges::{CollegeRepo, CollegeRow};
use quad_store::events::EventRepo;
use quad_store::registrations::{RegisterOutcome, RegistrationRepo};
use quad_store::reports::{
    AttendancePctRow, AvgFeedbackRow, ParticipationRow, PopularityRow, ReportsRepo,
};
use quad_store::students::StudentRepo;

use crate::dto::{
    AttendanceRequest, BatchRegisterEntry, CollegeRequest, EventCreated, EventRequest,
    FeedbackRequest, Msg, RegisterRequest, RegisterResponse, StudentCreated, StudentRequest,
    StudentSummary,
};
use crate::error::ApiError;
use crate::server::AppState;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, ApiError>;

// ── Root ──

/// GET /
pub async fn home() -> Json<Msg> {
    Json(Msg {
        msg: "Campus Event System is running",
    })
}

// ── Entity handlers ──

/// POST /colleges
pub async fn add_college(
    State(state): State<AppState>,
    Json(req): Json<CollegeRequest>,
) -> Result<(StatusCode, Json<CollegeRow>), ApiError> {
    let Some(name) = req.college_name.as_deref().filter(|n| !n.is_empty()) else {
        return Err(ApiError::Validation("college_name required".into()));
    };
    let college = CollegeRepo::new(state.db.clone()).create(name)?;
    Ok((StatusCode::CREATED, Json(college)))
}

/// POST /students
pub async fn add_student(
    State(state): State<AppState>,
    Json(req): Json<StudentRequest>,
) -> Result<(StatusCode, Json<StudentCreated>), ApiError> {
    let student_id = StudentRepo::new(state.db.clone()).create(
        req.name.as_deref(),
        req.email.as_deref(),
        req.college_id.map(CollegeId::from_raw),
    )?;
    Ok((
        StatusCode::CREATED,
        Json(StudentCreated {
            student_id,
            name: req.name,
        }),
    ))
}

/// GET /students
pub async fn list_students(State(state): State<AppState>) -> HandlerResult<Vec<StudentSummary>> {
    let students = StudentRepo::new(state.db.clone()).list()?;
    Ok(Json(students.into_iter().map(Into::into).collect()))
}

/// POST /events
pub async fn add_event(
    State(state): State<AppState>,
    Json(req): Json<EventRequest>,
) -> Result<(StatusCode, Json<EventCreated>), ApiError> {
    let event_id = EventRepo::new(state.db.clone()).create(
        req.event_name.as_deref(),
        req.event_type.as_deref(),
        req.date.as_deref(),
        req.college_id.map(CollegeId::from_raw),
    )?;
    Ok((
        StatusCode::CREATED,
        Json(EventCreated {
            event_id,
            event_name: req.event_name,
        }),
    ))
}

// ── Registration handlers ──

/// POST /register
///
/// Takes either a single `{student_id, event_id}` object or an array of
/// them. A single object answers 201 on a fresh registration and 200 when
/// the pair already exists; an array runs as one transaction and answers
/// 201 with per-entry results. Anything else is a format error.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = body.map_err(|_| ApiError::Format)?;
    let repo = RegistrationRepo::new(state.db.clone());

    match body {
        serde_json::Value::Object(_) => {
            let req: RegisterRequest =
                serde_json::from_value(body).map_err(|_| ApiError::Format)?;
            let outcome = repo.register(
                StudentId::from_raw(req.student_id),
                EventId::from_raw(req.event_id),
            )?;
            let resp = match outcome {
                RegisterOutcome::Created(reg_id) => (
                    StatusCode::CREATED,
                    Json(RegisterResponse {
                        msg: "registered",
                        reg_id,
                    }),
                ),
                RegisterOutcome::AlreadyRegistered(reg_id) => (
                    StatusCode::OK,
                    Json(RegisterResponse {
                        msg: "already registered",
                        reg_id,
                    }),
                ),
            };
            Ok(resp.into_response())
        }
        serde_json::Value::Array(_) => {
            let reqs: Vec<RegisterRequest> =
                serde_json::from_value(body).map_err(|_| ApiError::Format)?;
            let pairs: Vec<(StudentId, EventId)> = reqs
                .iter()
                .map(|r| {
                    (
                        StudentId::from_raw(r.student_id),
                        EventId::from_raw(r.event_id),
                    )
                })
                .collect();
            let entries = repo.register_batch(&pairs)?;
            let out: Vec<BatchRegisterEntry> = entries.into_iter().map(Into::into).collect();
            Ok((StatusCode::CREATED, Json(out)).into_response())
        }
        _ => Err(ApiError::Format),
    }
}

/// POST /attendance
pub async fn mark_attendance(
    State(state): State<AppState>,
    Json(req): Json<AttendanceRequest>,
) -> HandlerResult<Msg> {
    let (Some(student_id), Some(event_id)) = (req.student_id, req.event_id) else {
        return Err(ApiError::NotFound("not registered".into()));
    };
    let repo = RegistrationRepo::new(state.db.clone());
    let Some(reg) =
        repo.find_by_pair(StudentId::from_raw(student_id), EventId::from_raw(event_id))?
    else {
        return Err(ApiError::NotFound("not registered".into()));
    };
    repo.mark_attended(reg.reg_id)?;
    Ok(Json(Msg {
        msg: "attendance marked",
    }))
}

/// POST /feedback
///
/// The registration lookup runs before the score is even parsed, so an
/// unknown pair answers 404 no matter what the score value looks like.
pub async fn submit_feedback(
    State(state): State<AppState>,
    Json(req): Json<FeedbackRequest>,
) -> HandlerResult<Msg> {
    let (Some(student_id), Some(event_id)) = (req.student_id, req.event_id) else {
        return Err(ApiError::NotFound("not registered".into()));
    };
    let repo = RegistrationRepo::new(state.db.clone());
    let Some(reg) =
        repo.find_by_pair(StudentId::from_raw(student_id), EventId::from_raw(event_id))?
    else {
        return Err(ApiError::NotFound("not registered".into()));
    };

    let score = parse_score(req.feedback.as_ref())?;
    if !(1..=5).contains(&score) {
        return Err(ApiError::Validation("feedback 1-5 only".into()));
    }
    repo.set_feedback(reg.reg_id, score)?;
    Ok(Json(Msg {
        msg: "feedback saved",
    }))
}

/// Coerce a feedback value to an integer. JSON integers pass through,
/// strings must parse as one; everything else is rejected.
fn parse_score(value: Option<&serde_json::Value>) -> Result<i64, ApiError> {
    let parsed = match value {
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| ApiError::Validation("feedback must be an integer".into()))
}

// ── Report handlers ──

/// GET /reports/popularity
pub async fn report_popularity(
    State(state): State<AppState>,
) -> HandlerResult<Vec<PopularityRow>> {
    Ok(Json(ReportsRepo::new(state.db.clone()).popularity()?))
}

/// GET /reports/participation
pub async fn report_participation(
    State(state): State<AppState>,
) -> HandlerResult<Vec<ParticipationRow>> {
    Ok(Json(ReportsRepo::new(state.db.clone()).participation()?))
}

/// GET /reports/top-students
pub async fn report_top_students(
    State(state): State<AppState>,
) -> HandlerResult<Vec<ParticipationRow>> {
    Ok(Json(ReportsRepo::new(state.db.clone()).top_students()?))
}

/// GET /reports/attendance-percentage
pub async fn report_attendance_percentage(
    State(state): State<AppState>,
) -> HandlerResult<Vec<AttendancePctRow>> {
    Ok(Json(
        ReportsRepo::new(state.db.clone()).attendance_percentage()?,
    ))
}

/// GET /reports/avg-feedback
pub async fn report_avg_feedback(
    State(state): State<AppState>,
) -> HandlerResult<Vec<AvgFeedbackRow>> {
    Ok(Json(ReportsRepo::new(state.db.clone()).avg_feedback()?))
}
