use serde::Serialize;
use tracing::instrument;

use quad_core::ids::{EventId, StudentId};

use crate::database::Database;
use crate::error::StoreError;
use crate::row_helpers::get;

#[derive(Clone, Debug, Serialize)]
pub struct PopularityRow {
    pub event_id: EventId,
    pub event_name: String,
    pub regs: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct ParticipationRow {
    pub student_id: StudentId,
    pub name: String,
    pub attended_events: i64,
}

#[derive(Clone, Debug, Serialize)]
pub struct AttendancePctRow {
    pub event_id: EventId,
    pub event_name: String,
    pub attendance_pct: f64,
}

#[derive(Clone, Debug, Serialize)]
pub struct AvgFeedbackRow {
    pub event_id: EventId,
    pub event_name: String,
    pub avg_feedback: f64,
}

/// Read-only aggregate queries over the live tables. No report caches or
/// materialized state; every call recomputes from the rows as they stand.
pub struct ReportsRepo {
    db: Database,
}

impl ReportsRepo {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Events ranked by registration count, most popular first.
    /// Events with no registrations appear with a count of zero.
    #[instrument(skip(self))]
    pub fn popularity(&self) -> Result<Vec<PopularityRow>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT e.event_id, e.event_name, COUNT(r.reg_id) AS regs \
                 FROM events e LEFT JOIN registrations r ON e.event_id = r.event_id \
                 GROUP BY e.event_id \
                 ORDER BY regs DESC",
            )?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                out.push(PopularityRow {
                    event_id: EventId::from_raw(get(row, 0, "events", "event_id")?),
                    event_name: get(row, 1, "events", "event_name")?,
                    regs: get(row, 2, "registrations", "regs")?,
                });
            }
            Ok(out)
        })
    }

    /// Students ranked by how many events they attended. Students with no
    /// attended registrations are left out entirely.
    #[instrument(skip(self))]
    pub fn participation(&self) -> Result<Vec<ParticipationRow>, StoreError> {
        self.db
            .with_conn(|conn| participation_query(conn, None))
    }

    /// The three most active students by attendance.
    #[instrument(skip(self))]
    pub fn top_students(&self) -> Result<Vec<ParticipationRow>, StoreError> {
        self.db
            .with_conn(|conn| participation_query(conn, Some(3)))
    }

    /// Share of registrations marked attended, per event, as a percentage.
    /// Events with no registrations are absent rather than reported as zero.
    #[instrument(skip(self))]
    pub fn attendance_percentage(&self) -> Result<Vec<AttendancePctRow>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT e.event_id, e.event_name, \
                        SUM(CASE WHEN r.status = 'attended' THEN 1 ELSE 0 END) * 1.0 \
                            / COUNT(r.reg_id) * 100.0 AS attendance_pct \
                 FROM events e JOIN registrations r ON e.event_id = r.event_id \
                 GROUP BY e.event_id",
            )?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                out.push(AttendancePctRow {
                    event_id: EventId::from_raw(get(row, 0, "events", "event_id")?),
                    event_name: get(row, 1, "events", "event_name")?,
                    attendance_pct: get(row, 2, "registrations", "attendance_pct")?,
                });
            }
            Ok(out)
        })
    }

    /// Mean feedback score per event, over registrations that have a score.
    /// Events with no feedback at all are absent.
    #[instrument(skip(self))]
    pub fn avg_feedback(&self) -> Result<Vec<AvgFeedbackRow>, StoreError> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT e.event_id, e.event_name, AVG(r.feedback) AS avg_feedback \
                 FROM events e JOIN registrations r ON e.event_id = r.event_id \
                 WHERE r.feedback IS NOT NULL \
                 GROUP BY e.event_id",
            )?;
            let mut rows = stmt.query([])?;
            let mut out = Vec::new();
            while let Some(row) = rows.next()? {
                out.push(AvgFeedbackRow {
                    event_id: EventId::from_raw(get(row, 0, "events", "event_id")?),
                    event_name: get(row, 1, "events", "event_name")?,
                    avg_feedback: get(row, 2, "registrations", "avg_feedback")?,
                });
            }
            Ok(out)
        })
    }
}

fn participation_query(
    conn: &rusqlite::Connection,
    limit: Option<i64>,
) -> Result<Vec<ParticipationRow>, StoreError> {
    let mut sql = String::from(
        "SELECT s.student_id, s.name, COUNT(r.reg_id) AS attended_events \
         FROM students s JOIN registrations r ON s.student_id = r.student_id \
         WHERE r.status = 'attended' \
         GROUP BY s.student_id \
         ORDER BY attended_events DESC",
    );
    if let Some(n) = limit {
        sql.push_str(&format!(" LIMIT {n}"));
    }
    let mut stmt = conn.prepare(&sql)?;
    let mut rows = stmt.query([])?;
    let mut out = Vec::new();
    while let Some(row) = rows.next()? {
        out.push(ParticipationRow {
            student_id: StudentId::from_raw(get(row, 0, "students", "student_id")?),
            name: get(row, 1, "students", "name")?,
            attended_events: get(row, 2, "registrations", "attended_events")?,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventRepo;
    use crate::registrations::RegistrationRepo;
    use crate::students::StudentRepo;

    struct Fixture {
        students: StudentRepo,
        events: EventRepo,
        regs: RegistrationRepo,
        reports: ReportsRepo,
    }

    fn fixture() -> Fixture {
        let db = Database::in_memory().unwrap();
        Fixture {
            students: StudentRepo::new(db.clone()),
            events: EventRepo::new(db.clone()),
            regs: RegistrationRepo::new(db.clone()),
            reports: ReportsRepo::new(db),
        }
    }

    impl Fixture {
        fn student(&self, name: &str) -> StudentId {
            self.students.create(Some(name), None, None).unwrap()
        }

        fn event(&self, name: &str) -> EventId {
            self.events.create(Some(name), None, None, None).unwrap()
        }

        fn attend(&self, student: StudentId, event: EventId) {
            let reg = self.regs.register(student, event).unwrap().reg_id();
            self.regs.mark_attended(reg).unwrap();
        }
    }

    #[test]
    fn popularity_ranks_by_registrations_and_keeps_empty_events() {
        let fx = fixture();
        let hack = fx.event("Hackathon");
        let mixer = fx.event("Mixer");
        let ghost = fx.event("Ghost Town");

        let (ann, bob) = (fx.student("Ann"), fx.student("Bob"));
        fx.regs.register(ann, hack).unwrap();
        fx.regs.register(bob, hack).unwrap();
        fx.regs.register(ann, mixer).unwrap();

        let report = fx.reports.popularity().unwrap();
        assert_eq!(report.len(), 3);
        assert_eq!(report[0].event_id, hack);
        assert_eq!(report[0].regs, 2);
        assert_eq!(report[1].event_id, mixer);
        assert_eq!(report[1].regs, 1);
        assert_eq!(report[2].event_id, ghost);
        assert_eq!(report[2].event_name, "Ghost Town");
        assert_eq!(report[2].regs, 0);
    }

    #[test]
    fn participation_counts_only_attended() {
        let fx = fixture();
        let (hack, mixer, talk) = (fx.event("Hack"), fx.event("Mixer"), fx.event("Talk"));
        let ann = fx.student("Ann");
        let bob = fx.student("Bob");

        fx.attend(ann, hack);
        fx.attend(ann, mixer);
        // Registered but never attended, so it must not count
        fx.regs.register(ann, talk).unwrap();
        fx.regs.register(bob, hack).unwrap();

        let report = fx.reports.participation().unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].student_id, ann);
        assert_eq!(report[0].name, "Ann");
        assert_eq!(report[0].attended_events, 2);
    }

    #[test]
    fn top_students_is_capped_at_three() {
        let fx = fixture();
        let events: Vec<EventId> = (0..4).map(|i| fx.event(&format!("E{i}"))).collect();
        let names = ["Ann", "Bob", "Cid", "Dot"];
        for (i, name) in names.iter().enumerate() {
            let student = fx.student(name);
            // Ann attends 4 events, Bob 3, Cid 2, Dot 1
            for event in events.iter().take(4 - i) {
                fx.attend(student, *event);
            }
        }

        let report = fx.reports.top_students().unwrap();
        assert_eq!(report.len(), 3);
        assert_eq!(report[0].name, "Ann");
        assert_eq!(report[0].attended_events, 4);
        assert_eq!(report[1].name, "Bob");
        assert_eq!(report[2].name, "Cid");
    }

    #[test]
    fn attendance_percentage_is_attended_over_registered() {
        let fx = fixture();
        let hack = fx.event("Hack");
        let ghost = fx.event("Ghost Town");
        let (ann, bob) = (fx.student("Ann"), fx.student("Bob"));

        fx.attend(ann, hack);
        fx.regs.register(bob, hack).unwrap();

        let report = fx.reports.attendance_percentage().unwrap();
        // One of two registrations attended; the event with no registrations
        // does not appear at all
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].event_id, hack);
        assert_eq!(report[0].attendance_pct, 50.0);
        assert!(report.iter().all(|r| r.event_id != ghost));
    }

    #[test]
    fn avg_feedback_averages_scored_registrations_only() {
        let fx = fixture();
        let hack = fx.event("Hack");
        let mixer = fx.event("Mixer");
        let (ann, bob, cid) = (fx.student("Ann"), fx.student("Bob"), fx.student("Cid"));

        let r1 = fx.regs.register(ann, hack).unwrap().reg_id();
        let r2 = fx.regs.register(bob, hack).unwrap().reg_id();
        // Registered without feedback; must not drag the average down
        fx.regs.register(cid, hack).unwrap();
        fx.regs.register(ann, mixer).unwrap();

        fx.regs.set_feedback(r1, 4).unwrap();
        fx.regs.set_feedback(r2, 5).unwrap();

        let report = fx.reports.avg_feedback().unwrap();
        assert_eq!(report.len(), 1);
        assert_eq!(report[0].event_id, hack);
        assert_eq!(report[0].avg_feedback, 4.5);
        assert!(report.iter().all(|r| r.event_id != mixer));
    }
}
