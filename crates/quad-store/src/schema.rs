/// SQL DDL for the campus event database.
///
/// Foreign key references are declared for documentation but stay
/// advisory: the `foreign_keys` pragma is never enabled, referent
/// existence is never checked before insert, and nothing is ever
/// deleted. The schema is created once at open and never migrated.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS colleges (
    college_id INTEGER PRIMARY KEY,
    college_name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS students (
    student_id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    email TEXT UNIQUE,
    college_id INTEGER REFERENCES colleges(college_id)
);

CREATE TABLE IF NOT EXISTS events (
    event_id INTEGER PRIMARY KEY,
    event_name TEXT NOT NULL,
    event_type TEXT,
    date TEXT,
    college_id INTEGER REFERENCES colleges(college_id)
);

CREATE TABLE IF NOT EXISTS registrations (
    reg_id INTEGER PRIMARY KEY,
    student_id INTEGER REFERENCES students(student_id),
    event_id INTEGER REFERENCES events(event_id),
    status TEXT NOT NULL DEFAULT 'registered',
    feedback INTEGER
);

CREATE INDEX IF NOT EXISTS idx_registrations_pair ON registrations(student_id, event_id);
CREATE INDEX IF NOT EXISTS idx_registrations_event ON registrations(event_id);
"#;

pub const PRAGMAS: &str = r#"
PRAGMA journal_mode = WAL;
PRAGMA busy_timeout = 5000;
PRAGMA synchronous = NORMAL;
PRAGMA foreign_keys = OFF;
"#;
