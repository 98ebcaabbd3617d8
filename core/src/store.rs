//! SQLite roster snapshot.
//!
//! RULE: Only store.rs talks to the database. Scorers go through the
//! `RosterReader` trait; the insert helpers exist for tests and the
//! report-runner's demo seeder.

use crate::{
    error::{EngineError, EngineResult},
    model::{
        AssignmentStatus, AvailabilityKind, Person, ShiftSpec, WeeklyOvertime, WorkedShift,
    },
    reader::RosterReader,
    types::{DATETIME_FMT, DATE_FMT},
};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};

pub struct SqliteRoster {
    conn: Connection,
}

impl SqliteRoster {
    pub fn open(path: &str) -> EngineResult<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> EngineResult<Self> {
        let conn = Connection::open(":memory:")?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply the roster schema.
    pub fn migrate(&self) -> EngineResult<()> {
        self.conn
            .execute_batch(include_str!("../../migrations/001_roster.sql"))?;
        Ok(())
    }

    // ── Insert helpers (tests and seeding only) ────────────────────

    pub fn insert_person(
        &self,
        person_id: &str,
        name: &str,
        hire_date: NaiveDate,
        active: bool,
    ) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO personnel (person_id, name, hire_date, active)
             VALUES (?1, ?2, ?3, ?4)",
            params![person_id, name, fmt_date(hire_date), active as i32],
        )?;
        Ok(())
    }

    pub fn insert_shift(
        &self,
        shift_id: &str,
        start_at: NaiveDateTime,
        end_at: NaiveDateTime,
        is_critical: bool,
        required_skills: &[&str],
        required_certifications: &[&str],
    ) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO scheduled_shift
               (shift_id, start_at, end_at, is_critical, required_skills, required_certifications)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                shift_id,
                fmt_datetime(start_at),
                fmt_datetime(end_at),
                is_critical as i32,
                serde_json::to_string(required_skills)?,
                serde_json::to_string(required_certifications)?,
            ],
        )?;
        Ok(())
    }

    pub fn insert_assignment(
        &self,
        assignment_id: &str,
        person_id: &str,
        shift_id: &str,
        status: AssignmentStatus,
    ) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO shift_assignment (assignment_id, person_id, shift_id, status)
             VALUES (?1, ?2, ?3, ?4)",
            params![assignment_id, person_id, shift_id, status.as_str()],
        )?;
        Ok(())
    }

    pub fn insert_availability(
        &self,
        person_id: &str,
        day: NaiveDate,
        availability: AvailabilityKind,
    ) -> EngineResult<()> {
        let kind = match availability {
            AvailabilityKind::Preferred => "preferred",
            AvailabilityKind::Available => "available",
            AvailabilityKind::IfNeeded => "if_needed",
            AvailabilityKind::Unavailable => "unavailable",
        };
        self.conn.execute(
            "INSERT INTO crew_availability (person_id, day, availability)
             VALUES (?1, ?2, ?3)",
            params![person_id, fmt_date(day), kind],
        )?;
        Ok(())
    }

    pub fn insert_weekly_overtime(
        &self,
        person_id: &str,
        week_start: NaiveDate,
        regular_hours: f64,
        overtime_hours: f64,
    ) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO overtime_week (person_id, week_start, regular_hours, overtime_hours)
             VALUES (?1, ?2, ?3, ?4)",
            params![person_id, fmt_date(week_start), regular_hours, overtime_hours],
        )?;
        Ok(())
    }

    pub fn insert_skill_use(
        &self,
        person_id: &str,
        skill: &str,
        performed_on: NaiveDate,
    ) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO skill_usage (person_id, skill, performed_on)
             VALUES (?1, ?2, ?3)",
            params![person_id, skill, fmt_date(performed_on)],
        )?;
        Ok(())
    }

    pub fn insert_certification(
        &self,
        person_id: &str,
        certification: &str,
        valid_from: NaiveDate,
        valid_until: NaiveDate,
    ) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO certification (person_id, certification, valid_from, valid_until)
             VALUES (?1, ?2, ?3, ?4)",
            params![person_id, certification, fmt_date(valid_from), fmt_date(valid_until)],
        )?;
        Ok(())
    }

    pub fn insert_incident_exposure(
        &self,
        person_id: &str,
        incident_kind: &str,
        occurred_on: NaiveDate,
    ) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO incident_exposure (person_id, incident_kind, occurred_on)
             VALUES (?1, ?2, ?3)",
            params![person_id, incident_kind, fmt_date(occurred_on)],
        )?;
        Ok(())
    }

    pub fn insert_call_volume(&self, day: NaiveDate, call_count: u32) -> EngineResult<()> {
        self.conn.execute(
            "INSERT INTO call_volume (day, call_count) VALUES (?1, ?2)",
            params![fmt_date(day), call_count],
        )?;
        Ok(())
    }
}

// ── Row mapping ──────────────────────────────────────────────────────────────

fn fmt_date(d: NaiveDate) -> String {
    d.format(DATE_FMT).to_string()
}

fn fmt_datetime(dt: NaiveDateTime) -> String {
    dt.format(DATETIME_FMT).to_string()
}

fn parse_date(s: &str) -> EngineResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FMT).map_err(|_| EngineError::MalformedDate {
        value: s.to_string(),
    })
}

fn parse_datetime(s: &str) -> EngineResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, DATETIME_FMT).map_err(|_| EngineError::MalformedDate {
        value: s.to_string(),
    })
}

fn parse_status(s: &str) -> EngineResult<AssignmentStatus> {
    AssignmentStatus::from_str(s)
        .ok_or_else(|| EngineError::Config(format!("unknown assignment status '{s}'")))
}

/// Build the `status IN (...)` fragment for a status filter.
fn status_list(statuses: &[AssignmentStatus]) -> String {
    statuses
        .iter()
        .map(|s| format!("'{}'", s.as_str()))
        .collect::<Vec<_>>()
        .join(", ")
}

struct WorkedShiftRow {
    assignment_id: String,
    person_id: String,
    shift_id: String,
    status: String,
    start_at: String,
    end_at: String,
    is_critical: bool,
}

impl WorkedShiftRow {
    fn into_model(self) -> EngineResult<WorkedShift> {
        Ok(WorkedShift {
            assignment_id: self.assignment_id,
            person_id: self.person_id,
            shift_id: self.shift_id,
            status: parse_status(&self.status)?,
            start_at: parse_datetime(&self.start_at)?,
            end_at: parse_datetime(&self.end_at)?,
            is_critical: self.is_critical,
        })
    }
}

const WORKED_SHIFT_SELECT: &str = "SELECT a.assignment_id, a.person_id, a.shift_id, a.status,
            s.start_at, s.end_at, s.is_critical
     FROM shift_assignment a
     JOIN scheduled_shift s ON s.shift_id = a.shift_id";

fn map_worked_shift(r: &rusqlite::Row<'_>) -> rusqlite::Result<WorkedShiftRow> {
    Ok(WorkedShiftRow {
        assignment_id: r.get(0)?,
        person_id: r.get(1)?,
        shift_id: r.get(2)?,
        status: r.get(3)?,
        start_at: r.get(4)?,
        end_at: r.get(5)?,
        is_critical: r.get::<_, i32>(6)? != 0,
    })
}

impl RosterReader for SqliteRoster {
    fn assignments_in_window(
        &self,
        person_id: &str,
        from: NaiveDate,
        to: NaiveDate,
        statuses: &[AssignmentStatus],
    ) -> EngineResult<Vec<WorkedShift>> {
        let sql = format!(
            "{WORKED_SHIFT_SELECT}
             WHERE a.person_id = ?1
               AND date(s.start_at) >= ?2 AND date(s.start_at) <= ?3
               AND a.status IN ({})
             ORDER BY s.start_at",
            status_list(statuses)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![person_id, fmt_date(from), fmt_date(to)],
            map_worked_shift,
        )?;
        let mut result = Vec::new();
        for r in rows {
            result.push(r?.into_model()?);
        }
        Ok(result)
    }

    fn assignment(&self, assignment_id: &str) -> EngineResult<Option<WorkedShift>> {
        let sql = format!("{WORKED_SHIFT_SELECT} WHERE a.assignment_id = ?1");
        let row = self
            .conn
            .query_row(&sql, params![assignment_id], map_worked_shift)
            .optional()?;
        row.map(WorkedShiftRow::into_model).transpose()
    }

    fn assignments_for_shift(
        &self,
        shift_id: &str,
        statuses: &[AssignmentStatus],
    ) -> EngineResult<Vec<WorkedShift>> {
        let sql = format!(
            "{WORKED_SHIFT_SELECT}
             WHERE a.shift_id = ?1 AND a.status IN ({})
             ORDER BY a.assignment_id",
            status_list(statuses)
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params![shift_id], map_worked_shift)?;
        let mut result = Vec::new();
        for r in rows {
            result.push(r?.into_model()?);
        }
        Ok(result)
    }

    fn shift(&self, shift_id: &str) -> EngineResult<Option<ShiftSpec>> {
        let row = self
            .conn
            .query_row(
                "SELECT shift_id, start_at, end_at, is_critical,
                        required_skills, required_certifications
                 FROM scheduled_shift WHERE shift_id = ?1",
                params![shift_id],
                |r| {
                    Ok((
                        r.get::<_, String>(0)?,
                        r.get::<_, String>(1)?,
                        r.get::<_, String>(2)?,
                        r.get::<_, i32>(3)? != 0,
                        r.get::<_, String>(4)?,
                        r.get::<_, String>(5)?,
                    ))
                },
            )
            .optional()?;
        match row {
            None => Ok(None),
            Some((shift_id, start_at, end_at, is_critical, skills, certs)) => Ok(Some(ShiftSpec {
                shift_id,
                start_at: parse_datetime(&start_at)?,
                end_at: parse_datetime(&end_at)?,
                is_critical,
                required_skills: serde_json::from_str(&skills)?,
                required_certifications: serde_json::from_str(&certs)?,
            })),
        }
    }

    fn weekly_overtime(
        &self,
        person_id: &str,
        week_start: NaiveDate,
    ) -> EngineResult<Option<WeeklyOvertime>> {
        let row = self
            .conn
            .query_row(
                "SELECT regular_hours, overtime_hours FROM overtime_week
                 WHERE person_id = ?1 AND week_start = ?2",
                params![person_id, fmt_date(week_start)],
                |r| Ok((r.get::<_, f64>(0)?, r.get::<_, f64>(1)?)),
            )
            .optional()?;
        Ok(row.map(|(regular_hours, overtime_hours)| WeeklyOvertime {
            person_id: person_id.to_string(),
            week_start,
            regular_hours,
            overtime_hours,
        }))
    }

    fn availability(
        &self,
        person_id: &str,
        date: NaiveDate,
    ) -> EngineResult<Option<AvailabilityKind>> {
        let kind = self
            .conn
            .query_row(
                "SELECT availability FROM crew_availability
                 WHERE person_id = ?1 AND day = ?2",
                params![person_id, fmt_date(date)],
                |r| r.get::<_, String>(0),
            )
            .optional()?;
        match kind {
            None => Ok(None),
            Some(k) => AvailabilityKind::from_str(&k)
                .map(Some)
                .ok_or_else(|| EngineError::Config(format!("unknown availability kind '{k}'"))),
        }
    }

    fn last_skill_use(&self, person_id: &str, skill: &str) -> EngineResult<Option<NaiveDate>> {
        let latest = self
            .conn
            .query_row(
                "SELECT max(performed_on) FROM skill_usage
                 WHERE person_id = ?1 AND skill = ?2",
                params![person_id, skill],
                |r| r.get::<_, Option<String>>(0),
            )
            .optional()?
            .flatten();
        latest.map(|s| parse_date(&s)).transpose()
    }

    fn active_personnel(&self) -> EngineResult<Vec<Person>> {
        let mut stmt = self.conn.prepare(
            "SELECT person_id, name, hire_date FROM personnel
             WHERE active = 1 ORDER BY person_id",
        )?;
        let rows = stmt.query_map([], |r| {
            Ok((
                r.get::<_, String>(0)?,
                r.get::<_, String>(1)?,
                r.get::<_, String>(2)?,
            ))
        })?;
        let mut result = Vec::new();
        for r in rows {
            let (person_id, name, hire_date) = r?;
            result.push(Person {
                person_id,
                name,
                hire_date: parse_date(&hire_date)?,
            });
        }
        Ok(result)
    }

    fn valid_certifications(&self, person_id: &str, on: NaiveDate) -> EngineResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT certification FROM certification
             WHERE person_id = ?1 AND valid_from <= ?2 AND valid_until >= ?2
             ORDER BY certification",
        )?;
        let rows = stmt.query_map(params![person_id, fmt_date(on)], |r| r.get::<_, String>(0))?;
        let mut result = Vec::new();
        for r in rows {
            result.push(r?);
        }
        Ok(result)
    }

    fn incident_exposures(
        &self,
        person_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT incident_kind FROM incident_exposure
             WHERE person_id = ?1 AND occurred_on >= ?2 AND occurred_on <= ?3
             ORDER BY occurred_on",
        )?;
        let rows = stmt.query_map(params![person_id, fmt_date(from), fmt_date(to)], |r| {
            r.get::<_, String>(0)
        })?;
        let mut result = Vec::new();
        for r in rows {
            result.push(r?);
        }
        Ok(result)
    }

    fn daily_call_counts(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<(NaiveDate, u32)>> {
        let mut stmt = self.conn.prepare(
            "SELECT day, call_count FROM call_volume
             WHERE day >= ?1 AND day <= ?2 ORDER BY day",
        )?;
        let rows = stmt.query_map(params![fmt_date(from), fmt_date(to)], |r| {
            Ok((r.get::<_, String>(0)?, r.get::<_, u32>(1)?))
        })?;
        let mut result = Vec::new();
        for r in rows {
            let (day, count) = r?;
            result.push((parse_date(&day)?, count));
        }
        Ok(result)
    }
}
