//! The data seam between the scoring engine and the scheduling system.
//!
//! RULE: Scorers never touch storage directly. Every read goes through
//! this trait, and reader failures propagate to the caller via `?`;
//! the engine adds no retry or recovery logic of its own.

use crate::{
    error::EngineResult,
    model::{
        AssignmentStatus, AvailabilityKind, Person, ShiftSpec, WeeklyOvertime, WorkedShift,
    },
};
use chrono::NaiveDate;

pub trait RosterReader {
    /// Assignments for one person whose shift starts within `[from, to]`
    /// (dates inclusive), filtered to the given statuses.
    fn assignments_in_window(
        &self,
        person_id: &str,
        from: NaiveDate,
        to: NaiveDate,
        statuses: &[AssignmentStatus],
    ) -> EngineResult<Vec<WorkedShift>>;

    /// A single assignment joined to its shift, if it exists.
    fn assignment(&self, assignment_id: &str) -> EngineResult<Option<WorkedShift>>;

    /// Everyone bound to a shift in one of the given statuses.
    fn assignments_for_shift(
        &self,
        shift_id: &str,
        statuses: &[AssignmentStatus],
    ) -> EngineResult<Vec<WorkedShift>>;

    fn shift(&self, shift_id: &str) -> EngineResult<Option<ShiftSpec>>;

    /// Precomputed weekly rollup; `week_start` is the Monday of the week.
    fn weekly_overtime(
        &self,
        person_id: &str,
        week_start: NaiveDate,
    ) -> EngineResult<Option<WeeklyOvertime>>;

    /// Self-declared availability for a date, if any record exists.
    fn availability(
        &self,
        person_id: &str,
        date: NaiveDate,
    ) -> EngineResult<Option<AvailabilityKind>>;

    /// Most recent real-world use of a skill, if any record exists.
    fn last_skill_use(&self, person_id: &str, skill: &str) -> EngineResult<Option<NaiveDate>>;

    fn active_personnel(&self) -> EngineResult<Vec<Person>>;

    /// Certifications valid on the given date.
    fn valid_certifications(&self, person_id: &str, on: NaiveDate) -> EngineResult<Vec<String>>;

    /// Classified critical-incident involvements within `[from, to]`.
    fn incident_exposures(
        &self,
        person_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<String>>;

    /// Historical daily call counts within `[from, to]`, for baseline
    /// calibration of the demand model.
    fn daily_call_counts(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<(NaiveDate, u32)>>;
}
