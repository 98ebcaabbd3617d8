//! Shared primitive types used across the engine.

/// A stable identifier for a crew member, assigned by the roster system.
pub type PersonId = String;

/// A stable identifier for a scheduled shift.
pub type ShiftId = String;

/// A stable identifier for a shift assignment.
pub type AssignmentId = String;

/// Date and datetime storage formats used by the SQLite roster snapshot.
pub const DATE_FMT: &str = "%Y-%m-%d";
pub const DATETIME_FMT: &str = "%Y-%m-%d %H:%M:%S";
