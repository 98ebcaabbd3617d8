//! Roster records and the value objects the scoring components emit.
//!
//! Everything here is either a read-only snapshot row (owned by the
//! scheduling system) or a derived result computed fresh on every call.
//! The engine never persists any of these.

use crate::types::{AssignmentId, PersonId, ShiftId};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Snapshot rows ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Assigned,
    Confirmed,
    Completed,
    Declined,
    Swapped,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "assigned",
            AssignmentStatus::Confirmed => "confirmed",
            AssignmentStatus::Completed => "completed",
            AssignmentStatus::Declined => "declined",
            AssignmentStatus::Swapped => "swapped",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "assigned" => Some(AssignmentStatus::Assigned),
            "confirmed" => Some(AssignmentStatus::Confirmed),
            "completed" => Some(AssignmentStatus::Completed),
            "declined" => Some(AssignmentStatus::Declined),
            "swapped" => Some(AssignmentStatus::Swapped),
            _ => None,
        }
    }
}

/// Statuses that count as work performed for fatigue, wellness, and hours.
pub const WORKED_STATUSES: [AssignmentStatus; 3] = [
    AssignmentStatus::Assigned,
    AssignmentStatus::Confirmed,
    AssignmentStatus::Completed,
];

/// Statuses that block a candidate from taking an overlapping shift.
pub const BLOCKING_STATUSES: [AssignmentStatus; 2] =
    [AssignmentStatus::Assigned, AssignmentStatus::Confirmed];

/// An assignment joined to its shift's time box. The unit of "work
/// performed" for the fatigue and fairness calculations.
#[derive(Debug, Clone, Serialize)]
pub struct WorkedShift {
    pub assignment_id: AssignmentId,
    pub person_id: PersonId,
    pub shift_id: ShiftId,
    pub status: AssignmentStatus,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub is_critical: bool,
}

impl WorkedShift {
    pub fn hours(&self) -> f64 {
        (self.end_at - self.start_at).num_minutes() as f64 / 60.0
    }

    /// Overlap test against another time box, half-open intervals.
    pub fn overlaps(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start_at < end && start < self.end_at
    }
}

/// A scheduled shift with its skill and certification requirements.
#[derive(Debug, Clone, Serialize)]
pub struct ShiftSpec {
    pub shift_id: ShiftId,
    pub start_at: NaiveDateTime,
    pub end_at: NaiveDateTime,
    pub is_critical: bool,
    pub required_skills: Vec<String>,
    pub required_certifications: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityKind {
    Preferred,
    Available,
    IfNeeded,
    Unavailable,
}

impl AvailabilityKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "preferred" => Some(AvailabilityKind::Preferred),
            "available" => Some(AvailabilityKind::Available),
            "if_needed" => Some(AvailabilityKind::IfNeeded),
            "unavailable" => Some(AvailabilityKind::Unavailable),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Person {
    pub person_id: PersonId,
    pub name: String,
    pub hire_date: NaiveDate,
}

impl Person {
    /// Whole years of service as of a date.
    pub fn years_of_service(&self, on: NaiveDate) -> f64 {
        (on - self.hire_date).num_days() as f64 / 365.25
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyOvertime {
    pub person_id: PersonId,
    pub week_start: NaiveDate,
    pub regular_hours: f64,
    pub overtime_hours: f64,
}

// ── Fatigue ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
    Critical,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "low",
            RiskLevel::Moderate => "moderate",
            RiskLevel::High => "high",
            RiskLevel::Critical => "critical",
        }
    }
}

/// Point-in-time fatigue estimate for one person.
///
/// `shifts_in_window` lets callers tell an all-zero score backed by a full
/// history apart from one backed by no data at all.
#[derive(Debug, Clone, Serialize)]
pub struct FatigueScore {
    pub person_id: PersonId,
    pub overall_score: f64,
    pub risk_level: RiskLevel,
    pub factors: BTreeMap<String, f64>,
    pub recommendations: Vec<String>,
    pub next_safe_shift: Option<NaiveDateTime>,
    pub shifts_in_window: usize,
}

// ── Skill decay ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayLevel {
    Current,
    RefresherRecommended,
    RefresherRequired,
    Expired,
}

impl DecayLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecayLevel::Current => "current",
            DecayLevel::RefresherRecommended => "refresher_recommended",
            DecayLevel::RefresherRequired => "refresher_required",
            DecayLevel::Expired => "expired",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillDecayReport {
    pub person_id: PersonId,
    pub skill_name: String,
    pub last_performed: Option<NaiveDate>,
    /// Days since last use, or -1 when no usage record exists.
    pub days_since_use: i64,
    pub decay_level: DecayLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GapSeverity {
    Medium,
    High,
}

#[derive(Debug, Clone, Serialize)]
pub struct SkillGap {
    pub skill: String,
    pub severity: GapSeverity,
}

// ── Swap matching ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct SwapMatch {
    pub requester_id: PersonId,
    pub target_id: PersonId,
    pub compatibility_score: f64,
    /// Direction of the hours rebalance this swap would cause.
    pub fairness_impact: String,
    pub factors: BTreeMap<String, f64>,
    pub warnings: Vec<String>,
}

// ── Wellness ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WellnessSeverity {
    Normal,
    Watch,
    Concern,
    Intervention,
    Critical,
}

impl WellnessSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            WellnessSeverity::Normal => "normal",
            WellnessSeverity::Watch => "watch",
            WellnessSeverity::Concern => "concern",
            WellnessSeverity::Intervention => "intervention",
            WellnessSeverity::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WellnessReport {
    pub person_id: PersonId,
    pub exposure_score: f64,
    pub severity: WellnessSeverity,
    pub recommendation: String,
    pub incident_counts: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WellnessAlert {
    pub person_id: PersonId,
    pub severity: WellnessSeverity,
    pub incident_count: u32,
    pub recommendation: String,
    pub auto_action_suggested: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecoveryPlan {
    pub person_id: PersonId,
    pub severity: WellnessSeverity,
    pub days_off: u32,
    pub restrictions: Vec<String>,
}

// ── Competency pairing ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct CompetencyPair {
    pub senior_id: PersonId,
    pub junior_id: PersonId,
    pub compatibility_score: f64,
    pub mentorship_areas: Vec<String>,
    pub risk_factors: Vec<String>,
}

// ── Demand prediction ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct DemandPrediction {
    pub date: NaiveDate,
    pub predicted_calls: f64,
    pub confidence: f64,
    pub recommended_staff: u32,
    pub factors: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WeeklyForecast {
    pub start_date: NaiveDate,
    pub days: Vec<DemandPrediction>,
    pub peak_day: NaiveDate,
    pub trough_day: NaiveDate,
    pub total_predicted_calls: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StaffingPlan {
    pub start_date: NaiveDate,
    pub days: Vec<DemandPrediction>,
    pub total_predicted_calls: f64,
    pub total_staff_days: u32,
    pub peak_day: NaiveDate,
}
