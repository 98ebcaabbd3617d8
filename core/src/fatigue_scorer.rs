//! Fatigue scoring.
//!
//! Computes a 0-100 fatigue index for one person from a 14-day trailing
//! window of assignments:
//!   1. consecutive_hours    - average hours per worked day
//!   2. night_shift_ratio    - share of shifts starting 18:00 or later
//!   3. days_without_rest    - unbroken worked-day streak ending at the
//!                             reference date
//!   4. overtime_ratio       - weekly overtime rollup for the current week
//!   5. circadian_disruption - start-hour jumps between adjacent shifts
//!   6. shift_intensity      - share of critical-flagged assignments
//!
//! Every factor is clamped to [0,100] before weighting, so the weighted
//! sum stays in [0,100]. An empty window scores 0 across the board and
//! is a valid "rested" result, not an error.

use crate::{
    config::FatigueWeights,
    error::EngineResult,
    model::{FatigueScore, RiskLevel, WorkedShift, WORKED_STATUSES},
    reader::RosterReader,
};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use std::collections::{BTreeMap, BTreeSet};

/// Trailing window length in days, reference date inclusive.
pub const WINDOW_DAYS: i64 = 14;

/// Shifts starting at or after this hour count as night shifts.
const NIGHT_START_HOUR: u32 = 18;

/// Adjacent shift start hours further apart than this disrupt circadian
/// rhythm.
const CIRCADIAN_JUMP_HOURS: i64 = 6;

const RISK_MODERATE: f64 = 40.0;
const RISK_HIGH: f64 = 60.0;
const RISK_CRITICAL: f64 = 80.0;

pub struct FatigueScorer<'a, R: RosterReader> {
    reader: &'a R,
    weights: &'a FatigueWeights,
}

impl<'a, R: RosterReader> FatigueScorer<'a, R> {
    pub fn new(reader: &'a R, weights: &'a FatigueWeights) -> Self {
        Self { reader, weights }
    }

    /// Score one person as of `reference_date`.
    pub fn score(&self, person_id: &str, reference_date: NaiveDate) -> EngineResult<FatigueScore> {
        let from = reference_date - Duration::days(WINDOW_DAYS - 1);
        let shifts =
            self.reader
                .assignments_in_window(person_id, from, reference_date, &WORKED_STATUSES)?;

        let overtime_hours = self
            .reader
            .weekly_overtime(person_id, week_start(reference_date))?
            .map(|w| w.overtime_hours)
            .unwrap_or(0.0);

        let mut factors = BTreeMap::new();
        factors.insert(
            "consecutive_hours".to_string(),
            consecutive_hours_factor(&shifts),
        );
        factors.insert(
            "night_shift_ratio".to_string(),
            night_shift_factor(&shifts),
        );
        factors.insert(
            "days_without_rest".to_string(),
            rest_streak_factor(&shifts, reference_date),
        );
        factors.insert("overtime_ratio".to_string(), overtime_factor(overtime_hours));
        factors.insert(
            "circadian_disruption".to_string(),
            circadian_factor(&shifts),
        );
        factors.insert("shift_intensity".to_string(), intensity_factor(&shifts));

        let overall_score = self.weighted_sum(&factors);
        let risk_level = risk_level(overall_score);
        let recommendations = recommendations(&factors, risk_level);

        let factor_mean = factors.values().sum::<f64>() / factors.len() as f64;
        let next_safe_shift = Some(next_safe_shift(reference_date, factor_mean));

        log::debug!(
            "fatigue {person_id} @ {reference_date}: {overall_score:.1} ({})",
            risk_level.as_str()
        );

        Ok(FatigueScore {
            person_id: person_id.to_string(),
            overall_score,
            risk_level,
            factors,
            recommendations,
            next_safe_shift,
            shifts_in_window: shifts.len(),
        })
    }

    fn weighted_sum(&self, factors: &BTreeMap<String, f64>) -> f64 {
        let w = self.weights;
        let get = |k: &str| factors.get(k).copied().unwrap_or(0.0);
        get("consecutive_hours") * w.consecutive_hours
            + get("night_shift_ratio") * w.night_shift_ratio
            + get("days_without_rest") * w.days_without_rest
            + get("overtime_ratio") * w.overtime_ratio
            + get("circadian_disruption") * w.circadian_disruption
            + get("shift_intensity") * w.shift_intensity
    }
}

/// Monday of the week containing `date`, matching the overtime rollup key.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

fn clamp(v: f64) -> f64 {
    v.clamp(0.0, 100.0)
}

/// Average hours per worked day: 0 at 8h or less, ramping through 10h,
/// saturating past 12h.
fn consecutive_hours_factor(shifts: &[WorkedShift]) -> f64 {
    let worked_days: BTreeSet<NaiveDate> = shifts.iter().map(|s| s.start_at.date()).collect();
    if worked_days.is_empty() {
        return 0.0;
    }
    let total_hours: f64 = shifts.iter().map(WorkedShift::hours).sum();
    let avg = total_hours / worked_days.len() as f64;
    let score = if avg <= 8.0 {
        0.0
    } else if avg <= 10.0 {
        (avg - 8.0) / 2.0 * 40.0
    } else if avg <= 12.0 {
        40.0 + (avg - 10.0) / 2.0 * 40.0
    } else {
        80.0 + (avg - 12.0) * 10.0
    };
    clamp(score)
}

fn night_shift_factor(shifts: &[WorkedShift]) -> f64 {
    if shifts.is_empty() {
        return 0.0;
    }
    let nights = shifts
        .iter()
        .filter(|s| s.start_at.hour() >= NIGHT_START_HOUR)
        .count();
    clamp(nights as f64 / shifts.len() as f64 * 120.0)
}

/// Length of the unbroken streak of worked calendar dates ending at the
/// reference date, stepped: <=3 days is free, then 40, 70, linear beyond.
fn rest_streak_factor(shifts: &[WorkedShift], reference_date: NaiveDate) -> f64 {
    let worked: BTreeSet<NaiveDate> = shifts.iter().map(|s| s.start_at.date()).collect();
    let mut streak = 0i64;
    let mut day = reference_date;
    while worked.contains(&day) {
        streak += 1;
        day -= Duration::days(1);
    }
    let score = match streak {
        0..=3 => 0.0,
        4..=5 => 40.0,
        6..=7 => 70.0,
        n => 70.0 + (n - 7) as f64 * 10.0,
    };
    clamp(score)
}

fn overtime_factor(overtime_hours: f64) -> f64 {
    let score = if overtime_hours <= 4.0 {
        0.0
    } else if overtime_hours <= 8.0 {
        30.0
    } else if overtime_hours <= 12.0 {
        60.0
    } else {
        60.0 + (overtime_hours - 12.0) * 5.0
    };
    clamp(score)
}

/// Fraction of adjacent shift pairs (start-sorted) whose start-hour
/// difference exceeds the jump threshold.
fn circadian_factor(shifts: &[WorkedShift]) -> f64 {
    if shifts.len() < 2 {
        return 0.0;
    }
    let mut starts: Vec<NaiveDateTime> = shifts.iter().map(|s| s.start_at).collect();
    starts.sort();
    let disrupted = starts
        .windows(2)
        .filter(|pair| {
            let a = pair[0].hour() as i64;
            let b = pair[1].hour() as i64;
            (a - b).abs() > CIRCADIAN_JUMP_HOURS
        })
        .count();
    clamp(disrupted as f64 / (starts.len() - 1) as f64 * 150.0)
}

fn intensity_factor(shifts: &[WorkedShift]) -> f64 {
    if shifts.is_empty() {
        return 0.0;
    }
    let critical = shifts.iter().filter(|s| s.is_critical).count();
    clamp(critical as f64 / shifts.len() as f64 * 200.0)
}

fn risk_level(overall: f64) -> RiskLevel {
    if overall >= RISK_CRITICAL {
        RiskLevel::Critical
    } else if overall >= RISK_HIGH {
        RiskLevel::High
    } else if overall >= RISK_MODERATE {
        RiskLevel::Moderate
    } else {
        RiskLevel::Low
    }
}

fn recommendations(factors: &BTreeMap<String, f64>, risk: RiskLevel) -> Vec<String> {
    let get = |k: &str| factors.get(k).copied().unwrap_or(0.0);
    let mut recs = Vec::new();
    match risk {
        RiskLevel::Critical => {
            recs.push("Immediate schedule relief needed before the next assignment".to_string())
        }
        RiskLevel::High => {
            recs.push("Monitor closely and avoid adding shifts this week".to_string())
        }
        _ => {}
    }
    if get("consecutive_hours") > 60.0 {
        recs.push("Reduce scheduled shift hours over the coming week".to_string());
    }
    if get("days_without_rest") >= 40.0 {
        recs.push("Schedule at least one full rest day".to_string());
    }
    if get("night_shift_ratio") > 50.0 {
        recs.push("Rotate onto day shifts to restore sleep rhythm".to_string());
    }
    if get("overtime_ratio") >= 60.0 {
        recs.push("Hold back from overtime sign-ups this week".to_string());
    }
    if get("circadian_disruption") > 50.0 {
        recs.push("Stabilize shift start times".to_string());
    }
    if get("shift_intensity") > 50.0 {
        recs.push("Mix in lower-acuity assignments".to_string());
    }
    recs
}

/// Earliest recommended next shift, from the unweighted factor mean.
fn next_safe_shift(reference_date: NaiveDate, factor_mean: f64) -> NaiveDateTime {
    let days_out = if factor_mean < 30.0 {
        0
    } else if factor_mean < 50.0 {
        1
    } else if factor_mean < 70.0 {
        2
    } else {
        3
    };
    (reference_date + Duration::days(days_out))
        .and_hms_opt(8, 0, 0)
        .expect("08:00 is a valid time")
}
