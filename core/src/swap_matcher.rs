//! Swap matching.
//!
//! Given an assignment its holder wants to give up, ranks the rest of the
//! active roster by suitability to take it. Hard constraints filter, they
//! never down-score: a candidate at critical fatigue or with an
//! overlapping assigned/confirmed shift simply does not appear.
//!
//! The engine returns every computed match (best first, truncated to
//! `max_results`). Composing services conventionally drop matches at or
//! below `SUGGESTED_SCORE_FLOOR` before surfacing them.

use crate::{
    config::FatigueWeights,
    error::{EngineError, EngineResult},
    fatigue_scorer::FatigueScorer,
    model::{
        AvailabilityKind, RiskLevel, SwapMatch, WorkedShift, BLOCKING_STATUSES, WORKED_STATUSES,
    },
    reader::RosterReader,
};
use chrono::{Datelike, Duration, NaiveDate};
use std::collections::BTreeMap;

const W_FATIGUE: f64 = 0.25;
const W_AVAILABILITY: f64 = 0.20;
const W_CERTIFICATION: f64 = 0.25;
const W_FAIRNESS: f64 = 0.15;
const W_PREFERENCE: f64 = 0.15;

/// Candidates clamp to this fatigue factor when their risk tier is high.
const HIGH_RISK_FATIGUE_CAP: f64 = 30.0;

/// Conventional cut-off applied by callers, not by the engine.
pub const SUGGESTED_SCORE_FLOOR: f64 = 30.0;

pub const DEFAULT_MAX_RESULTS: usize = 10;

pub struct SwapMatcher<'a, R: RosterReader> {
    reader: &'a R,
    fatigue_weights: &'a FatigueWeights,
}

impl<'a, R: RosterReader> SwapMatcher<'a, R> {
    pub fn new(reader: &'a R, fatigue_weights: &'a FatigueWeights) -> Self {
        Self {
            reader,
            fatigue_weights,
        }
    }

    /// Rank swap candidates for `assignment_id`, best first.
    pub fn find_swap_matches(
        &self,
        assignment_id: &str,
        max_results: usize,
    ) -> EngineResult<Vec<SwapMatch>> {
        let assignment = self.reader.assignment(assignment_id)?.ok_or_else(|| {
            EngineError::AssignmentNotFound {
                id: assignment_id.to_string(),
            }
        })?;
        let shift = self.reader.shift(&assignment.shift_id)?.ok_or_else(|| {
            EngineError::ShiftNotFound {
                id: assignment.shift_id.clone(),
            }
        })?;

        let shift_date = assignment.start_at.date();
        let requester_hours = self.hours_since_month_start(&assignment.person_id, shift_date)?;
        let fatigue = FatigueScorer::new(self.reader, self.fatigue_weights);

        let mut matches = Vec::new();
        for candidate in self.reader.active_personnel()? {
            if candidate.person_id == assignment.person_id {
                continue;
            }

            let candidate_fatigue = fatigue.score(&candidate.person_id, shift_date)?;
            if candidate_fatigue.risk_level == RiskLevel::Critical {
                log::debug!(
                    "swap candidate {} excluded: critical fatigue",
                    candidate.person_id
                );
                continue;
            }
            if self.has_conflict(&candidate.person_id, &assignment)? {
                log::debug!(
                    "swap candidate {} excluded: schedule conflict",
                    candidate.person_id
                );
                continue;
            }

            let mut warnings = Vec::new();
            let mut factors = BTreeMap::new();

            let mut fatigue_factor = 100.0 - candidate_fatigue.overall_score;
            if candidate_fatigue.risk_level == RiskLevel::High {
                fatigue_factor = fatigue_factor.min(HIGH_RISK_FATIGUE_CAP);
                warnings.push("candidate fatigue risk is high".to_string());
            }
            factors.insert("fatigue_risk".to_string(), fatigue_factor);

            // No hard conflict at this point, so availability is clear.
            factors.insert("availability".to_string(), 100.0);

            let cert_factor = self.certification_factor(
                &candidate.person_id,
                shift_date,
                &shift.required_certifications,
                &mut warnings,
            )?;
            factors.insert("certification_match".to_string(), cert_factor);

            let candidate_hours =
                self.hours_since_month_start(&candidate.person_id, shift_date)?;
            let (fairness_factor, fairness_impact) =
                fairness(candidate_hours, requester_hours);
            factors.insert("fairness_impact".to_string(), fairness_factor);

            let preference = self.reader.availability(&candidate.person_id, shift_date)?;
            factors.insert("preference_match".to_string(), preference_factor(preference));

            let compatibility_score = factors["fatigue_risk"] * W_FATIGUE
                + factors["availability"] * W_AVAILABILITY
                + factors["certification_match"] * W_CERTIFICATION
                + factors["fairness_impact"] * W_FAIRNESS
                + factors["preference_match"] * W_PREFERENCE;

            matches.push(SwapMatch {
                requester_id: assignment.person_id.clone(),
                target_id: candidate.person_id,
                compatibility_score,
                fairness_impact: fairness_impact.to_string(),
                factors,
                warnings,
            });
        }

        matches.sort_by(|a, b| {
            b.compatibility_score
                .partial_cmp(&a.compatibility_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.target_id.cmp(&b.target_id))
        });
        matches.truncate(max_results);
        Ok(matches)
    }

    /// Any assigned/confirmed shift overlapping the one being given up.
    /// The window reaches a day either side to catch overnight shifts.
    fn has_conflict(&self, person_id: &str, assignment: &WorkedShift) -> EngineResult<bool> {
        let date = assignment.start_at.date();
        let nearby = self.reader.assignments_in_window(
            person_id,
            date - Duration::days(1),
            date + Duration::days(1),
            &BLOCKING_STATUSES,
        )?;
        Ok(nearby
            .iter()
            .any(|s| s.overlaps(assignment.start_at, assignment.end_at)))
    }

    fn hours_since_month_start(
        &self,
        person_id: &str,
        reference_date: NaiveDate,
    ) -> EngineResult<f64> {
        let month_start = reference_date
            .with_day(1)
            .expect("day 1 exists in every month");
        let shifts = self.reader.assignments_in_window(
            person_id,
            month_start,
            reference_date,
            &WORKED_STATUSES,
        )?;
        Ok(shifts.iter().map(WorkedShift::hours).sum())
    }

    fn certification_factor(
        &self,
        person_id: &str,
        shift_date: NaiveDate,
        required: &[String],
        warnings: &mut Vec<String>,
    ) -> EngineResult<f64> {
        if required.is_empty() {
            return Ok(100.0);
        }
        let held = self.reader.valid_certifications(person_id, shift_date)?;
        let mut missing = Vec::new();
        for cert in required {
            if !held.contains(cert) {
                missing.push(cert.clone());
            }
        }
        for cert in &missing {
            warnings.push(format!("missing certification: {cert}"));
        }
        let held_count = required.len() - missing.len();
        Ok(held_count as f64 / required.len() as f64 * 100.0)
    }
}

/// Hours-balance comparison against the requester since month start.
fn fairness(candidate_hours: f64, requester_hours: f64) -> (f64, &'static str) {
    if candidate_hours > requester_hours {
        (30.0, "adds_load")
    } else if candidate_hours <= requester_hours - 20.0 {
        (80.0, "rebalances_hours")
    } else {
        (50.0, "neutral")
    }
}

fn preference_factor(availability: Option<AvailabilityKind>) -> f64 {
    match availability {
        Some(AvailabilityKind::Preferred) => 100.0,
        Some(AvailabilityKind::Available) => 75.0,
        Some(AvailabilityKind::IfNeeded) => 40.0,
        Some(AvailabilityKind::Unavailable) => 0.0,
        None => 50.0,
    }
}
