//! Skill decay tracking.
//!
//! Classifies per-skill competency currency against the configured
//! threshold table. Days since last use come from the roster's skill
//! usage records via the reader seam; a person with no usage record for
//! a skill carries the sentinel (999 internally, surfaced as -1) and
//! classifies as expired.

use crate::{
    config::{SkillDecayTable, SkillThresholds},
    error::{EngineError, EngineResult},
    model::{DecayLevel, GapSeverity, SkillDecayReport, SkillGap, BLOCKING_STATUSES},
    reader::RosterReader,
    types::PersonId,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Internal stand-in for "never recorded"; beyond every expiry threshold.
pub const NO_USAGE_SENTINEL_DAYS: i64 = 999;

/// Skills whose absence on a shift is a high-severity gap.
const HIGH_SEVERITY_SKILLS: [&str; 2] = ["cardiac_arrest_management", "advanced_airway"];

/// Fallback thresholds for skills missing from the configured table.
const DEFAULT_THRESHOLDS: SkillThresholds = SkillThresholds {
    refresher_days: 60,
    required_days: 120,
    expired_days: 180,
};

pub struct SkillDecayTracker<'a, R: RosterReader> {
    reader: &'a R,
    table: &'a SkillDecayTable,
}

impl<'a, R: RosterReader> SkillDecayTracker<'a, R> {
    pub fn new(reader: &'a R, table: &'a SkillDecayTable) -> Self {
        Self { reader, table }
    }

    /// Decay report for one person. `skills` of `None` evaluates the full
    /// configured skill table.
    pub fn decay_report(
        &self,
        person_id: &str,
        reference_date: NaiveDate,
        skills: Option<&[String]>,
    ) -> EngineResult<Vec<SkillDecayReport>> {
        let skill_names: Vec<String> = match skills {
            Some(list) => list.to_vec(),
            None => self.table.keys().cloned().collect(),
        };

        let mut reports = Vec::with_capacity(skill_names.len());
        for skill in &skill_names {
            let last_performed = self.reader.last_skill_use(person_id, skill)?;
            let internal_days = match last_performed {
                Some(d) => (reference_date - d).num_days().max(0),
                None => NO_USAGE_SENTINEL_DAYS,
            };
            let decay_level = classify(internal_days, self.thresholds_for(skill));
            reports.push(SkillDecayReport {
                person_id: person_id.to_string(),
                skill_name: skill.clone(),
                last_performed,
                days_since_use: if last_performed.is_some() {
                    internal_days
                } else {
                    -1
                },
                decay_level,
            });
        }
        Ok(reports)
    }

    /// Roster-wide decay matrix for dashboards: person -> skill -> tier.
    pub fn crew_skill_matrix(
        &self,
        person_ids: &[String],
        reference_date: NaiveDate,
    ) -> EngineResult<BTreeMap<PersonId, BTreeMap<String, DecayLevel>>> {
        let mut matrix = BTreeMap::new();
        for person_id in person_ids {
            let reports = self.decay_report(person_id, reference_date, None)?;
            let row = reports
                .into_iter()
                .map(|r| (r.skill_name, r.decay_level))
                .collect();
            matrix.insert(person_id.clone(), row);
        }
        Ok(matrix)
    }

    /// Skills the shift requires that no currently-assigned person holds
    /// at current decay.
    pub fn find_skill_gaps(
        &self,
        shift_id: &str,
        reference_date: NaiveDate,
    ) -> EngineResult<Vec<SkillGap>> {
        let shift = self
            .reader
            .shift(shift_id)?
            .ok_or_else(|| EngineError::ShiftNotFound {
                id: shift_id.to_string(),
            })?;
        let crew = self
            .reader
            .assignments_for_shift(shift_id, &BLOCKING_STATUSES)?;

        let mut gaps = Vec::new();
        for skill in &shift.required_skills {
            let mut covered = false;
            for member in &crew {
                let last = self.reader.last_skill_use(&member.person_id, skill)?;
                let days = match last {
                    Some(d) => (reference_date - d).num_days().max(0),
                    None => NO_USAGE_SENTINEL_DAYS,
                };
                if classify(days, self.thresholds_for(skill)) == DecayLevel::Current {
                    covered = true;
                    break;
                }
            }
            if !covered {
                gaps.push(SkillGap {
                    skill: skill.clone(),
                    severity: gap_severity(skill),
                });
            }
        }
        Ok(gaps)
    }

    fn thresholds_for(&self, skill: &str) -> SkillThresholds {
        match self.table.get(skill) {
            Some(t) => *t,
            None => {
                log::debug!("skill '{skill}' not in decay table, using defaults");
                DEFAULT_THRESHOLDS
            }
        }
    }
}

/// Highest threshold met wins; tiers never regress as days grow.
fn classify(days_since_use: i64, t: SkillThresholds) -> DecayLevel {
    if days_since_use >= t.expired_days {
        DecayLevel::Expired
    } else if days_since_use >= t.required_days {
        DecayLevel::RefresherRequired
    } else if days_since_use >= t.refresher_days {
        DecayLevel::RefresherRecommended
    } else {
        DecayLevel::Current
    }
}

fn gap_severity(skill: &str) -> GapSeverity {
    if HIGH_SEVERITY_SKILLS.contains(&skill) {
        GapSeverity::High
    } else {
        GapSeverity::Medium
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const T: SkillThresholds = SkillThresholds {
        refresher_days: 45,
        required_days: 75,
        expired_days: 120,
    };

    #[test]
    fn classify_tier_boundaries() {
        assert_eq!(classify(0, T), DecayLevel::Current);
        assert_eq!(classify(44, T), DecayLevel::Current);
        assert_eq!(classify(45, T), DecayLevel::RefresherRecommended);
        assert_eq!(classify(75, T), DecayLevel::RefresherRequired);
        assert_eq!(classify(120, T), DecayLevel::Expired);
        assert_eq!(classify(NO_USAGE_SENTINEL_DAYS, T), DecayLevel::Expired);
    }

    #[test]
    fn classify_is_monotonic_in_days() {
        let mut last = DecayLevel::Current;
        for days in 0..300 {
            let level = classify(days, T);
            assert!(level >= last, "tier regressed at {days} days");
            last = level;
        }
    }
}
