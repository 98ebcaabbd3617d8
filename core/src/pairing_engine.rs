//! Competency pairing.
//!
//! Pairs senior and junior crew on a shift for mentorship. The score
//! favors an experience gap wide enough to mentor across but not so wide
//! the pairing stops being collegial, blended with how many of the
//! junior's decayed skills the senior currently holds.

use crate::{
    config::EngineConfig,
    error::{EngineError, EngineResult},
    fatigue_scorer::FatigueScorer,
    model::{CompetencyPair, DecayLevel, Person, RiskLevel, BLOCKING_STATUSES},
    reader::RosterReader,
    skill_decay_tracker::SkillDecayTracker,
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Years of service separating the senior pool from the junior pool.
const SENIOR_YEARS: f64 = 3.0;

const W_EXPERIENCE: f64 = 0.6;
const W_COMPLEMENTARITY: f64 = 0.4;

const MAX_PAIRS: usize = 5;
const MAX_MENTORSHIP_AREAS: usize = 5;

pub const DEFAULT_POSITIONS_TO_FILL: usize = 2;

pub struct PairingEngine<'a, R: RosterReader> {
    reader: &'a R,
    config: &'a EngineConfig,
}

impl<'a, R: RosterReader> PairingEngine<'a, R> {
    pub fn new(reader: &'a R, config: &'a EngineConfig) -> Self {
        Self { reader, config }
    }

    /// Best mentorship pairings among the crew assigned to `shift_id`.
    ///
    /// The first `positions_to_fill` results reuse no person; the rest are
    /// next-best alternates, up to five pairs total.
    pub fn find_optimal_pairs(
        &self,
        shift_id: &str,
        positions_to_fill: usize,
    ) -> EngineResult<Vec<CompetencyPair>> {
        let shift = self
            .reader
            .shift(shift_id)?
            .ok_or_else(|| EngineError::ShiftNotFound {
                id: shift_id.to_string(),
            })?;
        let shift_date = shift.start_at.date();

        let crew_ids: Vec<String> = self
            .reader
            .assignments_for_shift(shift_id, &BLOCKING_STATUSES)?
            .into_iter()
            .map(|a| a.person_id)
            .collect();
        let roster: BTreeMap<String, Person> = self
            .reader
            .active_personnel()?
            .into_iter()
            .filter(|p| crew_ids.contains(&p.person_id))
            .map(|p| (p.person_id.clone(), p))
            .collect();

        let mut seniors = Vec::new();
        let mut juniors = Vec::new();
        for person in roster.values() {
            if person.years_of_service(shift_date) >= SENIOR_YEARS {
                seniors.push(person);
            } else {
                juniors.push(person);
            }
        }

        let decay = SkillDecayTracker::new(self.reader, &self.config.skill_decay);
        let skill_levels: BTreeMap<String, BTreeMap<String, DecayLevel>> = {
            let ids: Vec<String> = roster.keys().cloned().collect();
            decay.crew_skill_matrix(&ids, shift_date)?
        };

        let mut scored = Vec::new();
        for senior in &seniors {
            for junior in &juniors {
                scored.push(self.score_pair(senior, junior, shift_date, &skill_levels)?);
            }
        }
        scored.sort_by(|a, b| {
            b.compatibility_score
                .partial_cmp(&a.compatibility_score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.senior_id.cmp(&b.senior_id))
                .then_with(|| a.junior_id.cmp(&b.junior_id))
        });

        Ok(select_pairs(scored, positions_to_fill))
    }

    fn score_pair(
        &self,
        senior: &Person,
        junior: &Person,
        shift_date: NaiveDate,
        skill_levels: &BTreeMap<String, BTreeMap<String, DecayLevel>>,
    ) -> EngineResult<CompetencyPair> {
        let gap = senior.years_of_service(shift_date) - junior.years_of_service(shift_date);
        let experience_score = experience_band(gap);

        let senior_skills = &skill_levels[&senior.person_id];
        let junior_skills = &skill_levels[&junior.person_id];

        let complementary = junior_skills
            .iter()
            .filter(|(skill, level)| {
                matches!(
                    level,
                    DecayLevel::RefresherRecommended | DecayLevel::RefresherRequired
                ) && senior_skills.get(*skill) == Some(&DecayLevel::Current)
            })
            .count();
        let complementarity_score = (complementary as f64 * 20.0).min(100.0);

        let compatibility_score =
            W_EXPERIENCE * experience_score + W_COMPLEMENTARITY * complementarity_score;

        let mentorship_areas: Vec<String> = junior_skills
            .iter()
            .filter(|(_, level)| **level != DecayLevel::Current)
            .map(|(skill, _)| skill.clone())
            .take(MAX_MENTORSHIP_AREAS)
            .collect();

        let mut risk_factors = Vec::new();
        let fatigue = FatigueScorer::new(self.reader, &self.config.fatigue_weights);
        for (label, person) in [("senior", senior), ("junior", junior)] {
            let score = fatigue.score(&person.person_id, shift_date)?;
            if score.risk_level >= RiskLevel::High {
                risk_factors.push(format!(
                    "{label} fatigue risk is {}",
                    score.risk_level.as_str()
                ));
            }
        }

        Ok(CompetencyPair {
            senior_id: senior.person_id.clone(),
            junior_id: junior.person_id.clone(),
            compatibility_score,
            mentorship_areas,
            risk_factors,
        })
    }
}

/// Non-monotonic band over the experience gap in years: too-similar and
/// too-wide pairings both score below the 1-3 year sweet spot.
fn experience_band(gap_years: f64) -> f64 {
    if gap_years < 1.0 {
        30.0
    } else if gap_years <= 3.0 {
        100.0
    } else if gap_years <= 5.0 {
        80.0
    } else {
        60.0
    }
}

/// Greedy person-disjoint picks up to `positions_to_fill`, then next-best
/// alternates until `MAX_PAIRS`.
fn select_pairs(scored: Vec<CompetencyPair>, positions_to_fill: usize) -> Vec<CompetencyPair> {
    let mut used: Vec<String> = Vec::new();
    let mut selected = Vec::new();
    let mut alternates = Vec::new();
    for pair in scored {
        let disjoint =
            !used.contains(&pair.senior_id) && !used.contains(&pair.junior_id);
        if selected.len() < positions_to_fill && disjoint {
            used.push(pair.senior_id.clone());
            used.push(pair.junior_id.clone());
            selected.push(pair);
        } else {
            alternates.push(pair);
        }
    }
    for pair in alternates {
        if selected.len() >= MAX_PAIRS {
            break;
        }
        selected.push(pair);
    }
    selected
}
