//! The scoring engine facade.
//!
//! Wires the six calculators to one reader and one config. Holds no
//! mutable state and caches nothing: every call recomputes from the
//! reader, so results are idempotent for a fixed reference date and a
//! fixed snapshot.

use crate::{
    config::EngineConfig,
    demand_predictor::DemandPredictor,
    error::EngineResult,
    fatigue_scorer::FatigueScorer,
    model::{
        CompetencyPair, DecayLevel, FatigueScore, RecoveryPlan, SkillDecayReport, SkillGap,
        StaffingPlan, SwapMatch, WeeklyForecast, WellnessAlert, WellnessReport,
        WellnessSeverity,
    },
    pairing_engine::PairingEngine,
    reader::RosterReader,
    skill_decay_tracker::SkillDecayTracker,
    swap_matcher::SwapMatcher,
    types::PersonId,
    wellness_tracker::{WellnessTracker, DEFAULT_WINDOW_DAYS},
};
use chrono::NaiveDate;
use std::collections::BTreeMap;

pub struct ScoringEngine<'a, R: RosterReader> {
    reader: &'a R,
    config: EngineConfig,
}

impl<'a, R: RosterReader> ScoringEngine<'a, R> {
    pub fn new(reader: &'a R, config: EngineConfig) -> Self {
        Self { reader, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ── Fatigue ────────────────────────────────────────────────────

    pub fn fatigue_score(
        &self,
        person_id: &str,
        reference_date: NaiveDate,
    ) -> EngineResult<FatigueScore> {
        FatigueScorer::new(self.reader, &self.config.fatigue_weights)
            .score(person_id, reference_date)
    }

    // ── Skill decay ────────────────────────────────────────────────

    pub fn skill_decay_report(
        &self,
        person_id: &str,
        reference_date: NaiveDate,
        skills: Option<&[String]>,
    ) -> EngineResult<Vec<SkillDecayReport>> {
        SkillDecayTracker::new(self.reader, &self.config.skill_decay).decay_report(
            person_id,
            reference_date,
            skills,
        )
    }

    pub fn crew_skill_matrix(
        &self,
        person_ids: &[String],
        reference_date: NaiveDate,
    ) -> EngineResult<BTreeMap<PersonId, BTreeMap<String, DecayLevel>>> {
        SkillDecayTracker::new(self.reader, &self.config.skill_decay)
            .crew_skill_matrix(person_ids, reference_date)
    }

    pub fn find_skill_gaps(
        &self,
        shift_id: &str,
        reference_date: NaiveDate,
    ) -> EngineResult<Vec<SkillGap>> {
        SkillDecayTracker::new(self.reader, &self.config.skill_decay)
            .find_skill_gaps(shift_id, reference_date)
    }

    // ── Swaps ──────────────────────────────────────────────────────

    pub fn find_swap_matches(
        &self,
        assignment_id: &str,
        max_results: usize,
    ) -> EngineResult<Vec<SwapMatch>> {
        SwapMatcher::new(self.reader, &self.config.fatigue_weights)
            .find_swap_matches(assignment_id, max_results)
    }

    // ── Wellness ───────────────────────────────────────────────────

    pub fn wellness_report(
        &self,
        person_id: &str,
        reference_date: NaiveDate,
    ) -> EngineResult<WellnessReport> {
        WellnessTracker::new(self.reader, &self.config.wellness).wellness_report(
            person_id,
            reference_date,
            DEFAULT_WINDOW_DAYS,
        )
    }

    pub fn wellness_alerts(
        &self,
        min_severity: WellnessSeverity,
        reference_date: NaiveDate,
    ) -> EngineResult<Vec<WellnessAlert>> {
        WellnessTracker::new(self.reader, &self.config.wellness)
            .wellness_alerts(min_severity, reference_date)
    }

    pub fn recovery_schedule(
        &self,
        person_id: &str,
        reference_date: NaiveDate,
    ) -> EngineResult<RecoveryPlan> {
        WellnessTracker::new(self.reader, &self.config.wellness)
            .recovery_schedule(person_id, reference_date)
    }

    // ── Pairing ────────────────────────────────────────────────────

    pub fn find_optimal_pairs(
        &self,
        shift_id: &str,
        positions_to_fill: usize,
    ) -> EngineResult<Vec<CompetencyPair>> {
        PairingEngine::new(self.reader, &self.config)
            .find_optimal_pairs(shift_id, positions_to_fill)
    }

    // ── Demand ─────────────────────────────────────────────────────

    pub fn predict_demand(&self, date: NaiveDate) -> crate::model::DemandPrediction {
        DemandPredictor::new(self.config.demand.clone()).predict_demand(date)
    }

    pub fn weekly_forecast(&self, start_date: NaiveDate) -> WeeklyForecast {
        DemandPredictor::new(self.config.demand.clone()).weekly_forecast(start_date)
    }

    pub fn staffing_plan(&self, start_date: NaiveDate, days: u32) -> StaffingPlan {
        DemandPredictor::new(self.config.demand.clone()).staffing_plan(start_date, days)
    }
}
