//! Engine configuration tables.
//!
//! Weight tables, decay thresholds, and demand multipliers are data, not
//! code: they load from JSON under a data directory so they can be tuned
//! without a redeploy. `EngineConfig::builtin()` carries the shipped
//! defaults so the engine also works with no data directory at all.

use crate::error::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Fatigue ──────────────────────────────────────────────────────────────────

/// Per-factor weights for the composite fatigue index. Must sum to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FatigueWeights {
    pub consecutive_hours: f64,
    pub night_shift_ratio: f64,
    pub days_without_rest: f64,
    pub overtime_ratio: f64,
    pub circadian_disruption: f64,
    pub shift_intensity: f64,
}

impl Default for FatigueWeights {
    fn default() -> Self {
        Self {
            consecutive_hours: 0.20,
            night_shift_ratio: 0.15,
            days_without_rest: 0.20,
            overtime_ratio: 0.15,
            circadian_disruption: 0.15,
            shift_intensity: 0.15,
        }
    }
}

impl FatigueWeights {
    pub fn sum(&self) -> f64 {
        self.consecutive_hours
            + self.night_shift_ratio
            + self.days_without_rest
            + self.overtime_ratio
            + self.circadian_disruption
            + self.shift_intensity
    }
}

#[derive(Debug, Clone, Deserialize)]
struct FatigueWeightsFile {
    weights: FatigueWeights,
}

// ── Skill decay ──────────────────────────────────────────────────────────────

/// Decay tier cut-offs for one skill, in days since last use.
/// Strictly ascending: refresher < required < expired.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SkillThresholds {
    pub refresher_days: i64,
    pub required_days: i64,
    pub expired_days: i64,
}

pub type SkillDecayTable = BTreeMap<String, SkillThresholds>;

#[derive(Debug, Clone, Deserialize)]
struct SkillDecayFile {
    skills: SkillDecayTable,
}

fn builtin_skill_table() -> SkillDecayTable {
    let mut t = SkillDecayTable::new();
    let mut add = |name: &str, refresher: i64, required: i64, expired: i64| {
        t.insert(
            name.to_string(),
            SkillThresholds {
                refresher_days: refresher,
                required_days: required,
                expired_days: expired,
            },
        );
    };
    add("advanced_airway", 45, 75, 120);
    add("cardiac_arrest_management", 30, 60, 90);
    add("iv_access", 60, 90, 150);
    add("medication_administration", 45, 90, 135);
    add("twelve_lead_interpretation", 45, 90, 135);
    add("pediatric_assessment", 60, 100, 150);
    add("trauma_assessment", 60, 120, 180);
    add("cpap_application", 90, 150, 240);
    t
}

// ── Wellness ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellnessThresholds {
    pub watch: f64,
    pub concern: f64,
    pub intervention: f64,
    pub critical: f64,
}

impl Default for WellnessThresholds {
    fn default() -> Self {
        Self {
            watch: 15.0,
            concern: 25.0,
            intervention: 40.0,
            critical: 60.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellnessConfig {
    pub incident_weights: BTreeMap<String, f64>,
    /// Weight applied to incident kinds missing from the table.
    pub default_incident_weight: f64,
    pub thresholds: WellnessThresholds,
}

impl Default for WellnessConfig {
    fn default() -> Self {
        let mut incident_weights = BTreeMap::new();
        incident_weights.insert("pediatric_death".to_string(), 10.0);
        incident_weights.insert("child_abuse".to_string(), 9.0);
        incident_weights.insert("mci".to_string(), 8.0);
        incident_weights.insert("suicide".to_string(), 7.0);
        incident_weights.insert("violent_trauma".to_string(), 5.0);
        incident_weights.insert("adult_death".to_string(), 3.0);
        Self {
            incident_weights,
            default_incident_weight: 1.0,
            thresholds: WellnessThresholds::default(),
        }
    }
}

// ── Demand ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayFactor {
    pub month: u32,
    pub day: u32,
    pub label: String,
    pub factor: f64,
}

/// Deterministic multiplier model for call-volume forecasting.
/// All arrays are Monday-first / January-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemandModel {
    pub base_calls: [f64; 7],
    pub day_of_week_factor: [f64; 7],
    pub seasonal_factor: [f64; 12],
    pub holidays: Vec<HolidayFactor>,
    pub calls_per_responder: f64,
    pub min_staff: u32,
}

impl Default for DemandModel {
    fn default() -> Self {
        Self {
            // Mon Tue Wed Thu Fri Sat Sun
            base_calls: [42.0, 40.0, 41.0, 43.0, 48.0, 52.0, 45.0],
            day_of_week_factor: [0.95, 0.92, 0.94, 0.98, 1.10, 1.15, 1.05],
            // Jan..Dec
            seasonal_factor: [
                1.05, 1.00, 0.95, 0.95, 1.00, 1.10, 1.15, 1.10, 1.00, 0.95, 1.00, 1.10,
            ],
            holidays: vec![
                HolidayFactor { month: 1, day: 1, label: "New Year's Day".into(), factor: 1.30 },
                HolidayFactor { month: 7, day: 4, label: "Independence Day".into(), factor: 1.40 },
                HolidayFactor { month: 10, day: 31, label: "Halloween".into(), factor: 1.25 },
                HolidayFactor { month: 12, day: 25, label: "Christmas Day".into(), factor: 1.20 },
                HolidayFactor { month: 12, day: 31, label: "New Year's Eve".into(), factor: 1.35 },
            ],
            calls_per_responder: 8.0,
            min_staff: 2,
        }
    }
}

// ── Top level ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub fatigue_weights: FatigueWeights,
    pub skill_decay: SkillDecayTable,
    pub wellness: WellnessConfig,
    pub demand: DemandModel,
}

impl EngineConfig {
    /// The shipped defaults, identical to the JSON files under `data/`.
    pub fn builtin() -> Self {
        Self {
            fatigue_weights: FatigueWeights::default(),
            skill_decay: builtin_skill_table(),
            wellness: WellnessConfig::default(),
            demand: DemandModel::default(),
        }
    }

    /// Load all four tables from `data_dir` and validate them.
    pub fn load(data_dir: &str) -> EngineResult<Self> {
        let fatigue: FatigueWeightsFile = read_json(&format!("{data_dir}/fatigue_weights.json"))?;
        let skills: SkillDecayFile = read_json(&format!("{data_dir}/skill_decay_thresholds.json"))?;
        let wellness: WellnessConfig = read_json(&format!("{data_dir}/wellness_exposure.json"))?;
        let demand: DemandModel = read_json(&format!("{data_dir}/demand_model.json"))?;

        let config = Self {
            fatigue_weights: fatigue.weights,
            skill_decay: skills.skills,
            wellness,
            demand,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> EngineResult<()> {
        let sum = self.fatigue_weights.sum();
        if (sum - 1.0).abs() > 1e-6 {
            return Err(EngineError::Config(format!(
                "fatigue weights must sum to 1.0, got {sum:.6}"
            )));
        }
        for (skill, t) in &self.skill_decay {
            if !(t.refresher_days < t.required_days && t.required_days < t.expired_days) {
                return Err(EngineError::Config(format!(
                    "decay thresholds for '{skill}' must be strictly ascending"
                )));
            }
        }
        let th = &self.wellness.thresholds;
        if !(th.watch < th.concern && th.concern < th.intervention && th.intervention < th.critical)
        {
            return Err(EngineError::Config(
                "wellness severity thresholds must be strictly ascending".into(),
            ));
        }
        if self.demand.calls_per_responder <= 0.0 {
            return Err(EngineError::Config(
                "calls_per_responder must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &str) -> EngineResult<T> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| EngineError::Config(format!("cannot read {path}: {e}")))?;
    Ok(serde_json::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_config_is_valid() {
        EngineConfig::builtin().validate().unwrap();
    }

    #[test]
    fn skewed_weights_rejected() {
        let mut config = EngineConfig::builtin();
        config.fatigue_weights.consecutive_hours = 0.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn inverted_decay_thresholds_rejected() {
        let mut config = EngineConfig::builtin();
        config.skill_decay.insert(
            "bad_skill".into(),
            SkillThresholds {
                refresher_days: 90,
                required_days: 60,
                expired_days: 120,
            },
        );
        assert!(config.validate().is_err());
    }
}
