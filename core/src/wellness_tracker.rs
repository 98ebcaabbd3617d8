//! Wellness exposure tracking.
//!
//! Accumulates a weighted critical-incident exposure score per person
//! over a rolling window and raises tiered alerts. Severity is a step
//! function of the score against four ascending thresholds; the boundary
//! value of each threshold lands in the higher tier.

use crate::{
    config::WellnessConfig,
    error::EngineResult,
    model::{RecoveryPlan, WellnessAlert, WellnessReport, WellnessSeverity},
    reader::RosterReader,
};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

pub const DEFAULT_WINDOW_DAYS: i64 = 30;

/// Exposure scores cap here; beyond it the tier is already critical.
const EXPOSURE_CAP: f64 = 100.0;

pub struct WellnessTracker<'a, R: RosterReader> {
    reader: &'a R,
    config: &'a WellnessConfig,
}

impl<'a, R: RosterReader> WellnessTracker<'a, R> {
    pub fn new(reader: &'a R, config: &'a WellnessConfig) -> Self {
        Self { reader, config }
    }

    /// Weighted exposure score over the trailing `days` window.
    pub fn wellness_report(
        &self,
        person_id: &str,
        reference_date: NaiveDate,
        days: i64,
    ) -> EngineResult<WellnessReport> {
        let from = reference_date - Duration::days(days - 1);
        let exposures = self
            .reader
            .incident_exposures(person_id, from, reference_date)?;

        let mut incident_counts: BTreeMap<String, u32> = BTreeMap::new();
        let mut exposure_score = 0.0;
        for kind in &exposures {
            *incident_counts.entry(kind.clone()).or_insert(0) += 1;
            exposure_score += self
                .config
                .incident_weights
                .get(kind)
                .copied()
                .unwrap_or(self.config.default_incident_weight);
        }
        exposure_score = exposure_score.min(EXPOSURE_CAP);

        let severity = self.severity(exposure_score);
        Ok(WellnessReport {
            person_id: person_id.to_string(),
            exposure_score,
            severity,
            recommendation: recommendation(severity).to_string(),
            incident_counts,
        })
    }

    /// One alert per active person at or above `min_severity`.
    pub fn wellness_alerts(
        &self,
        min_severity: WellnessSeverity,
        reference_date: NaiveDate,
    ) -> EngineResult<Vec<WellnessAlert>> {
        let mut alerts = Vec::new();
        for person in self.reader.active_personnel()? {
            let report =
                self.wellness_report(&person.person_id, reference_date, DEFAULT_WINDOW_DAYS)?;
            if report.severity < min_severity {
                continue;
            }
            let incident_count = report.incident_counts.values().sum();
            alerts.push(WellnessAlert {
                person_id: person.person_id,
                severity: report.severity,
                incident_count,
                recommendation: report.recommendation,
                auto_action_suggested: auto_action(report.severity).map(str::to_string),
            });
        }
        Ok(alerts)
    }

    /// Concrete schedule modification for the person's current severity.
    pub fn recovery_schedule(
        &self,
        person_id: &str,
        reference_date: NaiveDate,
    ) -> EngineResult<RecoveryPlan> {
        let report = self.wellness_report(person_id, reference_date, DEFAULT_WINDOW_DAYS)?;
        let (days_off, restrictions) = match report.severity {
            WellnessSeverity::Critical => (
                7,
                vec![
                    "no high-acuity shifts".to_string(),
                    "no pediatric calls".to_string(),
                    "no night shifts".to_string(),
                ],
            ),
            WellnessSeverity::Intervention => (
                3,
                vec![
                    "reduced hours".to_string(),
                    "no back-to-back shifts".to_string(),
                ],
            ),
            WellnessSeverity::Concern => (1, vec!["day-shift preference".to_string()]),
            WellnessSeverity::Watch | WellnessSeverity::Normal => (0, Vec::new()),
        };
        Ok(RecoveryPlan {
            person_id: person_id.to_string(),
            severity: report.severity,
            days_off,
            restrictions,
        })
    }

    fn severity(&self, exposure_score: f64) -> WellnessSeverity {
        let t = &self.config.thresholds;
        if exposure_score >= t.critical {
            WellnessSeverity::Critical
        } else if exposure_score >= t.intervention {
            WellnessSeverity::Intervention
        } else if exposure_score >= t.concern {
            WellnessSeverity::Concern
        } else if exposure_score >= t.watch {
            WellnessSeverity::Watch
        } else {
            WellnessSeverity::Normal
        }
    }
}

fn recommendation(severity: WellnessSeverity) -> &'static str {
    match severity {
        WellnessSeverity::Normal => "No action needed; routine wellness check at next review",
        WellnessSeverity::Watch => "Informal check-in with supervisor recommended",
        WellnessSeverity::Concern => "Offer peer-support session and review recent call mix",
        WellnessSeverity::Intervention => {
            "Schedule peer-support contact and reduce exposure to high-acuity calls"
        }
        WellnessSeverity::Critical => {
            "Immediate wellness referral; remove from high-acuity rotation"
        }
    }
}

/// Automatic actions are only suggested for the top two tiers.
fn auto_action(severity: WellnessSeverity) -> Option<&'static str> {
    match severity {
        WellnessSeverity::Intervention => Some("schedule peer-support check-in"),
        WellnessSeverity::Critical => Some("remove from high-acuity shifts pending review"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WellnessConfig;
    use crate::store::SqliteRoster;

    fn tracker_config() -> WellnessConfig {
        WellnessConfig::default()
    }

    #[test]
    fn severity_boundaries_are_exact() {
        let roster = SqliteRoster::in_memory().unwrap();
        let config = tracker_config();
        let tracker = WellnessTracker::new(&roster, &config);
        let cases = [
            (0.0, WellnessSeverity::Normal),
            (14.9, WellnessSeverity::Normal),
            (15.0, WellnessSeverity::Watch),
            (25.0, WellnessSeverity::Concern),
            (40.0, WellnessSeverity::Intervention),
            (60.0, WellnessSeverity::Critical),
            (100.0, WellnessSeverity::Critical),
        ];
        for (score, expected) in cases {
            assert_eq!(tracker.severity(score), expected, "score {score}");
        }
    }

    #[test]
    fn auto_actions_limited_to_top_tiers() {
        assert!(auto_action(WellnessSeverity::Normal).is_none());
        assert!(auto_action(WellnessSeverity::Watch).is_none());
        assert!(auto_action(WellnessSeverity::Concern).is_none());
        assert!(auto_action(WellnessSeverity::Intervention).is_some());
        assert!(auto_action(WellnessSeverity::Critical).is_some());
    }
}
