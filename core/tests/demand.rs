//! Demand predictor integration tests: the multiplier pipeline, staffing
//! floor, and history calibration.

use chrono::{Duration, NaiveDate};
use shiftsense_core::{
    demand_predictor::DemandPredictor, EngineConfig, ScoringEngine, SqliteRoster,
};

fn roster() -> SqliteRoster {
    let roster = SqliteRoster::in_memory().unwrap();
    roster.migrate().unwrap();
    roster
}

#[test]
fn prediction_is_deterministic() {
    let roster = roster();
    let engine = ScoringEngine::new(&roster, EngineConfig::builtin());
    let date = NaiveDate::from_ymd_opt(2026, 9, 14).unwrap();

    let first = serde_json::to_string(&engine.predict_demand(date)).unwrap();
    let second = serde_json::to_string(&engine.predict_demand(date)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn holiday_stacks_on_weekend_and_season() {
    let roster = roster();
    let engine = ScoringEngine::new(&roster, EngineConfig::builtin());

    // July 4 2026 is a Saturday: base 52, weekend 1.15, July 1.15,
    // holiday 1.40.
    let fourth = engine.predict_demand(NaiveDate::from_ymd_opt(2026, 7, 4).unwrap());
    assert!((fourth.predicted_calls - 52.0 * 1.15 * 1.15 * 1.40).abs() < 1e-6);
    assert_eq!(fourth.recommended_staff, 12);
    assert_eq!(fourth.factors.len(), 3);
    assert!(fourth
        .factors
        .iter()
        .any(|f| f.contains("Holiday adjustment") && f.contains("Independence Day")));

    // An ordinary July Tuesday sees only two adjustments.
    let tuesday = engine.predict_demand(NaiveDate::from_ymd_opt(2026, 7, 7).unwrap());
    assert!((tuesday.predicted_calls - 40.0 * 0.92 * 1.15).abs() < 1e-6);
    assert_eq!(tuesday.factors.len(), 2);
    assert!((tuesday.confidence - 0.80).abs() < 1e-9);
    assert!(fourth.predicted_calls > tuesday.predicted_calls);
}

#[test]
fn staffing_never_drops_below_the_floor() {
    let roster = roster();
    let mut config = EngineConfig::builtin();
    config.demand.base_calls = [5.0; 7];
    let engine = ScoringEngine::new(&roster, config);

    // 5 calls scaled by sub-1.0 factors floors to 0 responders.
    let prediction = engine.predict_demand(NaiveDate::from_ymd_opt(2026, 3, 3).unwrap());
    assert_eq!(prediction.recommended_staff, 2);
}

#[test]
fn weekly_forecast_is_internally_consistent() {
    let roster = roster();
    let engine = ScoringEngine::new(&roster, EngineConfig::builtin());
    // Monday June 29 through Sunday July 5: the holiday Saturday peaks.
    let start = NaiveDate::from_ymd_opt(2026, 6, 29).unwrap();

    let forecast = engine.weekly_forecast(start);
    assert_eq!(forecast.days.len(), 7);
    assert_eq!(forecast.days[0].date, start);
    assert_eq!(forecast.peak_day, NaiveDate::from_ymd_opt(2026, 7, 4).unwrap());

    let summed: f64 = forecast.days.iter().map(|d| d.predicted_calls).sum();
    assert!((forecast.total_predicted_calls - summed).abs() < 1e-9);

    let peak = forecast
        .days
        .iter()
        .find(|d| d.date == forecast.peak_day)
        .unwrap();
    let trough = forecast
        .days
        .iter()
        .find(|d| d.date == forecast.trough_day)
        .unwrap();
    assert!(peak.predicted_calls >= trough.predicted_calls);
}

#[test]
fn staffing_plan_totals_add_up() {
    let roster = roster();
    let engine = ScoringEngine::new(&roster, EngineConfig::builtin());
    let start = NaiveDate::from_ymd_opt(2026, 8, 1).unwrap();

    let plan = engine.staffing_plan(start, 14);
    assert_eq!(plan.days.len(), 14);
    assert_eq!(plan.days[13].date, start + Duration::days(13));
    let staff_sum: u32 = plan.days.iter().map(|d| d.recommended_staff).sum();
    assert_eq!(plan.total_staff_days, staff_sum);
    let call_sum: f64 = plan.days.iter().map(|d| d.predicted_calls).sum();
    assert!((plan.total_predicted_calls - call_sum).abs() < 1e-9);
}

#[test]
fn calibration_replaces_only_well_sampled_weekdays() {
    let roster = roster();
    // Four consecutive Mondays at 80 calls; no other history.
    for week in 0..4 {
        roster
            .insert_call_volume(
                NaiveDate::from_ymd_opt(2026, 6, 1).unwrap() + Duration::days(week * 7),
                80,
            )
            .unwrap();
    }
    let config = EngineConfig::builtin();
    let predictor = DemandPredictor::calibrated(
        config.demand.clone(),
        &roster,
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap(),
        NaiveDate::from_ymd_opt(2026, 6, 28).unwrap(),
    )
    .unwrap();

    // Monday July 6: calibrated base 80, Monday 0.95, July 1.15.
    let monday = predictor.predict_demand(NaiveDate::from_ymd_opt(2026, 7, 6).unwrap());
    assert!((monday.predicted_calls - 80.0 * 0.95 * 1.15).abs() < 1e-6);
    assert!((predictor.model().base_calls[0] - 80.0).abs() < 1e-9);

    // Tuesday keeps the shipped baseline of 40.
    let tuesday = predictor.predict_demand(NaiveDate::from_ymd_opt(2026, 7, 7).unwrap());
    assert!((tuesday.predicted_calls - 40.0 * 0.92 * 1.15).abs() < 1e-6);
}
