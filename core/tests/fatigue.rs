//! Fatigue scorer integration tests over a seeded roster snapshot.

use chrono::{Duration, NaiveDate};
use shiftsense_core::{
    fatigue_scorer::week_start,
    model::{AssignmentStatus, RiskLevel},
    EngineConfig, ScoringEngine, SqliteRoster,
};

fn roster() -> SqliteRoster {
    let roster = SqliteRoster::in_memory().unwrap();
    roster.migrate().unwrap();
    roster
}

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 28).unwrap()
}

/// Insert one shift plus a completed assignment for `person`.
fn worked_shift(
    roster: &SqliteRoster,
    person: &str,
    day: NaiveDate,
    start_hour: u32,
    len_hours: i64,
    critical: bool,
) {
    let shift_id = format!("sh-{person}-{day}-{start_hour}");
    let start = day.and_hms_opt(start_hour, 0, 0).unwrap();
    roster
        .insert_shift(&shift_id, start, start + Duration::hours(len_hours), critical, &[], &[])
        .unwrap();
    roster
        .insert_assignment(
            &format!("as-{person}-{day}-{start_hour}"),
            person,
            &shift_id,
            AssignmentStatus::Completed,
        )
        .unwrap();
}

#[test]
fn empty_history_is_a_valid_rested_result() {
    let roster = roster();
    roster
        .insert_person("p1", "A", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), true)
        .unwrap();
    let engine = ScoringEngine::new(&roster, EngineConfig::builtin());

    let score = engine.fatigue_score("p1", reference_date()).unwrap();
    assert_eq!(score.overall_score, 0.0);
    assert_eq!(score.risk_level, RiskLevel::Low);
    assert_eq!(score.shifts_in_window, 0);
    for (name, value) in &score.factors {
        assert_eq!(*value, 0.0, "factor {name} should be zero with no data");
    }
}

/// Eight-hour days with rest breaks every fourth day score exactly zero.
#[test]
fn steady_eight_hour_days_score_zero() {
    let roster = roster();
    roster
        .insert_person("p1", "A", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), true)
        .unwrap();
    let reference = reference_date();
    // Work three days, rest one, counting back from the reference date.
    for offset in 0..14 {
        if offset % 4 == 3 {
            continue;
        }
        worked_shift(&roster, "p1", reference - Duration::days(offset), 8, 8, false);
    }
    let engine = ScoringEngine::new(&roster, EngineConfig::builtin());

    let score = engine.fatigue_score("p1", reference).unwrap();
    assert_eq!(score.overall_score, 0.0);
    assert_eq!(score.risk_level, RiskLevel::Low);
    // A zero score still reports how much data backed it.
    assert!(score.shifts_in_window > 0);
    // Rested means cleared for the same day.
    assert_eq!(score.next_safe_shift.unwrap().date(), reference);
}

/// Seven straight days of critical night work with doubled shifts and
/// overtime pushes every factor into the upper half and the composite
/// into the critical tier.
#[test]
fn hard_week_scores_critical() {
    let roster = roster();
    roster
        .insert_person("p1", "A", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), true)
        .unwrap();
    let reference = reference_date();
    for offset in 0..7 {
        let day = reference - Duration::days(offset);
        worked_shift(&roster, "p1", day, 19, 12, true);
        // Doubled day shifts on alternating days.
        if offset % 2 == 1 {
            worked_shift(&roster, "p1", day, 7, 8, true);
        }
    }
    roster
        .insert_weekly_overtime("p1", week_start(reference), 40.0, 10.0)
        .unwrap();
    let engine = ScoringEngine::new(&roster, EngineConfig::builtin());

    let score = engine.fatigue_score("p1", reference).unwrap();
    for (name, value) in &score.factors {
        assert!(
            *value > 50.0,
            "factor {name} should be in the upper half, got {value}"
        );
        assert!((0.0..=100.0).contains(value), "factor {name} out of bounds");
    }
    assert!((0.0..=100.0).contains(&score.overall_score));
    assert_eq!(score.risk_level, RiskLevel::Critical);
    assert!(
        score.next_safe_shift.unwrap().date() >= reference + Duration::days(3),
        "critical fatigue should push the next safe shift at least 3 days out"
    );
    assert!(!score.recommendations.is_empty());
}

/// All factors and the composite stay within [0,100] even under absurd
/// schedules.
#[test]
fn factor_bounds_hold_under_extremes() {
    let roster = roster();
    roster
        .insert_person("p1", "A", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), true)
        .unwrap();
    let reference = reference_date();
    // 14 straight days, two long critical shifts a day, wild start hours.
    for offset in 0..14 {
        let day = reference - Duration::days(offset);
        worked_shift(&roster, "p1", day, 21, 14, true);
        worked_shift(&roster, "p1", day, 5, 12, true);
    }
    roster
        .insert_weekly_overtime("p1", week_start(reference), 40.0, 60.0)
        .unwrap();
    let engine = ScoringEngine::new(&roster, EngineConfig::builtin());

    let score = engine.fatigue_score("p1", reference).unwrap();
    for (name, value) in &score.factors {
        assert!(
            (0.0..=100.0).contains(value),
            "factor {name} out of bounds: {value}"
        );
    }
    assert!((0.0..=100.0).contains(&score.overall_score));
    assert_eq!(score.risk_level, RiskLevel::Critical);
}

/// Adding daily hours while holding the schedule shape fixed never
/// lowers the consecutive-hours factor.
#[test]
fn longer_days_never_score_lower() {
    let reference = reference_date();
    let mut last = -1.0f64;
    for len_hours in [6i64, 8, 9, 10, 11, 12, 14, 16] {
        let roster = roster();
        roster
            .insert_person("p1", "A", NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(), true)
            .unwrap();
        for offset in 0..7 {
            worked_shift(&roster, "p1", reference - Duration::days(offset * 2), 8, len_hours, false);
        }
        let engine = ScoringEngine::new(&roster, EngineConfig::builtin());
        let score = engine.fatigue_score("p1", reference).unwrap();
        let factor = score.factors["consecutive_hours"];
        assert!(
            factor >= last,
            "consecutive_hours regressed at {len_hours}h: {factor} < {last}"
        );
        last = factor;
    }
}
