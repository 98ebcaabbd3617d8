//! Wellness exposure tracker integration tests.

use chrono::{Duration, NaiveDate};
use shiftsense_core::{
    model::WellnessSeverity, EngineConfig, ScoringEngine, SqliteRoster,
};

fn roster() -> SqliteRoster {
    let roster = SqliteRoster::in_memory().unwrap();
    roster.migrate().unwrap();
    roster
}

fn reference_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 4, 30).unwrap()
}

fn add_person(roster: &SqliteRoster, id: &str) {
    roster
        .insert_person(id, id, NaiveDate::from_ymd_opt(2021, 2, 1).unwrap(), true)
        .unwrap();
}

fn add_incidents(roster: &SqliteRoster, person: &str, kinds: &[&str]) {
    for (i, kind) in kinds.iter().enumerate() {
        roster
            .insert_incident_exposure(
                person,
                kind,
                reference_date() - Duration::days((i % 20) as i64),
            )
            .unwrap();
    }
}

/// The threshold boundary values are caller-facing contract: a score of
/// exactly 15 / 25 / 40 / 60 lands in the higher tier.
#[test]
fn severity_boundaries_map_upward() {
    let cases: [(&str, &[&str], f64, WellnessSeverity); 5] = [
        // 4 x adult_death = 12: below the watch line.
        ("p-normal", &["adult_death"; 4], 12.0, WellnessSeverity::Normal),
        // pediatric_death + violent_trauma = 15 exactly.
        (
            "p-watch",
            &["pediatric_death", "violent_trauma"],
            15.0,
            WellnessSeverity::Watch,
        ),
        // 2 x pediatric_death + violent_trauma = 25 exactly.
        (
            "p-concern",
            &["pediatric_death", "pediatric_death", "violent_trauma"],
            25.0,
            WellnessSeverity::Concern,
        ),
        // 4 x pediatric_death = 40 exactly.
        (
            "p-intervention",
            &["pediatric_death"; 4],
            40.0,
            WellnessSeverity::Intervention,
        ),
        // 6 x pediatric_death = 60 exactly.
        (
            "p-critical",
            &["pediatric_death"; 6],
            60.0,
            WellnessSeverity::Critical,
        ),
    ];

    for (person, kinds, expected_score, expected_severity) in cases {
        let roster = roster();
        add_person(&roster, person);
        add_incidents(&roster, person, kinds);
        let engine = ScoringEngine::new(&roster, EngineConfig::builtin());
        let report = engine.wellness_report(person, reference_date()).unwrap();
        assert_eq!(report.exposure_score, expected_score, "{person}");
        assert_eq!(report.severity, expected_severity, "{person}");
        assert!(!report.recommendation.is_empty());
    }
}

#[test]
fn incidents_outside_the_window_are_ignored() {
    let roster = roster();
    add_person(&roster, "p1");
    roster
        .insert_incident_exposure("p1", "pediatric_death", reference_date() - Duration::days(45))
        .unwrap();
    let engine = ScoringEngine::new(&roster, EngineConfig::builtin());

    let report = engine.wellness_report("p1", reference_date()).unwrap();
    assert_eq!(report.exposure_score, 0.0);
    assert_eq!(report.severity, WellnessSeverity::Normal);
    assert!(report.incident_counts.is_empty());
}

#[test]
fn unknown_incident_kinds_use_the_default_weight() {
    let roster = roster();
    add_person(&roster, "p1");
    add_incidents(&roster, "p1", &["vehicle_extrication"; 3]);
    let engine = ScoringEngine::new(&roster, EngineConfig::builtin());

    let report = engine.wellness_report("p1", reference_date()).unwrap();
    assert_eq!(report.exposure_score, 3.0);
    assert_eq!(report.incident_counts["vehicle_extrication"], 3);
}

#[test]
fn exposure_score_caps() {
    let roster = roster();
    add_person(&roster, "p1");
    add_incidents(&roster, "p1", &["pediatric_death"; 15]);
    let engine = ScoringEngine::new(&roster, EngineConfig::builtin());

    let report = engine.wellness_report("p1", reference_date()).unwrap();
    assert_eq!(report.exposure_score, 100.0);
    assert_eq!(report.severity, WellnessSeverity::Critical);
}

#[test]
fn alerts_filter_by_min_severity_and_suggest_auto_actions() {
    let roster = roster();
    add_person(&roster, "p-quiet");
    add_person(&roster, "p-watch");
    add_incidents(&roster, "p-watch", &["pediatric_death", "violent_trauma"]);
    add_person(&roster, "p-intervention");
    add_incidents(&roster, "p-intervention", &["pediatric_death"; 4]);
    add_person(&roster, "p-critical");
    add_incidents(&roster, "p-critical", &["pediatric_death"; 6]);

    let engine = ScoringEngine::new(&roster, EngineConfig::builtin());
    let alerts = engine
        .wellness_alerts(WellnessSeverity::Watch, reference_date())
        .unwrap();

    assert_eq!(alerts.len(), 3, "p-quiet stays below the alert line");
    let alert = |person: &str| alerts.iter().find(|a| a.person_id == person).unwrap();
    assert!(alert("p-watch").auto_action_suggested.is_none());
    assert!(alert("p-intervention")
        .auto_action_suggested
        .as_deref()
        .unwrap()
        .contains("peer-support"));
    assert!(alert("p-critical")
        .auto_action_suggested
        .as_deref()
        .unwrap()
        .contains("high-acuity"));
    assert_eq!(alert("p-intervention").incident_count, 4);

    // Raising the bar narrows the list.
    let critical_only = engine
        .wellness_alerts(WellnessSeverity::Critical, reference_date())
        .unwrap();
    assert_eq!(critical_only.len(), 1);
    assert_eq!(critical_only[0].person_id, "p-critical");
}

#[test]
fn recovery_schedule_scales_with_severity() {
    let cases: [(&str, &[&str], u32, usize); 4] = [
        ("p-critical", &["pediatric_death"; 6], 7, 3),
        ("p-intervention", &["pediatric_death"; 4], 3, 2),
        (
            "p-concern",
            &["pediatric_death", "pediatric_death", "violent_trauma"],
            1,
            1,
        ),
        ("p-normal", &[], 0, 0),
    ];
    for (person, kinds, expected_days_off, expected_restrictions) in cases {
        let roster = roster();
        add_person(&roster, person);
        add_incidents(&roster, person, kinds);
        let engine = ScoringEngine::new(&roster, EngineConfig::builtin());
        let plan = engine.recovery_schedule(person, reference_date()).unwrap();
        assert_eq!(plan.days_off, expected_days_off, "{person}");
        assert_eq!(plan.restrictions.len(), expected_restrictions, "{person}");
    }
}
