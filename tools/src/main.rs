//! report-runner: headless report CLI for the shiftsense scoring engine.
//!
//! Usage:
//!   report-runner --seed-demo --date 2026-07-10 --fatigue p-001
//!   report-runner --db roster.db --date 2026-07-10 --wellness
//!   report-runner --data-dir ./data --date 2026-07-06 --forecast

use anyhow::{bail, Result};
use chrono::{Duration, NaiveDate};
use shiftsense_core::{
    model::{AssignmentStatus, AvailabilityKind, WellnessSeverity},
    swap_matcher::SUGGESTED_SCORE_FLOOR,
    EngineConfig, ScoringEngine, SqliteRoster,
};
use std::env;

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let db = flag_value(&args, "--db");
    let data_dir = flag_value(&args, "--data-dir");
    let date = flag_value(&args, "--date");
    let seed_demo = args.iter().any(|a| a == "--seed-demo");

    let roster = match db {
        Some(path) => SqliteRoster::open(path)?,
        None => SqliteRoster::in_memory()?,
    };
    roster.migrate()?;

    let config = match data_dir {
        Some(dir) => EngineConfig::load(dir)?,
        None => EngineConfig::builtin(),
    };

    let reference_date = match date {
        Some(d) => NaiveDate::parse_from_str(d, "%Y-%m-%d")
            .map_err(|e| anyhow::anyhow!("bad --date '{d}': {e}"))?,
        None => bail!("--date YYYY-MM-DD is required"),
    };

    if seed_demo || db.is_none() {
        seed_demo_roster(&roster, reference_date)?;
        log::info!("demo roster seeded around {reference_date}");
    }

    let engine = ScoringEngine::new(&roster, config);

    if let Some(person) = flag_value(&args, "--fatigue") {
        let score = engine.fatigue_score(person, reference_date)?;
        println!("{}", serde_json::to_string_pretty(&score)?);
    } else if let Some(person) = flag_value(&args, "--skills") {
        let reports = engine.skill_decay_report(person, reference_date, None)?;
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else if let Some(assignment) = flag_value(&args, "--swaps") {
        let matches = engine.find_swap_matches(assignment, 10)?;
        // Conventional floor: don't surface matches the composing service
        // would drop anyway.
        let surfaced: Vec<_> = matches
            .into_iter()
            .filter(|m| m.compatibility_score > SUGGESTED_SCORE_FLOOR)
            .collect();
        println!("{}", serde_json::to_string_pretty(&surfaced)?);
    } else if args.iter().any(|a| a == "--wellness") {
        let alerts = engine.wellness_alerts(WellnessSeverity::Watch, reference_date)?;
        println!("{}", serde_json::to_string_pretty(&alerts)?);
    } else if let Some(shift) = flag_value(&args, "--pairs") {
        let pairs = engine.find_optimal_pairs(shift, 2)?;
        println!("{}", serde_json::to_string_pretty(&pairs)?);
    } else if args.iter().any(|a| a == "--forecast") {
        let forecast = engine.weekly_forecast(reference_date);
        println!("{}", serde_json::to_string_pretty(&forecast)?);
    } else {
        bail!(
            "pick a report: --fatigue PERSON | --skills PERSON | --swaps ASSIGNMENT \
             | --wellness | --pairs SHIFT | --forecast"
        );
    }

    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a String> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| &w[1])
}

/// A small fixed roster so every report has something to chew on.
fn seed_demo_roster(roster: &SqliteRoster, reference_date: NaiveDate) -> Result<()> {
    let hire = |y: i64| reference_date - Duration::days(y * 365);
    roster.insert_person("p-001", "Alex Ray", hire(8), true)?;
    roster.insert_person("p-002", "Jordan Kim", hire(5), true)?;
    roster.insert_person("p-003", "Sam Ortiz", hire(2), true)?;
    roster.insert_person("p-004", "Riley Chen", hire(1), true)?;

    // p-001 has been run hard: nightly 12h critical shifts for a week.
    for i in 0..7 {
        let day = reference_date - Duration::days(i);
        let shift_id = format!("sh-night-{i}");
        let start = day.and_hms_opt(19, 0, 0).unwrap();
        roster.insert_shift(&shift_id, start, start + Duration::hours(12), true, &[], &[])?;
        roster.insert_assignment(
            &format!("as-night-{i}"),
            "p-001",
            &shift_id,
            AssignmentStatus::Completed,
        )?;
    }

    // A staffed day shift to swap out of and pair on.
    let day_shift_start = (reference_date + Duration::days(2)).and_hms_opt(7, 0, 0).unwrap();
    roster.insert_shift(
        "sh-day-1",
        day_shift_start,
        day_shift_start + Duration::hours(12),
        false,
        &["advanced_airway", "iv_access"],
        &["paramedic"],
    )?;
    for (i, person) in ["p-001", "p-002", "p-003", "p-004"].iter().enumerate() {
        roster.insert_assignment(
            &format!("as-day-{i}"),
            person,
            "sh-day-1",
            AssignmentStatus::Confirmed,
        )?;
    }

    for person in ["p-002", "p-003", "p-004"] {
        roster.insert_certification(
            person,
            "paramedic",
            reference_date - Duration::days(365),
            reference_date + Duration::days(365),
        )?;
    }
    roster.insert_availability(
        "p-002",
        reference_date + Duration::days(2),
        AvailabilityKind::Preferred,
    )?;
    roster.insert_skill_use("p-002", "advanced_airway", reference_date - Duration::days(10))?;
    roster.insert_skill_use("p-002", "iv_access", reference_date - Duration::days(5))?;
    roster.insert_skill_use("p-003", "iv_access", reference_date - Duration::days(80))?;

    roster.insert_weekly_overtime(
        "p-001",
        shiftsense_core::fatigue_scorer::week_start(reference_date),
        40.0,
        10.0,
    )?;

    roster.insert_incident_exposure("p-001", "pediatric_death", reference_date - Duration::days(3))?;
    roster.insert_incident_exposure("p-001", "mci", reference_date - Duration::days(9))?;
    roster.insert_incident_exposure("p-002", "adult_death", reference_date - Duration::days(12))?;

    for i in 0..28 {
        let day = reference_date - Duration::days(i + 1);
        roster.insert_call_volume(day, 38 + (i % 9) as u32)?;
    }
    Ok(())
}
