//! Demand prediction.
//!
//! A deterministic multiplier model, not a learned one: per-weekday base
//! call volume scaled by day-of-week, seasonal, and holiday factors from
//! the configured tables. The same date against the same tables always
//! produces the same prediction.
//!
//! The shipped base-call table is a starting point; `calibrated` replaces
//! it with per-weekday averages from recorded call history where enough
//! samples exist.

use crate::{
    config::DemandModel,
    error::EngineResult,
    model::{DemandPrediction, StaffingPlan, WeeklyForecast},
    reader::RosterReader,
};
use chrono::{Datelike, Duration, NaiveDate};

/// Minimum history samples per weekday before calibration overrides the
/// configured baseline.
const MIN_SAMPLES_PER_WEEKDAY: usize = 4;

pub struct DemandPredictor {
    model: DemandModel,
}

impl DemandPredictor {
    pub fn new(model: DemandModel) -> Self {
        Self { model }
    }

    /// Build a predictor whose per-weekday baseline comes from recorded
    /// call history over `[from, to]`, falling back to the configured
    /// table for weekdays with thin history.
    pub fn calibrated<R: RosterReader>(
        mut model: DemandModel,
        reader: &R,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Self> {
        let history = reader.daily_call_counts(from, to)?;
        let mut sums = [0.0f64; 7];
        let mut counts = [0usize; 7];
        for (day, calls) in &history {
            let idx = day.weekday().num_days_from_monday() as usize;
            sums[idx] += *calls as f64;
            counts[idx] += 1;
        }
        for idx in 0..7 {
            if counts[idx] >= MIN_SAMPLES_PER_WEEKDAY {
                model.base_calls[idx] = sums[idx] / counts[idx] as f64;
            }
        }
        log::debug!(
            "demand baseline calibrated from {} history days",
            history.len()
        );
        Ok(Self { model })
    }

    pub fn predict_demand(&self, date: NaiveDate) -> DemandPrediction {
        let weekday = date.weekday().num_days_from_monday() as usize;
        let base = self.model.base_calls[weekday];
        let dow = self.model.day_of_week_factor[weekday];
        let seasonal = self.model.seasonal_factor[date.month0() as usize];
        let holiday = self
            .model
            .holidays
            .iter()
            .find(|h| h.month == date.month() && h.day == date.day());
        let holiday_factor = holiday.map(|h| h.factor).unwrap_or(1.0);

        let predicted_calls = base * dow * seasonal * holiday_factor;
        let recommended_staff = ((predicted_calls / self.model.calls_per_responder).floor()
            as u32)
            .max(self.model.min_staff);

        let mut factors = Vec::new();
        let mut confidence: f64 = 0.70;
        if dow != 1.0 {
            factors.push(format!("Day-of-week adjustment x{dow:.2}"));
            confidence += 0.05;
        }
        if seasonal != 1.0 {
            factors.push(format!("Seasonal adjustment x{seasonal:.2}"));
            confidence += 0.05;
        }
        if let Some(h) = holiday {
            factors.push(format!("Holiday adjustment x{:.2} ({})", h.factor, h.label));
            confidence += 0.05;
        }

        DemandPrediction {
            date,
            predicted_calls,
            confidence: confidence.min(0.95),
            recommended_staff,
            factors,
        }
    }

    /// Seven-day fold over `predict_demand` with peak/trough reporting.
    pub fn weekly_forecast(&self, start_date: NaiveDate) -> WeeklyForecast {
        let days: Vec<DemandPrediction> = (0..7)
            .map(|i| self.predict_demand(start_date + Duration::days(i)))
            .collect();
        let peak_day = days
            .iter()
            .max_by(|a, b| a.predicted_calls.total_cmp(&b.predicted_calls))
            .map(|d| d.date)
            .unwrap_or(start_date);
        let trough_day = days
            .iter()
            .min_by(|a, b| a.predicted_calls.total_cmp(&b.predicted_calls))
            .map(|d| d.date)
            .unwrap_or(start_date);
        let total_predicted_calls = days.iter().map(|d| d.predicted_calls).sum();
        WeeklyForecast {
            start_date,
            days,
            peak_day,
            trough_day,
            total_predicted_calls,
        }
    }

    /// Per-day staffing recommendation over an arbitrary range.
    pub fn staffing_plan(&self, start_date: NaiveDate, days: u32) -> StaffingPlan {
        let daily: Vec<DemandPrediction> = (0..days as i64)
            .map(|i| self.predict_demand(start_date + Duration::days(i)))
            .collect();
        let total_predicted_calls = daily.iter().map(|d| d.predicted_calls).sum();
        let total_staff_days = daily.iter().map(|d| d.recommended_staff).sum();
        let peak_day = daily
            .iter()
            .max_by(|a, b| a.predicted_calls.total_cmp(&b.predicted_calls))
            .map(|d| d.date)
            .unwrap_or(start_date);
        StaffingPlan {
            start_date,
            days: daily,
            total_predicted_calls,
            total_staff_days,
            peak_day,
        }
    }

    pub fn model(&self) -> &DemandModel {
        &self.model
    }
}
