// ABOUTME: Canonical daily health record and its assembly from extractor outputs
// ABOUTME: Optional fields are omitted from the wire payload so upserts never clear stored values
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::extract::{
    BodyBatteryFields, HeartRateFields, SleepFields, StepFields, StressFields, SummaryFields,
};

/// One heart-rate sample: epoch-millisecond timestamp and beats per minute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HrSample {
    pub t: i64,
    pub hr: u32,
}

/// Canonical store-ready record for one (user, calendar date).
///
/// `user_id` and `date` form the natural key and are always present. Every
/// other field is optional and skipped during serialization when absent, so
/// a merge-write never overwrites a previously stored non-null column with
/// null. `hr_values` is the only nested field; it is persisted as structured
/// JSON rather than a scalar column.
#[derive(Debug, Clone, Serialize)]
pub struct DailyHealthRecord {
    pub user_id: Uuid,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_goal: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resting_hr: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_hr: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_hr: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hr_values: Option<Vec<HrSample>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_score: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_seconds: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_battery_high: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stress_avg: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories_active: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_meters: Option<u64>,
}

impl DailyHealthRecord {
    /// Merges the per-family extractor outputs over the `(user_id, date)`
    /// base. Each extractor owns a disjoint field set, so merge order does
    /// not matter; missing optional data never fails assembly.
    #[must_use]
    pub fn assemble(
        user_id: Uuid,
        date: NaiveDate,
        steps: StepFields,
        heart_rate: HeartRateFields,
        sleep: SleepFields,
        body_battery: BodyBatteryFields,
        stress: StressFields,
        summary: SummaryFields,
    ) -> Self {
        Self {
            user_id,
            date,
            steps: steps.steps,
            step_goal: steps.step_goal,
            resting_hr: heart_rate.resting_hr,
            avg_hr: heart_rate.avg_hr,
            max_hr: heart_rate.max_hr,
            hr_values: heart_rate.hr_values,
            sleep_score: sleep.sleep_score,
            sleep_seconds: sleep.sleep_seconds,
            body_battery_high: body_battery.body_battery_high,
            stress_avg: stress.stress_avg,
            calories_active: summary.calories_active,
            distance_meters: summary.distance_meters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract;
    use serde_json::json;

    fn base_key() -> (Uuid, NaiveDate) {
        (
            Uuid::nil(),
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        )
    }

    #[test]
    fn assemble_from_empty_extractions_keeps_only_the_natural_key() {
        let (user_id, date) = base_key();
        let record = DailyHealthRecord::assemble(
            user_id,
            date,
            extract::extract_steps(None),
            extract::extract_heart_rate(None),
            extract::extract_sleep(None),
            extract::extract_body_battery(None),
            extract::extract_stress(None),
            extract::extract_summary(None),
        );

        let value = serde_json::to_value(&record).unwrap();
        let map = value.as_object().unwrap();
        assert_eq!(map.len(), 2);
        assert!(map.contains_key("user_id"));
        assert_eq!(map["date"], json!("2025-06-01"));
    }

    #[test]
    fn float_source_values_serialize_as_integers() {
        let (user_id, date) = base_key();
        // Provider payloads routinely carry integer columns as floats.
        let raw = json!({ "totalSteps": 120.0, "dailyStepGoal": 8000.0 });
        let record = DailyHealthRecord::assemble(
            user_id,
            date,
            extract::extract_steps(Some(&raw)),
            extract::extract_heart_rate(None),
            extract::extract_sleep(None),
            extract::extract_body_battery(None),
            extract::extract_stress(None),
            extract::extract_summary(None),
        );

        assert_eq!(record.steps, Some(120));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["steps"], json!(120));
        assert!(value["steps"].is_u64());
    }

    #[test]
    fn hr_values_pass_through_as_structured_json() {
        let (user_id, date) = base_key();
        let raw = json!({ "heartRateValues": [[1000, 60], [2000, 72]] });
        let record = DailyHealthRecord::assemble(
            user_id,
            date,
            extract::extract_steps(None),
            extract::extract_heart_rate(Some(&raw)),
            extract::extract_sleep(None),
            extract::extract_body_battery(None),
            extract::extract_stress(None),
            extract::extract_summary(None),
        );

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value["hr_values"],
            json!([{ "t": 1000, "hr": 60 }, { "t": 2000, "hr": 72 }])
        );
    }

    #[test]
    fn absent_fields_are_omitted_not_null() {
        let (user_id, date) = base_key();
        let record = DailyHealthRecord::assemble(
            user_id,
            date,
            extract::extract_steps(Some(&json!({ "totalSteps": 5000 }))),
            extract::extract_heart_rate(None),
            extract::extract_sleep(None),
            extract::extract_body_battery(None),
            extract::extract_stress(None),
            extract::extract_summary(None),
        );

        let value = serde_json::to_value(&record).unwrap();
        let map = value.as_object().unwrap();
        // A re-run with distance missing must not send an explicit null that
        // would clear the stored column.
        assert!(!map.contains_key("distance_meters"));
        assert!(map.values().all(|v| !v.is_null()));
    }
}
