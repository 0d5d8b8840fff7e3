// ABOUTME: Pure extractors mapping raw shape-polymorphic Garmin payloads to partial field sets
// ABOUTME: Every extractor tolerates absent or malformed data by returning an empty field set
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use serde_json::{Map, Value};

use crate::models::HrSample;

/// Raw provider payload, disambiguated by shape.
///
/// Garmin returns either an ordered sequence of per-sample objects or a
/// single aggregate object depending on the metric and API version.
/// Extraction logic dispatches on this tag explicitly.
#[derive(Debug, Clone, Copy)]
pub enum Payload<'a> {
    /// Ordered per-sample entries (15-minute buckets, `[timestamp, value]`
    /// pairs, etc.)
    Samples(&'a [Value]),
    /// A single aggregate object
    Aggregate(&'a Map<String, Value>),
}

impl<'a> Payload<'a> {
    /// Classifies a raw response. Nulls, empty arrays, and empty objects all
    /// count as "no data".
    #[must_use]
    pub fn classify(raw: Option<&'a Value>) -> Option<Self> {
        match raw? {
            Value::Array(items) if !items.is_empty() => Some(Self::Samples(items)),
            Value::Object(map) if !map.is_empty() => Some(Self::Aggregate(map)),
            _ => None,
        }
    }
}

/// Numeric coercion helpers for loosely-typed provider values.
///
/// Integer columns routinely arrive as floats; these truncate toward zero.
/// Negative values are rejected where the target type is unsigned: Garmin
/// uses negative sentinels (`-1`, `-2`) for "no reading", and a fabricated 0
/// would overwrite a previously stored real value on merge.
pub(crate) mod coerce {
    use serde_json::Value;

    #[allow(clippy::cast_possible_truncation)]
    pub fn as_i64(value: &Value) -> Option<i64> {
        value
            .as_i64()
            .or_else(|| value.as_f64().map(|f| f as i64))
    }

    pub fn as_u64(value: &Value) -> Option<u64> {
        as_i64(value).and_then(|v| u64::try_from(v).ok())
    }

    pub fn as_u32(value: &Value) -> Option<u32> {
        as_i64(value).and_then(|v| u32::try_from(v).ok())
    }
}

/// Daily step totals
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StepFields {
    pub steps: Option<u64>,
    pub step_goal: Option<u64>,
}

/// Daily heart-rate aggregates plus the filtered intraday sample series
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct HeartRateFields {
    pub resting_hr: Option<u32>,
    pub avg_hr: Option<u32>,
    pub max_hr: Option<u32>,
    pub hr_values: Option<Vec<HrSample>>,
}

/// Sleep score and duration
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SleepFields {
    pub sleep_score: Option<u32>,
    pub sleep_seconds: Option<u64>,
}

/// Daily body-battery high
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BodyBatteryFields {
    pub body_battery_high: Option<i64>,
}

/// Daily average stress
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct StressFields {
    pub stress_avg: Option<u32>,
}

/// Active calories and total distance from the daily summary
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SummaryFields {
    pub calories_active: Option<u64>,
    pub distance_meters: Option<u64>,
}

/// Extracts step totals. Sequence payloads are per-interval buckets whose
/// counts are summed (missing counts as zero) with the goal taken from the
/// first bucket; aggregate payloads carry the totals directly.
#[must_use]
pub fn extract_steps(raw: Option<&Value>) -> StepFields {
    let Some(payload) = Payload::classify(raw) else {
        return StepFields::default();
    };
    match payload {
        Payload::Samples(items) => {
            let total: u64 = items
                .iter()
                .map(|item| {
                    item.get("steps")
                        .and_then(coerce::as_u64)
                        .unwrap_or(0)
                })
                .sum();
            let goal = items
                .first()
                .and_then(|item| item.get("stepGoal"))
                .and_then(coerce::as_u64);
            StepFields {
                steps: Some(total),
                step_goal: goal,
            }
        }
        Payload::Aggregate(map) => StepFields {
            steps: map.get("totalSteps").and_then(coerce::as_u64),
            step_goal: map.get("dailyStepGoal").and_then(coerce::as_u64),
        },
    }
}

/// Extracts heart-rate aggregates and the intraday series.
///
/// `hr_values` keeps only well-formed `[timestamp, rate]` pairs with a
/// defined timestamp and a strictly positive rate; if no sample qualifies
/// the field is absent rather than an empty list. A sequence-shaped payload
/// carries no daily aggregates and is treated as no data.
#[must_use]
pub fn extract_heart_rate(raw: Option<&Value>) -> HeartRateFields {
    let Some(Payload::Aggregate(map)) = Payload::classify(raw) else {
        return HeartRateFields::default();
    };

    let hr_values = map
        .get("heartRateValues")
        .and_then(Value::as_array)
        .map(|values| hr_samples(values))
        .filter(|samples| !samples.is_empty());

    HeartRateFields {
        resting_hr: map.get("restingHeartRate").and_then(coerce::as_u32),
        avg_hr: map.get("averageHeartRate").and_then(coerce::as_u32),
        max_hr: map.get("maxHeartRate").and_then(coerce::as_u32),
        hr_values,
    }
}

fn hr_samples(values: &[Value]) -> Vec<HrSample> {
    values
        .iter()
        .filter_map(|value| {
            let pair = value.as_array()?;
            if pair.len() != 2 {
                return None;
            }
            let t = coerce::as_i64(&pair[0])?;
            let hr = coerce::as_i64(&pair[1])?;
            if hr <= 0 {
                return None;
            }
            Some(HrSample {
                t,
                hr: u32::try_from(hr).ok()?,
            })
        })
        .collect()
}

/// Extracts the sleep score and duration.
///
/// The summary may be nested one level under `dailySleepDTO` depending on
/// API version. The score is read only from `sleepScores.overall.value`;
/// when that path is absent the score stays unset, never guessed.
#[must_use]
pub fn extract_sleep(raw: Option<&Value>) -> SleepFields {
    let Some(Payload::Aggregate(map)) = Payload::classify(raw) else {
        return SleepFields::default();
    };
    let dto = map
        .get("dailySleepDTO")
        .and_then(Value::as_object)
        .filter(|nested| !nested.is_empty())
        .unwrap_or(map);

    let sleep_score = dto
        .get("sleepScores")
        .and_then(|scores| scores.get("overall"))
        .and_then(|overall| overall.get("value"))
        .and_then(coerce::as_u32);

    SleepFields {
        sleep_score,
        sleep_seconds: dto.get("sleepTimeSeconds").and_then(coerce::as_u64),
    }
}

/// Extracts the daily body-battery high.
///
/// Sequence payloads report charge per sample: the daily high is the maximum
/// `charged` value, falling back to `bodyBatteryLevel` when `charged` is
/// absent. Samples carrying neither field are skipped, so an all-empty list
/// degrades to absent. Aggregate payloads carry `charged` directly.
#[must_use]
pub fn extract_body_battery(raw: Option<&Value>) -> BodyBatteryFields {
    let Some(payload) = Payload::classify(raw) else {
        return BodyBatteryFields::default();
    };
    match payload {
        Payload::Samples(items) => {
            let high = items
                .iter()
                .filter_map(Value::as_object)
                .filter_map(|item| {
                    item.get("charged")
                        .and_then(coerce::as_i64)
                        .or_else(|| item.get("bodyBatteryLevel").and_then(coerce::as_i64))
                })
                .max();
            BodyBatteryFields {
                body_battery_high: high,
            }
        }
        Payload::Aggregate(map) => BodyBatteryFields {
            body_battery_high: map.get("charged").and_then(coerce::as_i64),
        },
    }
}

/// Extracts the daily average stress.
///
/// Sequence payloads are `[timestamp, value]` pairs; only non-negative
/// readings contribute (nulls and the negative "no reading" sentinels are
/// dropped) and the mean is rounded down. Aggregate payloads carry
/// `avgStressLevel` directly.
#[must_use]
pub fn extract_stress(raw: Option<&Value>) -> StressFields {
    let Some(payload) = Payload::classify(raw) else {
        return StressFields::default();
    };
    match payload {
        Payload::Samples(items) => {
            let readings: Vec<f64> = items
                .iter()
                .filter_map(|item| {
                    let reading = item.as_array()?.get(1)?.as_f64()?;
                    (reading >= 0.0).then_some(reading)
                })
                .collect();
            let stress_avg = (!readings.is_empty()).then(|| {
                let mean = readings.iter().sum::<f64>() / readings.len() as f64;
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                {
                    mean.floor() as u32
                }
            });
            StressFields { stress_avg }
        }
        Payload::Aggregate(map) => StressFields {
            stress_avg: map.get("avgStressLevel").and_then(coerce::as_u32),
        },
    }
}

/// Extracts active calories and total distance from the daily user summary.
///
/// Distance is reported upstream as a float; it is coerced to whole meters
/// and a computed zero is normalized to absent, since a literally
/// zero-distance day is indistinguishable from "no data" in the source.
#[must_use]
pub fn extract_summary(raw: Option<&Value>) -> SummaryFields {
    let Some(Payload::Aggregate(map)) = Payload::classify(raw) else {
        return SummaryFields::default();
    };
    SummaryFields {
        calories_active: map.get("activeKilocalories").and_then(coerce::as_u64),
        distance_meters: map
            .get("totalDistanceMeters")
            .and_then(coerce::as_u64)
            .filter(|&meters| meters > 0),
    }
}
