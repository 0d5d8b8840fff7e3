// ABOUTME: Garmin Connect wellness API client over a shared reqwest client
// ABOUTME: Maps 401/403 responses to the distinguished fatal authentication error
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::WellnessProvider;
use crate::config::GarminConfig;
use crate::errors::{SyncError, SyncResult};

/// Garmin Connect client for the per-day wellness endpoints.
///
/// The session token is minted by an external login step and handed in via
/// [`GarminConfig`]; this client only consumes it and never refreshes
/// credentials. The `reqwest::Client` is shared and reused across all
/// requests in a run.
pub struct GarminClient {
    config: GarminConfig,
    client: Client,
}

impl GarminClient {
    #[must_use]
    pub const fn new(config: GarminConfig, client: Client) -> Self {
        Self { config, client }
    }

    async fn get_json(&self, endpoint: &str) -> SyncResult<Value> {
        let url = format!(
            "{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        );
        debug!(%url, "Garmin API request");

        let response = self
            .client
            .get(&url)
            .header(
                "Authorization",
                format!("Bearer {}", self.config.access_token),
            )
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SyncError::Authentication(format!(
                "Garmin rejected the session token ({status})"
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SyncError::Provider(format!(
                "Garmin request to {endpoint} failed with status {status}: {body}"
            )));
        }

        Ok(response.json().await?)
    }
}

// Endpoint paths follow the Garmin Connect wellness API as exercised by
// python-garminconnect.
#[async_trait]
impl WellnessProvider for GarminClient {
    async fn steps(&self, date: NaiveDate) -> SyncResult<Value> {
        self.get_json(&format!(
            "wellness-service/wellness/dailySummaryChart/{}?date={date}",
            self.config.display_name
        ))
        .await
    }

    async fn heart_rates(&self, date: NaiveDate) -> SyncResult<Value> {
        self.get_json(&format!(
            "wellness-service/wellness/dailyHeartRate/{}?date={date}",
            self.config.display_name
        ))
        .await
    }

    async fn sleep(&self, date: NaiveDate) -> SyncResult<Value> {
        self.get_json(&format!(
            "wellness-service/wellness/dailySleepData/{}?date={date}&nonSleepBufferMinutes=60",
            self.config.display_name
        ))
        .await
    }

    async fn body_battery(&self, date: NaiveDate) -> SyncResult<Value> {
        self.get_json(&format!(
            "wellness-service/wellness/bodyBattery/reports/daily?startDate={date}&endDate={date}"
        ))
        .await
    }

    async fn stress(&self, date: NaiveDate) -> SyncResult<Value> {
        self.get_json(&format!("wellness-service/wellness/dailyStress/{date}"))
            .await
    }

    async fn daily_summary(&self, date: NaiveDate) -> SyncResult<Value> {
        self.get_json(&format!(
            "usersummary-service/usersummary/daily/{}?calendarDate={date}",
            self.config.display_name
        ))
        .await
    }
}
