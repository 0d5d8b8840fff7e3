// ABOUTME: Per-day sync pipeline: fetch each metric family, assemble, write
// ABOUTME: Days run sequentially most-recent-first with a pause between days
//
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::time::Duration;

use chrono::{Duration as ChronoDuration, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::errors::SyncResult;
use crate::extract;
use crate::fetch::Fetcher;
use crate::models::DailyHealthRecord;
use crate::providers::WellnessProvider;
use crate::store::HealthStore;

/// Drives the daily sync: one provider, one store, one retry policy.
pub struct HealthSync<P, S> {
    provider: P,
    store: S,
    fetcher: Fetcher,
    user_id: Uuid,
    day_pause: Duration,
}

impl<P, S> HealthSync<P, S>
where
    P: WellnessProvider,
    S: HealthStore,
{
    #[must_use]
    pub const fn new(
        provider: P,
        store: S,
        fetcher: Fetcher,
        user_id: Uuid,
        day_pause: Duration,
    ) -> Self {
        Self {
            provider,
            store,
            fetcher,
            user_id,
            day_pause,
        }
    }

    /// Read access to the underlying store
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Builds the canonical record for one day from whichever metric fetches
    /// succeed and hands it to the store exactly once. Returns the write
    /// outcome.
    ///
    /// # Errors
    ///
    /// Only authentication failures escape; every other fetch problem
    /// degrades to absent fields, and write failures are reported as
    /// `Ok(false)`.
    pub async fn sync_day(&self, date: NaiveDate) -> SyncResult<bool> {
        info!(%date, "syncing day");

        let steps = self
            .fetcher
            .fetch("steps", || self.provider.steps(date))
            .await?;
        let heart_rate = self
            .fetcher
            .fetch("heart_rate", || self.provider.heart_rates(date))
            .await?;
        let sleep = self
            .fetcher
            .fetch("sleep", || self.provider.sleep(date))
            .await?;
        let body_battery = self
            .fetcher
            .fetch("body_battery", || self.provider.body_battery(date))
            .await?;
        let stress = self
            .fetcher
            .fetch("stress", || self.provider.stress(date))
            .await?;
        let summary = self
            .fetcher
            .fetch("daily_summary", || self.provider.daily_summary(date))
            .await?;

        let record = DailyHealthRecord::assemble(
            self.user_id,
            date,
            extract::extract_steps(steps.as_ref()),
            extract::extract_heart_rate(heart_rate.as_ref()),
            extract::extract_sleep(sleep.as_ref()),
            extract::extract_body_battery(body_battery.as_ref()),
            extract::extract_stress(stress.as_ref()),
            extract::extract_summary(summary.as_ref()),
        );

        Ok(self.store.upsert(&record).await)
    }

    /// Syncs `days` calendar days ending today, most recent first, pausing
    /// between days to bound the request rate.
    ///
    /// # Errors
    ///
    /// Aborts on the first authentication failure; a failed write only logs
    /// and the run continues with the next day.
    pub async fn run(&self, days: u32) -> SyncResult<()> {
        let today = Utc::now().date_naive();
        for offset in 0..days {
            let date = today - ChronoDuration::days(i64::from(offset));
            self.sync_day(date).await?;
            if offset + 1 < days {
                tokio::time::sleep(self.day_pause).await;
            }
        }
        Ok(())
    }
}
