//! Calendar endpoints

use super::NextStepClient;
use crate::error::ClientError;
use crate::types::{DayView, EventSummary, MonthView, TimeSlotDetail, WeekView};
use chrono::NaiveDate;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";

impl NextStepClient {
    /// Month overview; `year_month` is `YYYY-MM`
    pub async fn month_view(&self, year_month: &str) -> Result<MonthView, ClientError> {
        self.get(&format!("/calendar/month/{year_month}")).await
    }

    /// Week grid starting at `monday`
    pub async fn week_view(&self, monday: NaiveDate) -> Result<WeekView, ClientError> {
        self.get(&format!("/calendar/week/{}", monday.format(DATE_FORMAT)))
            .await
    }

    pub async fn day_view(&self, date: NaiveDate) -> Result<DayView, ClientError> {
        self.get(&format!("/calendar/day/{}", date.format(DATE_FORMAT)))
            .await
    }

    pub async fn slot_details(&self, slot_id: Uuid) -> Result<TimeSlotDetail, ClientError> {
        self.get(&format!("/calendar/slot/{slot_id}")).await
    }

    pub async fn event_summary(&self, event_id: Uuid) -> Result<EventSummary, ClientError> {
        self.get(&format!("/calendar/event/{event_id}")).await
    }
}
