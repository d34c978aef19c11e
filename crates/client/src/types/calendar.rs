//! Calendar views

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Available,
    Full,
    Blocked,
    Past,
    BookingClosed,
}

impl SlotStatus {
    /// Whether the slot can be opened for booking or waitlisting
    pub fn is_bookable(self) -> bool {
        matches!(self, Self::Available | Self::Full)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    Course,
    Training,
    Workshop,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthView {
    /// `YYYY-MM`
    pub year_month: String,
    pub days: Vec<DaySummary>,
    #[serde(default)]
    pub events: Vec<EventSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DaySummary {
    pub date: NaiveDate,
    pub total_slots: u32,
    pub available_slots: u32,
    pub has_user_reservation: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekView {
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    pub days: Vec<WeekDay>,
    #[serde(default)]
    pub events: Vec<EventSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekDay {
    pub date: NaiveDate,
    #[serde(default)]
    pub slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayView {
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
    #[serde(default)]
    pub events: Vec<EventSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub id: Uuid,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    #[serde(default)]
    pub max_participants: Option<u32>,
    pub status: SlotStatus,
    pub is_user_registered: bool,
    #[serde(default)]
    pub event_title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlotDetail {
    pub id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub max_participants: u32,
    pub current_participants: u32,
    #[serde(default)]
    pub waitlist_count: u32,
    pub status: SlotStatus,
    pub is_user_registered: bool,
    #[serde(default)]
    pub is_user_on_waitlist: bool,
    #[serde(default)]
    pub waitlist_position: Option<u32>,
    #[serde(default)]
    pub event_id: Option<Uuid>,
    #[serde(default)]
    pub event_title: Option<String>,
    #[serde(default)]
    pub event_description: Option<String>,
    #[serde(default)]
    pub reservation_id: Option<Uuid>,
    #[serde(default)]
    pub waitlist_entry_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventSummary {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    pub event_type: EventType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_multi_day: bool,
    pub max_participants: u32,
    pub current_participants: u32,
    pub is_user_registered: bool,
    pub enrollment_open: bool,
}
