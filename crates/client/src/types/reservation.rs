//! Reservation and waitlist bodies

use super::calendar::EventType;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Booking a slot or an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReservationRequest {
    pub comment: Option<String>,
    pub participants: u32,
}

impl CreateReservationRequest {
    /// Blank comments are sent as `null`, participants default to one
    pub fn new(comment: Option<String>, participants: Option<u32>) -> Self {
        Self {
            comment: comment.filter(|c| !c.is_empty()),
            participants: participants.filter(|p| *p > 0).unwrap_or(1),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationResult {
    pub reservation_id: Uuid,
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventReservationResult {
    pub event_id: Uuid,
    pub success: bool,
    pub message: String,
    pub slots_reserved: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistResult {
    pub entry_id: Uuid,
    pub position: u32,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReservation {
    pub id: Uuid,
    #[serde(default)]
    pub time_slot_id: Option<Uuid>,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    #[serde(default)]
    pub event_title: Option<String>,
    #[serde(default)]
    pub comment: Option<String>,
    pub participants: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEventReservation {
    pub event_id: Uuid,
    pub event_title: String,
    pub event_type: EventType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub comment: Option<String>,
    pub participants: u32,
    pub slots_count: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MyReservations {
    pub slots: Vec<UserReservation>,
    pub events: Vec<UserEventReservation>,
}
