//! Back-office endpoints; the server rejects these for non-admin users

use super::NextStepClient;
use super::auth::encode_query_value;
use crate::error::ClientError;
use crate::types::{
    ActivityLog, CreateEventRequest, CreateTimeSlotRequest, EventDetail, EventParticipants,
    ReservationAdmin, SlotParticipants, TimeSlotAdmin, UpdateEventRequest, UpdateTimeSlotRequest,
    UserAdmin,
};
use chrono::NaiveDate;
use reqwest::Method;
use uuid::Uuid;

/// Default page size of the activity log
pub const ACTIVITY_LOG_PAGE_SIZE: u32 = 20;

impl NextStepClient {
    pub async fn create_slot(&self, request: &CreateTimeSlotRequest) -> Result<TimeSlotAdmin, ClientError> {
        self.send(Method::POST, "/admin/slots", request).await
    }

    pub async fn update_slot(
        &self,
        slot_id: Uuid,
        request: &UpdateTimeSlotRequest,
    ) -> Result<TimeSlotAdmin, ClientError> {
        self.send(Method::PUT, &format!("/admin/slots/{slot_id}"), request)
            .await
    }

    pub async fn block_slot(&self, slot_id: Uuid, reason: Option<&str>) -> Result<(), ClientError> {
        let path = match reason.filter(|r| !r.is_empty()) {
            Some(reason) => format!(
                "/admin/slots/{slot_id}/block?reason={}",
                encode_query_value(reason)
            ),
            None => format!("/admin/slots/{slot_id}/block"),
        };
        self.call(Method::POST, &path).await
    }

    pub async fn unblock_slot(&self, slot_id: Uuid) -> Result<(), ClientError> {
        self.call(Method::POST, &format!("/admin/slots/{slot_id}/unblock"))
            .await
    }

    pub async fn delete_slot(&self, slot_id: Uuid) -> Result<(), ClientError> {
        self.call(Method::DELETE, &format!("/admin/slots/{slot_id}"))
            .await
    }

    pub async fn slot_participants(&self, slot_id: Uuid) -> Result<SlotParticipants, ClientError> {
        self.get(&format!("/admin/slots/{slot_id}/participants"))
            .await
    }

    pub async fn create_event(&self, request: &CreateEventRequest) -> Result<EventDetail, ClientError> {
        self.send(Method::POST, "/admin/events", request).await
    }

    pub async fn update_event(
        &self,
        event_id: Uuid,
        request: &UpdateEventRequest,
    ) -> Result<EventDetail, ClientError> {
        self.send(Method::PUT, &format!("/admin/events/{event_id}"), request)
            .await
    }

    pub async fn delete_event(&self, event_id: Uuid) -> Result<(), ClientError> {
        self.call(Method::DELETE, &format!("/admin/events/{event_id}"))
            .await
    }

    pub async fn all_events(&self) -> Result<Vec<EventDetail>, ClientError> {
        self.get("/admin/events").await
    }

    pub async fn event_details(&self, event_id: Uuid) -> Result<EventDetail, ClientError> {
        self.get(&format!("/admin/events/{event_id}")).await
    }

    pub async fn event_participants(&self, event_id: Uuid) -> Result<EventParticipants, ClientError> {
        self.get(&format!("/admin/events/{event_id}/participants"))
            .await
    }

    pub async fn upcoming_reservations(&self) -> Result<Vec<ReservationAdmin>, ClientError> {
        self.get("/admin/reservations/upcoming").await
    }

    pub async fn past_reservations(&self) -> Result<Vec<ReservationAdmin>, ClientError> {
        self.get("/admin/reservations/past").await
    }

    pub async fn reservations_on(&self, date: NaiveDate) -> Result<Vec<ReservationAdmin>, ClientError> {
        self.get(&format!("/admin/reservations/date/{}", date.format("%Y-%m-%d")))
            .await
    }

    pub async fn all_users(&self) -> Result<Vec<UserAdmin>, ClientError> {
        self.get("/admin/users").await
    }

    pub async fn make_admin(&self, user_id: Uuid) -> Result<(), ClientError> {
        self.call(Method::POST, &format!("/admin/users/{user_id}/make-admin"))
            .await
    }

    pub async fn remove_admin(&self, user_id: Uuid) -> Result<(), ClientError> {
        self.call(Method::POST, &format!("/admin/users/{user_id}/remove-admin"))
            .await
    }

    pub async fn delete_user(&self, user_id: Uuid) -> Result<(), ClientError> {
        self.call(Method::DELETE, &format!("/admin/users/{user_id}"))
            .await
    }

    /// Most recent user actions, newest first
    pub async fn activity_logs(&self, page: u32, size: u32) -> Result<Vec<ActivityLog>, ClientError> {
        self.get(&format!("/admin/activity-logs?page={page}&size={size}"))
            .await
    }
}
