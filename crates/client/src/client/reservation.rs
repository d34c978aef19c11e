//! Reservation and waitlist endpoints

use super::NextStepClient;
use crate::error::ClientError;
use crate::types::{
    CreateReservationRequest, EventReservationResult, MyReservations, ReservationResult,
    UserReservation, WaitlistResult,
};
use reqwest::Method;
use uuid::Uuid;

impl NextStepClient {
    /// Book places on a slot; `participants` defaults to one
    pub async fn reserve_slot(
        &self,
        slot_id: Uuid,
        comment: Option<String>,
        participants: Option<u32>,
    ) -> Result<ReservationResult, ClientError> {
        let request = CreateReservationRequest::new(comment, participants);
        self.send(Method::POST, &format!("/reservations/slot/{slot_id}"), &request)
            .await
    }

    pub async fn cancel_reservation(&self, reservation_id: Uuid) -> Result<(), ClientError> {
        self.call(Method::DELETE, &format!("/reservations/{reservation_id}"))
            .await
    }

    pub async fn my_reservations(&self) -> Result<Vec<UserReservation>, ClientError> {
        self.get("/reservations/my").await
    }

    pub async fn my_upcoming_reservations(&self) -> Result<MyReservations, ClientError> {
        self.get("/reservations/my/upcoming").await
    }

    pub async fn my_past_reservations(&self) -> Result<MyReservations, ClientError> {
        self.get("/reservations/my/past").await
    }

    /// Book places on every slot of an event
    pub async fn reserve_event(
        &self,
        event_id: Uuid,
        comment: Option<String>,
        participants: Option<u32>,
    ) -> Result<EventReservationResult, ClientError> {
        let request = CreateReservationRequest::new(comment, participants);
        self.send(Method::POST, &format!("/reservations/event/{event_id}"), &request)
            .await
    }

    pub async fn cancel_event_reservation(&self, event_id: Uuid) -> Result<(), ClientError> {
        self.call(Method::DELETE, &format!("/reservations/event/{event_id}"))
            .await
    }

    /// Queue for a full slot
    pub async fn join_waitlist(&self, slot_id: Uuid) -> Result<WaitlistResult, ClientError> {
        self.call(Method::POST, &format!("/reservations/waitlist/slot/{slot_id}"))
            .await
    }

    pub async fn leave_waitlist(&self, entry_id: Uuid) -> Result<(), ClientError> {
        self.call(Method::DELETE, &format!("/reservations/waitlist/{entry_id}"))
            .await
    }
}
