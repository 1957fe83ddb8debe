use async_trait::async_trait;
use chrono::Utc;
use rail_core::{
    BookingRecord, BookingRepository, BookingService, BookingStatus, CoreError,
    BookingRequest, PaymentConfirmation, RefundPolicy, RefundQuote, ServiceError,
};
use rail_shared::models::events::{
    BookingCancelledEvent, BookingConfirmedEvent, BookingReleasedEvent,
};
use rail_shared::{BookingEvent, Masked};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::app_config::FareConfig;
use crate::StoreError;

/// Ten-digit PNR derived from the booking id.
fn pnr_for(id: Uuid) -> String {
    format!("{:010}", id.as_u128() % 10_000_000_000)
}

/// Placeholder booking backend over a repository.
///
/// Every status change is published on the lifecycle channel. Sending with no
/// subscribers is not an error.
#[derive(Clone)]
pub struct StoreBookingService {
    repo: Arc<dyn BookingRepository>,
    events: broadcast::Sender<BookingEvent>,
}

fn unavailable(e: CoreError) -> ServiceError {
    ServiceError::Unavailable(e.to_string())
}

impl StoreBookingService {
    pub fn new(repo: Arc<dyn BookingRepository>, events: broadcast::Sender<BookingEvent>) -> Self {
        Self { repo, events }
    }

    pub fn repository(&self) -> &Arc<dyn BookingRepository> {
        &self.repo
    }

    fn publish(&self, event: BookingEvent) {
        let _ = self.events.send(event);
    }

    async fn confirmed_record(&self, booking_id: Uuid) -> Result<BookingRecord, StoreError> {
        let record = self
            .repo
            .get(booking_id)
            .await?
            .ok_or(StoreError::NotFound(booking_id))?;

        match record.booking.status {
            BookingStatus::Confirmed => Ok(record),
            status => Err(StoreError::NotCancellable {
                pnr: record.booking.pnr,
                status,
            }),
        }
    }

    /// Hold seats for a new provisional booking, priced with the configured surcharges.
    pub async fn create(
        &self,
        user_id: &str,
        request: BookingRequest,
        fares: &FareConfig,
    ) -> Result<BookingRecord, StoreError> {
        let id = Uuid::new_v4();
        let fare_details = fares.details(request.base_fare);
        let record = request.into_record(id, pnr_for(id), user_id, fare_details)?;
        self.repo.insert(record.clone()).await?;

        info!(
            user = %Masked(user_id),
            "Booking {} held for {} passengers, {} due",
            record.booking.pnr,
            record.passengers.len(),
            record.fare_details.breakdown().gross_fare
        );
        Ok(record)
    }

    /// What the traveller would get back for cancelling now.
    pub async fn refund_quote(&self, booking_id: Uuid, policy: &RefundPolicy) -> Result<RefundQuote, StoreError> {
        let record = self.confirmed_record(booking_id).await?;
        Ok(policy.quote(&record.fare_details))
    }

    /// Cancel a confirmed booking and settle its refund.
    pub async fn cancel(
        &self,
        booking_id: Uuid,
        policy: &RefundPolicy,
    ) -> Result<(BookingRecord, RefundQuote), StoreError> {
        let record = self.confirmed_record(booking_id).await?;
        let quote = policy.quote(&record.fare_details);

        let cancelled = self
            .repo
            .transition(booking_id, BookingStatus::Confirmed, BookingStatus::Cancelled)
            .await?
            .ok_or_else(|| StoreError::NotCancellable {
                pnr: record.booking.pnr.clone(),
                status: BookingStatus::Cancelled,
            })?;

        info!(
            "Booking {} cancelled, refunding {}",
            cancelled.booking.pnr, quote.refund_amount
        );
        self.publish(BookingEvent::Cancelled(BookingCancelledEvent {
            booking_id,
            pnr: cancelled.booking.pnr.clone(),
            refund_amount: quote.refund_amount.clone(),
            timestamp: Utc::now().timestamp(),
        }));

        Ok((cancelled, quote))
    }
}

#[async_trait]
impl BookingService for StoreBookingService {
    async fn confirm_payment(&self, booking_id: Uuid) -> Result<PaymentConfirmation, ServiceError> {
        let record = self
            .repo
            .get(booking_id)
            .await
            .map_err(unavailable)?
            .ok_or(ServiceError::NotFound(booking_id))?;

        if record.booking.status != BookingStatus::Provisional {
            warn!(
                "Payment for {} refused, booking is {}",
                record.booking.pnr, record.booking.status
            );
            return Ok(PaymentConfirmation::declined(format!(
                "Booking {} is already {}",
                record.booking.pnr,
                record.booking.status.as_str().to_lowercase()
            )));
        }

        let updated = self
            .repo
            .transition(booking_id, BookingStatus::Provisional, BookingStatus::Confirmed)
            .await
            .map_err(unavailable)?;

        let Some(confirmed) = updated else {
            return Ok(PaymentConfirmation::declined(
                "Booking changed while payment was processing",
            ));
        };

        info!(
            user = %Masked(confirmed.booking.user_id.as_str()),
            "Booking {} confirmed",
            confirmed.booking.pnr
        );
        self.publish(BookingEvent::Confirmed(BookingConfirmedEvent {
            booking_id,
            pnr: confirmed.booking.pnr.clone(),
            user_id: confirmed.booking.user_id.clone(),
            gross_fare: confirmed.fare_details.breakdown().gross_fare,
            timestamp: Utc::now().timestamp(),
        }));

        Ok(PaymentConfirmation::confirmed(
            confirmed.booking,
            confirmed.passengers,
            confirmed.fare_details,
        ))
    }

    async fn release_booking(&self, booking_id: Uuid) -> Result<(), ServiceError> {
        let released = self
            .repo
            .transition(booking_id, BookingStatus::Provisional, BookingStatus::Cancelled)
            .await
            .map_err(|e| match e {
                CoreError::NotFound(_) => ServiceError::NotFound(booking_id),
                other => unavailable(other),
            })?;

        match released {
            Some(record) => {
                info!("Provisional booking {} released", record.booking.pnr);
                self.publish(BookingEvent::Released(BookingReleasedEvent {
                    booking_id,
                    pnr: record.booking.pnr,
                    timestamp: Utc::now().timestamp(),
                }));
            }
            None => debug!("Release for {} ignored, booking is not provisional", booking_id),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking_repo::InMemoryBookingRepository;
    use crate::seed::{demo_booking_id, demo_records};
    use chrono::NaiveDate;
    use rail_core::FareDetails;

    fn service() -> (StoreBookingService, broadcast::Receiver<BookingEvent>) {
        let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();
        let repo = InMemoryBookingRepository::with_records(demo_records(today, |base| {
            FareDetails::new(base, 5.0, 2.0)
        }));
        let (tx, rx) = broadcast::channel(16);
        (StoreBookingService::new(Arc::new(repo), tx), rx)
    }

    fn confirmed_id() -> Uuid {
        Uuid::from_u128(0x4521873690)
    }

    #[tokio::test]
    async fn test_confirm_provisional_booking() {
        let (service, mut rx) = service();

        let answer = service.confirm_payment(demo_booking_id()).await.unwrap();

        assert!(answer.success);
        let booking = answer.booking.unwrap();
        assert_eq!(booking.status, BookingStatus::Confirmed);
        assert_eq!(answer.passengers.len(), 2);
        assert_eq!(answer.fare_details.unwrap().base_fare, 2450.0);

        match rx.try_recv().unwrap() {
            BookingEvent::Confirmed(e) => {
                assert_eq!(e.pnr, "8203948245");
                assert_eq!(e.gross_fare, "2621.50");
            }
            other => panic!("unexpected event {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_second_confirmation_is_declined() {
        let (service, _rx) = service();
        service.confirm_payment(demo_booking_id()).await.unwrap();

        let answer = service.confirm_payment(demo_booking_id()).await.unwrap();
        assert!(!answer.success);
        assert_eq!(answer.message.as_deref(), Some("Booking 8203948245 is already confirmed"));
    }

    #[tokio::test]
    async fn test_unknown_booking_is_not_found() {
        let (service, _rx) = service();
        let result = service.confirm_payment(Uuid::nil()).await;
        assert!(matches!(result, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_release_is_idempotent() {
        let (service, mut rx) = service();

        service.release_booking(demo_booking_id()).await.unwrap();
        service.release_booking(demo_booking_id()).await.unwrap();

        assert!(matches!(rx.try_recv().unwrap(), BookingEvent::Released(_)));
        assert!(rx.try_recv().is_err());
        let record = service.repository().get(demo_booking_id()).await.unwrap().unwrap();
        assert_eq!(record.booking.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_release_leaves_confirmed_booking_alone() {
        let (service, _rx) = service();
        service.release_booking(confirmed_id()).await.unwrap();

        let record = service.repository().get(confirmed_id()).await.unwrap().unwrap();
        assert_eq!(record.booking.status, BookingStatus::Confirmed);
    }

    #[tokio::test]
    async fn test_cancel_confirmed_booking_refunds() {
        let (service, mut rx) = service();
        let policy = RefundPolicy::default();

        let quote = service.refund_quote(confirmed_id(), &policy).await.unwrap();
        let (record, settled) = service.cancel(confirmed_id(), &policy).await.unwrap();

        assert_eq!(quote, settled);
        assert_eq!(record.booking.status, BookingStatus::Cancelled);
        match rx.try_recv().unwrap() {
            BookingEvent::Cancelled(e) => assert_eq!(e.refund_amount, settled.refund_amount),
            other => panic!("unexpected event {:?}", other),
        }

        let again = service.cancel(confirmed_id(), &policy).await;
        assert!(matches!(
            again,
            Err(StoreError::NotCancellable { status: BookingStatus::Cancelled, .. })
        ));
    }

    fn request(passengers: usize) -> BookingRequest {
        let traveller = serde_json::json!({ "name": "Asha Rao", "age": 34, "gender": "FEMALE", "category": "ADULT" });
        serde_json::from_value(serde_json::json!({
            "train_number": "12009",
            "train_name": "Ahmedabad Shatabdi",
            "journey_date": "2026-12-01",
            "source": "Mumbai Central",
            "destination": "Ahmedabad",
            "class_code": "CC",
            "departure": "06:20:00",
            "arrival": "12:45:00",
            "base_fare": 1000.0,
            "passengers": vec![traveller; passengers],
        }))
        .unwrap()
    }

    fn fares() -> FareConfig {
        FareConfig {
            gst_percent: 5.0,
            convenience_percent: 2.0,
        }
    }

    #[tokio::test]
    async fn test_create_holds_a_confirmable_booking() {
        let (service, mut rx) = service();

        let record = service.create("u-3003", request(2), &fares()).await.unwrap();
        assert_eq!(record.booking.status, BookingStatus::Provisional);
        assert_eq!(record.booking.pnr.len(), 10);
        assert_eq!(record.fare_details.breakdown().gross_fare, "1070.00");

        let stored = service.repository().find_by_pnr(&record.booking.pnr).await.unwrap().unwrap();
        assert_eq!(stored.booking.user_id, "u-3003");

        let answer = service.confirm_payment(record.booking.id).await.unwrap();
        assert!(answer.success);
        assert!(matches!(rx.try_recv().unwrap(), BookingEvent::Confirmed(_)));
    }

    #[tokio::test]
    async fn test_create_rejects_oversized_party() {
        let (service, _rx) = service();
        let result = service.create("u-3003", request(7), &fares()).await;
        assert!(matches!(result, Err(StoreError::Repository(CoreError::ValidationError(_)))));
        assert!(service.repository().list_for_user("u-3003").await.unwrap().is_empty());
    }

    #[test]
    fn test_pnr_is_ten_digits() {
        assert_eq!(pnr_for(Uuid::from_u128(42)), "0000000042");
        assert_eq!(pnr_for(Uuid::from_u128(12_345_678_901)), "2345678901");
    }

    #[tokio::test]
    async fn test_provisional_booking_cannot_be_cancelled() {
        let (service, _rx) = service();
        let result = service.cancel(demo_booking_id(), &RefundPolicy::default()).await;
        assert!(matches!(
            result,
            Err(StoreError::NotCancellable { status: BookingStatus::Provisional, .. })
        ));
    }
}
