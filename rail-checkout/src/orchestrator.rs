use rail_core::{BookingRecord, BookingService, BookingStatus, PaymentConfirmation, ServiceError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{mpsc, Notify};
use uuid::Uuid;

const DEFAULT_DECLINE_MESSAGE: &str = "Payment could not be confirmed. Please try again.";

/// Why a confirmation attempt did not produce a confirmed booking
#[derive(Debug, thiserror::Error)]
pub enum ConfirmationFailure {
    #[error("{0}")]
    Declined(String),

    #[error("booking service error: {0}")]
    Transport(#[from] ServiceError),

    #[error("confirmation response incomplete: {0}")]
    Incomplete(String),
}

impl ConfirmationFailure {
    /// Text shown to the traveller. Transport details stay in the logs.
    pub fn user_message(&self) -> String {
        match self {
            ConfirmationFailure::Declined(message) => message.clone(),
            ConfirmationFailure::Transport(_) | ConfirmationFailure::Incomplete(_) => {
                DEFAULT_DECLINE_MESSAGE.to_string()
            }
        }
    }
}

/// Turns the raw confirmation contract into a confirmed record or a failure.
pub struct ConfirmationOrchestrator {
    service: Arc<dyn BookingService>,
}

impl ConfirmationOrchestrator {
    pub fn new(service: Arc<dyn BookingService>) -> Self {
        Self { service }
    }

    pub async fn confirm(&self, booking_id: Uuid) -> Result<BookingRecord, ConfirmationFailure> {
        let answer = self.service.confirm_payment(booking_id).await?;

        if !answer.success {
            let message = answer
                .message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DECLINE_MESSAGE.to_string());
            return Err(ConfirmationFailure::Declined(message));
        }

        let PaymentConfirmation { booking, passengers, fare_details, .. } = answer;
        let booking = booking.ok_or_else(|| ConfirmationFailure::Incomplete("booking missing".to_string()))?;
        let fare_details =
            fare_details.ok_or_else(|| ConfirmationFailure::Incomplete("fare details missing".to_string()))?;

        if booking.id != booking_id {
            return Err(ConfirmationFailure::Incomplete(format!(
                "confirmed booking {} does not match {}",
                booking.id, booking_id
            )));
        }
        booking
            .validate(&passengers)
            .map_err(|e| ConfirmationFailure::Incomplete(e.to_string()))?;

        Ok(BookingRecord {
            booking,
            passengers,
            fare_details,
        })
    }
}

/// Scripted answers for [`MockBookingService`]
#[derive(Debug, Clone)]
pub enum MockAnswer {
    Confirm,
    Decline(String),
    Unavailable(String),
}

/// In-process stand-in for the booking service. Confirms by default; releases
/// are forwarded to the receiver returned from [`MockBookingService::new`].
pub struct MockBookingService {
    record: Mutex<Option<BookingRecord>>,
    script: Mutex<VecDeque<MockAnswer>>,
    confirm_calls: AtomicUsize,
    /// When set, `confirm_payment` answers only after the gate is notified
    gate: Option<Arc<Notify>>,
    release_tx: mpsc::UnboundedSender<Uuid>,
}

impl MockBookingService {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Uuid>) {
        let (release_tx, release_rx) = mpsc::unbounded_channel();
        let service = Self {
            record: Mutex::new(None),
            script: Mutex::new(VecDeque::new()),
            confirm_calls: AtomicUsize::new(0),
            gate: None,
            release_tx,
        };
        (service, release_rx)
    }

    pub fn with_record(self, record: BookingRecord) -> Self {
        *self.record.lock().unwrap_or_else(|e| e.into_inner()) = Some(record);
        self
    }

    /// Hold every confirmation until `gate` is notified.
    pub fn with_gate(mut self, gate: Arc<Notify>) -> Self {
        self.gate = Some(gate);
        self
    }

    /// Queue the answer for the next `confirm_payment` call
    pub fn push_answer(&self, answer: MockAnswer) {
        self.script.lock().unwrap_or_else(|e| e.into_inner()).push_back(answer);
    }

    pub fn confirm_calls(&self) -> usize {
        self.confirm_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl BookingService for MockBookingService {
    async fn confirm_payment(&self, booking_id: Uuid) -> Result<PaymentConfirmation, ServiceError> {
        self.confirm_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        let answer = self
            .script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(MockAnswer::Confirm);

        match answer {
            MockAnswer::Decline(message) => Ok(PaymentConfirmation::declined(message)),
            MockAnswer::Unavailable(reason) => Err(ServiceError::Unavailable(reason)),
            MockAnswer::Confirm => {
                let record = self
                    .record
                    .lock()
                    .unwrap_or_else(|e| e.into_inner())
                    .clone()
                    .filter(|r| r.booking.id == booking_id)
                    .ok_or(ServiceError::NotFound(booking_id))?;

                let mut booking = record.booking;
                booking.status = BookingStatus::Confirmed;
                Ok(PaymentConfirmation::confirmed(booking, record.passengers, record.fare_details))
            }
        }
    }

    async fn release_booking(&self, booking_id: Uuid) -> Result<(), ServiceError> {
        // Receiver may be gone; a lost release is acceptable.
        let _ = self.release_tx.send(booking_id);
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{NaiveDate, NaiveTime};
    use rail_core::{Booking, BookingRecord, BookingStatus, FareDetails, Gender, Passenger, PassengerCategory};
    use uuid::Uuid;

    pub fn record() -> BookingRecord {
        let id = Uuid::from_u128(0x8203948245);
        let passenger = |name: &str, age: u8, seat: &str| Passenger {
            booking_id: id,
            name: name.to_string(),
            age,
            gender: Gender::Male,
            category: PassengerCategory::Adult,
            seat_status: seat.to_string(),
        };

        BookingRecord {
            booking: Booking {
                id,
                pnr: "8203948245".to_string(),
                user_id: "u-1001".to_string(),
                train_number: "12951".to_string(),
                train_name: "Mumbai Rajdhani".to_string(),
                journey_date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
                source: "Mumbai Central".to_string(),
                destination: "New Delhi".to_string(),
                boarding_point: "Borivali".to_string(),
                class_code: "3A".to_string(),
                quota: "GN".to_string(),
                departure: NaiveTime::from_hms_opt(17, 0, 0).unwrap(),
                arrival: NaiveTime::from_hms_opt(8, 32, 0).unwrap(),
                status: BookingStatus::Provisional,
            },
            passengers: vec![
                passenger("Rahul Sharma", 34, "CNF/B2/34"),
                passenger("Anil Sharma", 61, "CNF/B2/35"),
            ],
            fare_details: FareDetails::new(2450.0, 5.0, 2.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_confirm_returns_confirmed_record() {
        let record = fixtures::record();
        let id = record.booking.id;
        let (service, _rx) = MockBookingService::new();
        let orchestrator = ConfirmationOrchestrator::new(Arc::new(service.with_record(record)));

        let confirmed = orchestrator.confirm(id).await.unwrap();

        assert_eq!(confirmed.booking.status, BookingStatus::Confirmed);
        assert_eq!(confirmed.passengers.len(), 2);
    }

    #[tokio::test]
    async fn test_decline_carries_service_message() {
        let (service, _rx) = MockBookingService::new();
        service.push_answer(MockAnswer::Decline("Insufficient funds".to_string()));
        let orchestrator = ConfirmationOrchestrator::new(Arc::new(service));

        let failure = orchestrator.confirm(Uuid::new_v4()).await.unwrap_err();
        assert_eq!(failure.user_message(), "Insufficient funds");
    }

    #[tokio::test]
    async fn test_transport_error_hides_details() {
        let (service, _rx) = MockBookingService::new();
        service.push_answer(MockAnswer::Unavailable("connection reset".to_string()));
        let orchestrator = ConfirmationOrchestrator::new(Arc::new(service));

        let failure = orchestrator.confirm(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(failure, ConfirmationFailure::Transport(_)));
        assert_eq!(failure.user_message(), DEFAULT_DECLINE_MESSAGE);
    }

    #[tokio::test]
    async fn test_success_without_passengers_is_rejected() {
        let mut record = fixtures::record();
        record.passengers.clear();
        let id = record.booking.id;
        let (service, _rx) = MockBookingService::new();
        let orchestrator = ConfirmationOrchestrator::new(Arc::new(service.with_record(record)));

        let failure = orchestrator.confirm(id).await.unwrap_err();
        assert!(matches!(failure, ConfirmationFailure::Incomplete(_)));
    }
}
