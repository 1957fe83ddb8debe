use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::{Booking, Passenger};
use crate::fare::FareDetails;

/// Wire shape of the payment-confirmation answer.
///
/// This is the one supported contract: a flat `success` flag, a message on
/// failure, and the refreshed records on success.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub booking: Option<Booking>,
    #[serde(default)]
    pub passengers: Vec<Passenger>,
    #[serde(default)]
    pub fare_details: Option<FareDetails>,
}

impl PaymentConfirmation {
    pub fn confirmed(booking: Booking, passengers: Vec<Passenger>, fare_details: FareDetails) -> Self {
        Self {
            success: true,
            message: None,
            booking: Some(booking),
            passengers,
            fare_details: Some(fare_details),
        }
    }

    pub fn declined(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            booking: None,
            passengers: Vec::new(),
            fare_details: None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Booking not found: {0}")]
    NotFound(Uuid),

    #[error("Booking service unavailable: {0}")]
    Unavailable(String),
}

/// The external booking service the checkout flow talks to.
#[async_trait]
pub trait BookingService: Send + Sync {
    /// Ask the service to settle payment for a provisional booking
    async fn confirm_payment(&self, booking_id: Uuid) -> Result<PaymentConfirmation, ServiceError>;

    /// Drop the seat hold of an abandoned provisional booking.
    /// Callers fire this and never wait on the answer.
    async fn release_booking(&self, booking_id: Uuid) -> Result<(), ServiceError>;
}
