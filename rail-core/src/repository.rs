use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::booking::{Booking, BookingStatus, Passenger};
use crate::fare::FareDetails;
use crate::CoreResult;

/// A booking together with everything it owns.
///
/// Serialized as `{ booking, passengers, fare_details }`, which is also the
/// payload printed into the ticket QR code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRecord {
    pub booking: Booking,
    pub passengers: Vec<Passenger>,
    pub fare_details: FareDetails,
}

/// Repository trait for booking data access
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert(&self, record: BookingRecord) -> CoreResult<()>;

    async fn get(&self, id: Uuid) -> CoreResult<Option<BookingRecord>>;

    async fn find_by_pnr(&self, pnr: &str) -> CoreResult<Option<BookingRecord>>;

    async fn list_for_user(&self, user_id: &str) -> CoreResult<Vec<BookingRecord>>;

    /// Compare-and-set on status. Returns the updated record, or `None` when
    /// the current status did not match `expected`.
    async fn transition(
        &self,
        id: Uuid,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> CoreResult<Option<BookingRecord>>;
}
