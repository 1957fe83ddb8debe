pub mod app_config;
pub mod booking_repo;
pub mod booking_service;
pub mod seed;

pub use app_config::Config;
pub use booking_repo::InMemoryBookingRepository;
pub use booking_service::StoreBookingService;

use rail_core::{BookingStatus, CoreError};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Booking not found: {0}")]
    NotFound(Uuid),

    #[error("Booking {pnr} is {status} and cannot be cancelled")]
    NotCancellable { pnr: String, status: BookingStatus },

    #[error(transparent)]
    Repository(#[from] CoreError),
}
