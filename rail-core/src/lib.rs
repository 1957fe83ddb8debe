pub mod booking;
pub mod fare;
pub mod service;
pub mod repository;
pub mod context;
pub mod refund;

pub use booking::{
    Booking, BookingRequest, BookingStatus, Gender, Passenger, PassengerCategory, PassengerDetails,
};
pub use context::{ApiEndpoints, AppContext, CurrentUser};
pub use fare::{FareBreakdown, FareDetails};
pub use refund::{RefundPolicy, RefundQuote};
pub use repository::{BookingRecord, BookingRepository};
pub use service::{BookingService, PaymentConfirmation, ServiceError};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
    #[error("Booking not found: {0}")]
    NotFound(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
