use uuid::Uuid;

/// Lifecycle events published by the booking service.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingEvent {
    Confirmed(BookingConfirmedEvent),
    Released(BookingReleasedEvent),
    Cancelled(BookingCancelledEvent),
}

impl BookingEvent {
    pub fn booking_id(&self) -> Uuid {
        match self {
            BookingEvent::Confirmed(e) => e.booking_id,
            BookingEvent::Released(e) => e.booking_id,
            BookingEvent::Cancelled(e) => e.booking_id,
        }
    }

    pub fn topic(&self) -> &'static str {
        match self {
            BookingEvent::Confirmed(_) => "booking.confirmed",
            BookingEvent::Released(_) => "booking.released",
            BookingEvent::Cancelled(_) => "booking.cancelled",
        }
    }
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct BookingConfirmedEvent {
    pub booking_id: Uuid,
    pub pnr: String,
    pub user_id: String,
    pub gross_fare: String,
    pub timestamp: i64,
}

/// A provisional hold dropped because the traveller abandoned checkout.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct BookingReleasedEvent {
    pub booking_id: Uuid,
    pub pnr: String,
    pub timestamp: i64,
}

#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
pub struct BookingCancelledEvent {
    pub booking_id: Uuid,
    pub pnr: String,
    pub refund_amount: String,
    pub timestamp: i64,
}
