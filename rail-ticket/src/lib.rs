//! Printable e-ticket generation.
//!
//! Rendering happens in two steps. [`TicketDocument::assemble`] checks the
//! inputs, encodes the barcode and QR code and lays out every piece of text;
//! it is a pure function of its inputs. [`pdf`] then draws that layout onto
//! A4 pages.

pub mod symbology;
pub mod document;
pub mod pdf;
pub mod renderer;

pub use document::{FareLine, TicketDocument};
pub use renderer::{RenderedTicket, TicketRenderer};

#[derive(Debug, thiserror::Error)]
pub enum TicketError {
    #[error("Booking details are missing")]
    MissingBooking,

    #[error("Booking has no PNR")]
    MissingPnr,

    #[error("Booking {0} has no passengers")]
    NoPassengers(String),

    #[error("Booking {pnr} exceeds the limit of {max} passengers per ticket")]
    TooManyPassengers { pnr: String, max: usize },

    #[error("Barcode generation failed: {0}")]
    Barcode(String),

    #[error("QR code generation failed: {0}")]
    QrCode(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("Ticket payload could not be serialized: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("Ticket could not be saved: {0}")]
    Io(#[from] std::io::Error),
}

pub type TicketResult<T> = Result<T, TicketError>;
