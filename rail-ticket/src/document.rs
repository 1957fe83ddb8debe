use rail_core::{Booking, FareDetails, Passenger};
use serde::Serialize;

use crate::symbology::{BarcodeStrip, QrMatrix};
use crate::{TicketError, TicketResult};

pub const TITLE: &str = "ELECTRONIC RESERVATION SLIP (ERS)";
pub const PASSENGER_COLUMNS: [&str; 5] = ["Name", "Age", "Gender", "Seat / Status", "Category"];
pub const SIGNATURE: &str = "Authorised Signatory";
pub const LEGAL_NOTICE: [&str; 2] = [
    "This ticket is valid only with a government-issued photo ID of one of the passengers.",
    "Scan the QR code to verify the full booking. Tampering with this document is an offence.",
];

/// QR payload shape: `{ booking, passengers, fare_details }`.
#[derive(Serialize)]
struct TicketPayload<'a> {
    booking: &'a Booking,
    passengers: &'a [Passenger],
    fare_details: &'a FareDetails,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FareLine {
    pub label: String,
    pub amount: String,
    pub emphasized: bool,
}

/// Fully laid-out ticket, independent of the output format.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketDocument {
    pub pnr: String,
    pub title: String,
    pub watermark: String,
    pub fields: Vec<(String, String)>,
    pub barcode: BarcodeStrip,
    pub passenger_rows: Vec<[String; 5]>,
    pub fare_lines: Vec<FareLine>,
    pub qr_payload: String,
    pub qr: QrMatrix,
}

impl TicketDocument {
    /// Check the inputs and build the layout.
    ///
    /// Preconditions are checked before any encoding, so a failure leaves
    /// nothing behind. The barcode is encoded before the QR code.
    pub fn assemble(
        booking: Option<&Booking>,
        passengers: &[Passenger],
        fare: &FareDetails,
        watermark: &str,
    ) -> TicketResult<Self> {
        let booking = booking.ok_or(TicketError::MissingBooking)?;
        let pnr = booking.pnr.trim();
        if pnr.is_empty() {
            return Err(TicketError::MissingPnr);
        }
        if passengers.is_empty() {
            return Err(TicketError::NoPassengers(pnr.to_string()));
        }
        if passengers.len() > Booking::MAX_PASSENGERS {
            return Err(TicketError::TooManyPassengers {
                pnr: pnr.to_string(),
                max: Booking::MAX_PASSENGERS,
            });
        }

        let barcode = BarcodeStrip::encode(pnr)?;
        let qr_payload = serde_json::to_string(&TicketPayload {
            booking,
            passengers,
            fare_details: fare,
        })?;
        let qr = QrMatrix::encode(&qr_payload)?;

        Ok(Self {
            pnr: pnr.to_string(),
            title: TITLE.to_string(),
            watermark: watermark.to_string(),
            fields: booking_fields(booking),
            barcode,
            passenger_rows: passengers.iter().map(passenger_row).collect(),
            fare_lines: fare_lines(fare),
            qr_payload,
            qr,
        })
    }

    pub fn file_name(&self) -> String {
        format!("Ticket_{}.pdf", self.pnr)
    }

    /// Every piece of printed text, in reading order.
    pub fn text_content(&self) -> String {
        let mut lines = vec![self.title.clone(), self.watermark.clone()];
        lines.extend(self.fields.iter().map(|(label, value)| format!("{}: {}", label, value)));
        lines.push(PASSENGER_COLUMNS.join(" | "));
        lines.extend(self.passenger_rows.iter().map(|row| row.join(" | ")));
        lines.extend(self.fare_lines.iter().map(|line| format!("{}: {}", line.label, line.amount)));
        lines.push(SIGNATURE.to_string());
        lines.extend(LEGAL_NOTICE.iter().map(|s| s.to_string()));
        lines.join("\n")
    }
}

fn booking_fields(booking: &Booking) -> Vec<(String, String)> {
    vec![
        ("PNR".to_string(), booking.pnr.clone()),
        ("Status".to_string(), booking.status.to_string()),
        ("Train".to_string(), booking.train_label()),
        ("Journey Date".to_string(), booking.journey_date.format("%d-%m-%Y").to_string()),
        ("Route".to_string(), booking.route()),
        ("Boarding Point".to_string(), booking.boarding_point.clone()),
        ("Class".to_string(), booking.class_code.clone()),
        ("Quota".to_string(), booking.quota.clone()),
        ("Departure".to_string(), booking.departure.format("%H:%M").to_string()),
        ("Arrival".to_string(), booking.arrival.format("%H:%M").to_string()),
    ]
}

fn passenger_row(passenger: &Passenger) -> [String; 5] {
    [
        passenger.name.clone(),
        passenger.age.to_string(),
        passenger.gender.to_string(),
        passenger.seat_status.clone(),
        passenger.category.to_string(),
    ]
}

fn fare_lines(fare: &FareDetails) -> Vec<FareLine> {
    let breakdown = fare.breakdown();
    let line = |label: String, amount: String, emphasized: bool| FareLine { label, amount, emphasized };

    vec![
        line("Base Fare".to_string(), breakdown.base_fare, false),
        line(format!("GST ({}%)", breakdown.gst_percent), breakdown.gst_amount, false),
        line(
            format!("Convenience Fee ({}%)", breakdown.convenience_percent),
            breakdown.convenience_amount,
            false,
        ),
        line("Total Fare".to_string(), breakdown.gross_fare, true),
    ]
}
