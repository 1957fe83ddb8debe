use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{NaiveDate, NaiveTime};
use std::fmt;

use crate::fare::FareDetails;
use crate::repository::BookingRecord;
use crate::{CoreError, CoreResult};

/// Booking status as seen by the booking service
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Provisional,
    Confirmed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Provisional => "PROVISIONAL",
            BookingStatus::Confirmed => "CONFIRMED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, BookingStatus::Provisional)
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub pnr: String,
    pub user_id: String,
    pub train_number: String,
    pub train_name: String,
    pub journey_date: NaiveDate,
    pub source: String,
    pub destination: String,
    pub boarding_point: String,
    /// Coach/class code, e.g. `3A`, `SL`
    pub class_code: String,
    /// Reservation quota code, e.g. `GN`, `TQ`
    pub quota: String,
    pub departure: NaiveTime,
    pub arrival: NaiveTime,
    pub status: BookingStatus,
}

impl Booking {
    /// Travellers one reservation may carry.
    pub const MAX_PASSENGERS: usize = 6;

    pub fn route(&self) -> String {
        format!("{} - {}", self.source, self.destination)
    }

    pub fn train_label(&self) -> String {
        format!("{} / {}", self.train_number, self.train_name)
    }

    /// Checks the parts of a booking every downstream consumer relies on.
    pub fn validate(&self, passengers: &[Passenger]) -> CoreResult<()> {
        if self.pnr.trim().is_empty() {
            return Err(CoreError::ValidationError("booking has no PNR".to_string()));
        }
        if passengers.is_empty() {
            return Err(CoreError::ValidationError(format!(
                "booking {} has no passengers",
                self.pnr
            )));
        }
        if passengers.len() > Self::MAX_PASSENGERS {
            return Err(CoreError::ValidationError(format!(
                "booking {} has {} passengers, at most {} allowed",
                self.pnr,
                passengers.len(),
                Self::MAX_PASSENGERS
            )));
        }
        for passenger in passengers {
            passenger.validate()?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Other => "O",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PassengerCategory {
    Adult,
    Child,
    Senior,
}

impl fmt::Display for PassengerCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PassengerCategory::Adult => "ADULT",
            PassengerCategory::Child => "CHILD",
            PassengerCategory::Senior => "SENIOR",
        };
        f.write_str(label)
    }
}

/// A traveller on a booking. Owned by exactly one booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passenger {
    pub booking_id: Uuid,
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub category: PassengerCategory,
    /// Seat or waitlist status, e.g. `CNF/B2/34`
    pub seat_status: String,
}

impl Passenger {
    pub const MAX_AGE: u8 = 125;

    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::ValidationError("passenger name is required".to_string()));
        }
        if self.age == 0 || self.age > Self::MAX_AGE {
            return Err(CoreError::ValidationError(format!(
                "passenger age {} is out of range",
                self.age
            )));
        }
        Ok(())
    }
}

/// Traveller details as captured at booking entry.
#[derive(Debug, Clone, Deserialize)]
pub struct PassengerDetails {
    pub name: String,
    pub age: u8,
    pub gender: Gender,
    pub category: PassengerCategory,
}

/// Journey and passenger details for a new provisional booking.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub train_number: String,
    pub train_name: String,
    pub journey_date: NaiveDate,
    pub source: String,
    pub destination: String,
    /// Defaults to the source station
    #[serde(default)]
    pub boarding_point: Option<String>,
    pub class_code: String,
    #[serde(default = "general_quota")]
    pub quota: String,
    pub departure: NaiveTime,
    pub arrival: NaiveTime,
    pub base_fare: f64,
    pub passengers: Vec<PassengerDetails>,
}

fn general_quota() -> String {
    "GN".to_string()
}

impl BookingRequest {
    /// Build a provisional record. Seats are allotted in passenger order.
    pub fn into_record(
        self,
        id: Uuid,
        pnr: String,
        user_id: &str,
        fare_details: FareDetails,
    ) -> CoreResult<BookingRecord> {
        let required = [
            ("train number", &self.train_number),
            ("source", &self.source),
            ("destination", &self.destination),
            ("class", &self.class_code),
        ];
        if let Some((field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(CoreError::ValidationError(format!("{} is required", field)));
        }
        if !self.base_fare.is_finite() || self.base_fare <= 0.0 {
            return Err(CoreError::ValidationError(format!(
                "base fare {} must be positive",
                self.base_fare
            )));
        }

        let class_code = self.class_code.trim().to_uppercase();
        let passengers: Vec<Passenger> = self
            .passengers
            .into_iter()
            .enumerate()
            .map(|(i, p)| Passenger {
                booking_id: id,
                name: p.name.trim().to_string(),
                age: p.age,
                gender: p.gender,
                category: p.category,
                seat_status: format!("CNF/{}/{}", class_code, i + 1),
            })
            .collect();

        let booking = Booking {
            id,
            pnr,
            user_id: user_id.to_string(),
            train_number: self.train_number,
            train_name: self.train_name,
            journey_date: self.journey_date,
            boarding_point: self.boarding_point.unwrap_or_else(|| self.source.clone()),
            source: self.source,
            destination: self.destination,
            class_code,
            quota: self.quota,
            departure: self.departure,
            arrival: self.arrival,
            status: BookingStatus::Provisional,
        };
        booking.validate(&passengers)?;

        Ok(BookingRecord {
            booking,
            passengers,
            fare_details,
        })
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn booking() -> Booking {
        Booking {
            id: Uuid::from_u128(1),
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
        }
    }

    pub fn passenger(name: &str, age: u8) -> Passenger {
        Passenger {
            booking_id: Uuid::from_u128(1),
            name: name.to_string(),
            age,
            gender: Gender::Female,
            category: PassengerCategory::Adult,
            seat_status: "CNF/B2/34".to_string(),
        }
    }
}
