use chrono::{Duration, NaiveDate, NaiveTime};
use rail_core::{
    Booking, BookingRecord, BookingStatus, FareDetails, Gender, Passenger, PassengerCategory,
};
use uuid::Uuid;

pub const DEMO_USER: &str = "u-1001";
pub const DEMO_PNR: &str = "8203948245";

/// Booking id of the demo checkout, derived from its PNR.
pub fn demo_booking_id() -> Uuid {
    Uuid::from_u128(0x8203948245)
}

struct Trip {
    id: u128,
    pnr: &'static str,
    user: &'static str,
    train: (&'static str, &'static str),
    days_from_today: i64,
    route: (&'static str, &'static str, &'static str),
    class_code: &'static str,
    times: ((u32, u32), (u32, u32)),
    status: BookingStatus,
    base_fare: f64,
    travellers: &'static [(&'static str, u8, Gender, PassengerCategory, &'static str)],
}

const TRIPS: &[Trip] = &[
    Trip {
        id: 0x8203948245,
        pnr: DEMO_PNR,
        user: DEMO_USER,
        train: ("12951", "Mumbai Rajdhani"),
        days_from_today: 14,
        route: ("Mumbai Central", "New Delhi", "Borivali"),
        class_code: "3A",
        times: ((17, 0), (8, 32)),
        status: BookingStatus::Provisional,
        base_fare: 2450.0,
        travellers: &[
            ("Rahul Sharma", 34, Gender::Male, PassengerCategory::Adult, "CNF/B2/34"),
            ("Meera Sharma", 62, Gender::Female, PassengerCategory::Senior, "CNF/B2/35"),
        ],
    },
    Trip {
        id: 0x4521873690,
        pnr: "4521873690",
        user: DEMO_USER,
        train: ("12009", "Ahmedabad Shatabdi"),
        days_from_today: 30,
        route: ("Mumbai Central", "Ahmedabad", "Mumbai Central"),
        class_code: "CC",
        times: ((6, 20), (12, 45)),
        status: BookingStatus::Confirmed,
        base_fare: 1185.0,
        travellers: &[("Rahul Sharma", 34, Gender::Male, PassengerCategory::Adult, "CNF/C4/51")],
    },
    Trip {
        id: 0x6610293847,
        pnr: "6610293847",
        user: DEMO_USER,
        train: ("12627", "Karnataka Express"),
        days_from_today: -20,
        route: ("New Delhi", "Bengaluru", "New Delhi"),
        class_code: "SL",
        times: ((20, 20), (13, 40)),
        status: BookingStatus::Confirmed,
        base_fare: 915.0,
        travellers: &[
            ("Rahul Sharma", 34, Gender::Male, PassengerCategory::Adult, "CNF/S7/22"),
            ("Anaya Sharma", 9, Gender::Female, PassengerCategory::Child, "CNF/S7/23"),
        ],
    },
    Trip {
        id: 0x7702938475,
        pnr: "7702938475",
        user: DEMO_USER,
        train: ("22691", "Rajdhani Express"),
        days_from_today: -5,
        route: ("Bengaluru", "Hazrat Nizamuddin", "Bengaluru"),
        class_code: "2A",
        times: ((20, 0), (5, 55)),
        status: BookingStatus::Cancelled,
        base_fare: 4210.0,
        travellers: &[("Rahul Sharma", 34, Gender::Male, PassengerCategory::Adult, "WL/12")],
    },
    Trip {
        id: 0x3390182746,
        pnr: "3390182746",
        user: "u-2002",
        train: ("12301", "Howrah Rajdhani"),
        days_from_today: 3,
        route: ("Howrah", "New Delhi", "Howrah"),
        class_code: "1A",
        times: ((16, 50), (10, 0)),
        status: BookingStatus::Confirmed,
        base_fare: 4985.0,
        travellers: &[("Kavya Iyer", 28, Gender::Female, PassengerCategory::Adult, "CNF/H1/4")],
    },
];

/// Mock bookings the placeholder backend starts with. Journey dates are
/// relative to `today` so the history filters always have something to show.
pub fn demo_records(today: NaiveDate, fares: impl Fn(f64) -> FareDetails) -> Vec<BookingRecord> {
    TRIPS.iter().map(|trip| record(trip, today, &fares)).collect()
}

fn record(trip: &Trip, today: NaiveDate, fares: &impl Fn(f64) -> FareDetails) -> BookingRecord {
    let id = Uuid::from_u128(trip.id);
    let time = |(h, m): (u32, u32)| NaiveTime::from_hms_opt(h, m, 0).unwrap_or_default();
    let (source, destination, boarding_point) = trip.route;

    let booking = Booking {
        id,
        pnr: trip.pnr.to_string(),
        user_id: trip.user.to_string(),
        train_number: trip.train.0.to_string(),
        train_name: trip.train.1.to_string(),
        journey_date: today + Duration::days(trip.days_from_today),
        source: source.to_string(),
        destination: destination.to_string(),
        boarding_point: boarding_point.to_string(),
        class_code: trip.class_code.to_string(),
        quota: "GN".to_string(),
        departure: time(trip.times.0),
        arrival: time(trip.times.1),
        status: trip.status,
    };

    let passengers = trip
        .travellers
        .iter()
        .map(|&(name, age, gender, category, seat)| Passenger {
            booking_id: id,
            name: name.to_string(),
            age,
            gender,
            category,
            seat_status: seat.to_string(),
        })
        .collect();

    BookingRecord {
        booking,
        passengers,
        fare_details: fares(trip.base_fare),
    }
}
