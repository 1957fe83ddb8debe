use serde::{Deserialize, Serialize};

/// Fare inputs for a booking.
///
/// The gross fare is deliberately not a field: it is always derived from the
/// base fare and the two percentages so it cannot drift from them. A payload
/// carrying its own total is accepted but the total is ignored.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FareDetails {
    pub base_fare: f64,
    pub gst_percent: f64,
    pub convenience_percent: f64,
}

impl FareDetails {
    pub fn new(base_fare: f64, gst_percent: f64, convenience_percent: f64) -> Self {
        Self {
            base_fare,
            gst_percent,
            convenience_percent,
        }
    }

    pub fn gst_amount(&self) -> f64 {
        self.base_fare * self.gst_percent / 100.0
    }

    pub fn convenience_amount(&self) -> f64 {
        self.base_fare * self.convenience_percent / 100.0
    }

    /// Unrounded gross fare.
    pub fn gross(&self) -> f64 {
        self.base_fare + self.gst_amount() + self.convenience_amount()
    }

    /// Display figures. Every screen and the printed ticket go through here.
    pub fn breakdown(&self) -> FareBreakdown {
        FareBreakdown {
            base_fare: format_amount(self.base_fare),
            gst_percent: self.gst_percent,
            gst_amount: format_amount(self.gst_amount()),
            convenience_percent: self.convenience_percent,
            convenience_amount: format_amount(self.convenience_amount()),
            gross_fare: format_amount(self.gross()),
        }
    }
}

/// Formatted fare figures, two decimals each.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FareBreakdown {
    pub base_fare: String,
    pub gst_percent: f64,
    pub gst_amount: String,
    pub convenience_percent: f64,
    pub convenience_amount: String,
    pub gross_fare: String,
}

/// Absorbs binary representation error so that e.g. `1.005` counts as a half.
const HALF_CENT_TOLERANCE: f64 = 1e-9;

/// Rounds half away from zero to 2 decimals.
pub fn round_amount(value: f64) -> f64 {
    let scaled = value * 100.0;
    (scaled + scaled.signum() * HALF_CENT_TOLERANCE).round() / 100.0
}

pub fn format_amount(value: f64) -> String {
    format!("{:.2}", round_amount(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_fare() {
        let fare = FareDetails::new(2450.0, 5.0, 2.0);
        let breakdown = fare.breakdown();

        assert_eq!(breakdown.base_fare, "2450.00");
        assert_eq!(breakdown.gst_amount, "122.50");
        assert_eq!(breakdown.convenience_amount, "49.00");
        assert_eq!(breakdown.gross_fare, "2621.50");
    }

    #[test]
    fn test_gross_stays_unrounded_internally() {
        let fare = FareDetails::new(999.99, 5.0, 1.5);
        let expected = 999.99 + 999.99 * 5.0 / 100.0 + 999.99 * 1.5 / 100.0;
        assert_eq!(fare.gross(), expected);
        assert_eq!(fare.breakdown().gross_fare, format_amount(expected));
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(format_amount(0.125), "0.13");
        assert_eq!(format_amount(10.0), "10.00");
        assert_eq!(format_amount(-0.125), "-0.13");
    }

    #[test]
    fn test_inexact_halves_round_up() {
        assert_eq!(format_amount(1.005), "1.01");
        assert_eq!(format_amount(2.675), "2.68");
        assert_eq!(format_amount(-1.005), "-1.01");
        assert_eq!(format_amount(1.0049), "1.00");
        assert_eq!(format_amount(0.0), "0.00");
    }

    #[test]
    fn test_stored_total_is_ignored() {
        let fare: FareDetails = serde_json::from_value(serde_json::json!({
            "base_fare": 1000.0,
            "gst_percent": 5.0,
            "convenience_percent": 0.0,
            "total_fare": 99999.0
        }))
        .unwrap();

        assert_eq!(fare.breakdown().gross_fare, "1050.00");
    }
}
