use crate::fare::{format_amount, FareDetails};
use serde::{Deserialize, Serialize};

/// Cancellation terms for confirmed bookings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefundPolicy {
    /// Charged on the base fare
    pub cancellation_charge_percent: f64,
    #[serde(default)]
    pub refund_convenience_fee: bool,
}

impl Default for RefundPolicy {
    fn default() -> Self {
        Self {
            cancellation_charge_percent: 25.0,
            refund_convenience_fee: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefundQuote {
    pub gross_fare: String,
    pub cancellation_charge: String,
    pub non_refundable_fee: String,
    pub refund_amount: String,
}

impl RefundPolicy {
    /// Refund for cancelling the whole booking. Built on the same fare
    /// figures as the summary and the printed ticket.
    pub fn quote(&self, fare: &FareDetails) -> RefundQuote {
        let charge = fare.base_fare * self.cancellation_charge_percent / 100.0;
        let fee = if self.refund_convenience_fee {
            0.0
        } else {
            fare.convenience_amount()
        };
        let refund = (fare.gross() - charge - fee).max(0.0);

        RefundQuote {
            gross_fare: format_amount(fare.gross()),
            cancellation_charge: format_amount(charge),
            non_refundable_fee: format_amount(fee),
            refund_amount: format_amount(refund),
        }
    }
}
