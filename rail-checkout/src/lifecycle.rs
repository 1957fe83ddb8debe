use serde::{Deserialize, Serialize};

/// Checkout state of a booking on the client side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckoutState {
    Provisional,
    Confirming,
    Confirmed,
    Cancelled,
}

impl CheckoutState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutState::Confirmed | CheckoutState::Cancelled)
    }

    /// Transition: Provisional → Confirming (user pressed pay)
    pub fn begin_confirmation(self) -> Result<Self, LifecycleError> {
        match self {
            CheckoutState::Provisional => Ok(CheckoutState::Confirming),
            CheckoutState::Confirming => Err(LifecycleError::ConfirmationInFlight),
            other => Err(LifecycleError::invalid(other, CheckoutState::Confirming)),
        }
    }

    /// Transition: Confirming → Confirmed
    pub fn confirmation_succeeded(self) -> Result<Self, LifecycleError> {
        match self {
            CheckoutState::Confirming => Ok(CheckoutState::Confirmed),
            other => Err(LifecycleError::invalid(other, CheckoutState::Confirmed)),
        }
    }

    /// Transition: Confirming → Provisional (declined or errored, retry allowed)
    pub fn confirmation_failed(self) -> Result<Self, LifecycleError> {
        match self {
            CheckoutState::Confirming => Ok(CheckoutState::Provisional),
            other => Err(LifecycleError::invalid(other, CheckoutState::Provisional)),
        }
    }

    /// Transition on teardown. `None` when already terminal, in which case no
    /// release may be sent.
    pub fn abandon(self) -> Option<Self> {
        match self {
            CheckoutState::Provisional | CheckoutState::Confirming => Some(CheckoutState::Cancelled),
            CheckoutState::Confirmed | CheckoutState::Cancelled => None,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LifecycleError {
    #[error("Invalid state transition from {from:?} to {to:?}")]
    InvalidTransition {
        from: CheckoutState,
        to: CheckoutState,
    },

    #[error("Payment confirmation already in progress")]
    ConfirmationInFlight,

    #[error("Checkout session already closed in state {0:?}")]
    SessionClosed(CheckoutState),

    #[error("Booking {0} is not provisional")]
    NotProvisional(String),
}

impl LifecycleError {
    fn invalid(from: CheckoutState, to: CheckoutState) -> Self {
        LifecycleError::InvalidTransition { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let state = CheckoutState::Provisional;

        // Provisional → Confirming
        let state = state.begin_confirmation().unwrap();
        assert_eq!(state, CheckoutState::Confirming);

        // Confirming → Confirmed
        let state = state.confirmation_succeeded().unwrap();
        assert_eq!(state, CheckoutState::Confirmed);
        assert!(state.is_terminal());
    }

    #[test]
    fn test_failed_confirmation_allows_retry() {
        let state = CheckoutState::Provisional
            .begin_confirmation()
            .and_then(CheckoutState::confirmation_failed)
            .unwrap();

        assert_eq!(state, CheckoutState::Provisional);
        assert_eq!(state.begin_confirmation(), Ok(CheckoutState::Confirming));
    }

    #[test]
    fn test_double_submit_rejected() {
        let result = CheckoutState::Confirming.begin_confirmation();
        assert_eq!(result, Err(LifecycleError::ConfirmationInFlight));
    }

    #[test]
    fn test_terminal_states_do_not_move() {
        for terminal in [CheckoutState::Confirmed, CheckoutState::Cancelled] {
            assert!(terminal.abandon().is_none());
            assert!(terminal.begin_confirmation().is_err());
            assert!(terminal.confirmation_failed().is_err());
        }
    }

    #[test]
    fn test_abandon_cancels_open_states() {
        assert_eq!(CheckoutState::Provisional.abandon(), Some(CheckoutState::Cancelled));
        assert_eq!(CheckoutState::Confirming.abandon(), Some(CheckoutState::Cancelled));
    }
}
