use rail_core::{Booking, BookingRecord, BookingStatus};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::lifecycle::{CheckoutState, LifecycleError};
use crate::orchestrator::ConfirmationOrchestrator;
use crate::release::ReleaseDispatcher;

/// Set-once flag recording that payment went through.
///
/// Lives outside the state enum so exit paths can read it synchronously,
/// without going through any other bookkeeping first.
#[derive(Debug, Default)]
pub struct PaymentLatch(AtomicBool);

impl PaymentLatch {
    pub fn set(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// The ways a traveller can leave the payment step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitPath {
    BackButton,
    Unmount,
    Unload,
}

#[derive(Debug, Clone)]
pub enum PaymentOutcome {
    /// Navigate to the confirmation view with the refreshed records
    Confirmed(BookingRecord),
    /// Stay on the payment step and show the message
    Declined { message: String },
}

/// One traveller's pass through the payment step for a provisional booking.
///
/// Every exit path funnels into [`CheckoutSession::leave`], which releases the
/// hold at most once and never after a successful payment. Dropping the
/// session counts as an unmount.
pub struct CheckoutSession {
    booking_id: Uuid,
    pnr: String,
    state: Mutex<CheckoutState>,
    paid: PaymentLatch,
    orchestrator: Arc<ConfirmationOrchestrator>,
    releaser: ReleaseDispatcher,
}

impl CheckoutSession {
    pub fn start(
        booking: &Booking,
        orchestrator: Arc<ConfirmationOrchestrator>,
        releaser: ReleaseDispatcher,
    ) -> Result<Self, LifecycleError> {
        if booking.status != BookingStatus::Provisional {
            return Err(LifecycleError::NotProvisional(booking.pnr.clone()));
        }

        info!(pnr = %booking.pnr, booking_id = %booking.id, "checkout started");
        Ok(Self {
            booking_id: booking.id,
            pnr: booking.pnr.clone(),
            state: Mutex::new(CheckoutState::Provisional),
            paid: PaymentLatch::default(),
            orchestrator,
            releaser,
        })
    }

    pub fn booking_id(&self) -> Uuid {
        self.booking_id
    }

    pub fn state(&self) -> CheckoutState {
        *self.lock_state()
    }

    pub fn is_paid(&self) -> bool {
        self.paid.is_set()
    }

    /// Pay for the booking. Resolves once the booking service has answered.
    ///
    /// A decline or a service error is not an `Err`: the session goes back to
    /// provisional and the outcome carries the message to show.
    pub async fn pay(&self) -> Result<PaymentOutcome, LifecycleError> {
        {
            let mut state = self.lock_state();
            *state = state.begin_confirmation()?;
        }
        info!(pnr = %self.pnr, "confirming payment");

        let result = self.orchestrator.confirm(self.booking_id).await;

        let mut state = self.lock_state();
        if *state != CheckoutState::Confirming {
            // Torn down while the call was in flight; the hold is already released.
            warn!(pnr = %self.pnr, state = ?*state, "confirmation answered after checkout closed");
            return Err(LifecycleError::SessionClosed(*state));
        }

        match result {
            Ok(record) => {
                self.paid.set();
                *state = state.confirmation_succeeded()?;
                info!(pnr = %self.pnr, "payment confirmed");
                Ok(PaymentOutcome::Confirmed(record))
            }
            Err(failure) => {
                *state = state.confirmation_failed()?;
                warn!(pnr = %self.pnr, reason = %failure, "payment not confirmed");
                Ok(PaymentOutcome::Declined {
                    message: failure.user_message(),
                })
            }
        }
    }

    /// Handle an exit. Returns whether a release notification was sent.
    pub fn leave(&self, exit: ExitPath) -> bool {
        if self.paid.is_set() {
            debug!(pnr = %self.pnr, ?exit, "exit after payment, nothing to release");
            return false;
        }

        let mut state = self.lock_state();
        let Some(next) = state.abandon() else {
            return false;
        };
        *state = next;
        drop(state);

        info!(pnr = %self.pnr, ?exit, "checkout abandoned, releasing hold");
        self.releaser.dispatch(self.booking_id);
        true
    }

    fn lock_state(&self) -> MutexGuard<'_, CheckoutState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for CheckoutSession {
    fn drop(&mut self) {
        self.leave(ExitPath::Unmount);
    }
}
