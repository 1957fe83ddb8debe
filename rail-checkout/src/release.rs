use rail_core::BookingService;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Sends release notifications without waiting for them.
///
/// Delivery is at most once. A notification that fails, or that cannot be
/// spawned because no runtime is running, is logged and forgotten.
#[derive(Clone)]
pub struct ReleaseDispatcher {
    service: Arc<dyn BookingService>,
    attempts: Arc<AtomicUsize>,
}

impl ReleaseDispatcher {
    pub fn new(service: Arc<dyn BookingService>) -> Self {
        Self {
            service,
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Fire the release. Returns whether the notification was handed to the
    /// runtime; never blocks.
    pub fn dispatch(&self, booking_id: Uuid) -> bool {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(_) => {
                warn!(%booking_id, "no async runtime available, release notification dropped");
                return false;
            }
        };

        let service = self.service.clone();
        handle.spawn(async move {
            match service.release_booking(booking_id).await {
                Ok(()) => debug!(%booking_id, "release delivered"),
                Err(e) => warn!(%booking_id, error = %e, "release not delivered"),
            }
        });
        true
    }

    /// Number of release notifications attempted so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}
