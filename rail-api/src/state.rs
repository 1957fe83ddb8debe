use std::sync::Arc;
use rail_core::RefundPolicy;
use rail_core::{ApiEndpoints, BookingRepository};
use rail_shared::BookingEvent;
use rail_store::app_config::FareConfig;
use rail_store::StoreBookingService;
use rail_ticket::TicketRenderer;
use tokio::sync::broadcast;

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn BookingRepository>,
    pub bookings: Arc<StoreBookingService>,
    pub fares: FareConfig,
    pub refunds: RefundPolicy,
    pub endpoints: ApiEndpoints,
    pub renderer: Arc<TicketRenderer>,
    pub events_tx: broadcast::Sender<BookingEvent>,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn BookingRepository>,
        fares: FareConfig,
        refunds: RefundPolicy,
        endpoints: ApiEndpoints,
        renderer: TicketRenderer,
    ) -> Self {
        let (events_tx, _) = broadcast::channel(100);
        let bookings = Arc::new(StoreBookingService::new(repo.clone(), events_tx.clone()));

        Self {
            repo,
            bookings,
            fares,
            refunds,
            endpoints,
            renderer: Arc::new(renderer),
            events_tx,
        }
    }
}
