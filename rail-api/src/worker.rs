use std::path::PathBuf;
use std::sync::Arc;
use rail_core::BookingRepository;
use rail_shared::BookingEvent;
use rail_ticket::TicketRenderer;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{error, info, warn};

/// Writes every lifecycle event to the log.
pub async fn start_event_audit(mut rx: broadcast::Receiver<BookingEvent>) {
    info!("Event audit worker started, listening to booking events...");

    loop {
        match rx.recv().await {
            Ok(event) => match serde_json::to_string(&event) {
                Ok(payload) => info!(topic = event.topic(), booking_id = %event.booking_id(), "{}", payload),
                Err(e) => error!("Error serializing event for {}: {}", event.booking_id(), e),
            },
            Err(RecvError::Lagged(skipped)) => warn!("Event audit fell behind, {} events skipped", skipped),
            Err(RecvError::Closed) => {
                info!("Booking event channel closed, audit worker stopping");
                break;
            }
        }
    }
}

/// Renders and stores a ticket for every confirmed booking.
pub async fn start_ticket_issuer(
    mut rx: broadcast::Receiver<BookingEvent>,
    repo: Arc<dyn BookingRepository>,
    renderer: Arc<TicketRenderer>,
    output_dir: PathBuf,
) {
    info!("Ticket issuer started, writing to {}", output_dir.display());

    loop {
        let event = match rx.recv().await {
            Ok(BookingEvent::Confirmed(event)) => event,
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                warn!("Ticket issuer fell behind, {} events skipped", skipped);
                continue;
            }
            Err(RecvError::Closed) => break,
        };

        let record = match repo.get(event.booking_id).await {
            Ok(Some(record)) => record,
            Ok(None) => {
                warn!("Confirmed booking {} vanished before its ticket was issued", event.pnr);
                continue;
            }
            Err(e) => {
                error!("Failed to load booking {}: {}", event.pnr, e);
                continue;
            }
        };

        let renderer = renderer.clone();
        let dir = output_dir.clone();
        let issued = tokio::task::spawn_blocking(move || {
            renderer
                .render(Some(&record.booking), &record.passengers, &record.fare_details)?
                .save_to(&dir)
        })
        .await;

        match issued {
            Ok(Ok(path)) => info!("Ticket for {} stored at {}", event.pnr, path.display()),
            Ok(Err(e)) => error!("Failed to issue ticket for {}: {}", event.pnr, e),
            Err(e) => error!("Ticket task for {} failed: {}", event.pnr, e),
        }
    }
}
