use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Router,
};
use rail_core::BookingStatus;
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/tickets/{pnr}", get(download_ticket))
}

async fn download_ticket(
    State(state): State<AppState>,
    Path(pnr): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let record = state
        .repo
        .find_by_pnr(pnr.trim())
        .await
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::NotFoundError(format!("No booking with PNR {}", pnr)))?;

    if record.booking.status != BookingStatus::Confirmed {
        return Err(AppError::ConflictError(format!(
            "Booking {} is {}, tickets are issued for confirmed bookings only",
            record.booking.pnr, record.booking.status
        )));
    }

    // PDF composition is CPU-bound
    let renderer = state.renderer.clone();
    let ticket = tokio::task::spawn_blocking(move || {
        renderer.render(Some(&record.booking), &record.passengers, &record.fare_details)
    })
    .await?
    .map_err(AppError::from_ticket)?;

    info!("Serving {} ({} bytes)", ticket.file_name, ticket.bytes.len());
    let disposition = format!("attachment; filename=\"{}\"", ticket.file_name);

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        ticket.bytes,
    ))
}
