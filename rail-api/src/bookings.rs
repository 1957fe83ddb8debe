use axum::{
    extract::{Extension, Path, Query, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use rail_core::RefundQuote;
use rail_core::{
    AppContext, Booking, BookingRecord, BookingRequest, BookingService, BookingStatus, FareBreakdown,
    Passenger, PaymentConfirmation,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::AppError;
use crate::middleware::current_user_middleware;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct PnrStatusResponse {
    pub booking: Booking,
    pub passengers: Vec<Passenger>,
    pub fare: FareBreakdown,
}

#[derive(Debug, Serialize)]
pub struct HistoryEntry {
    pub booking_id: Uuid,
    pub pnr: String,
    pub train: String,
    pub route: String,
    pub journey_date: NaiveDate,
    pub status: BookingStatus,
    pub passengers: usize,
    pub gross_fare: String,
    pub ticket_url: String,
}

#[derive(Debug, Serialize)]
pub struct CancellationResponse {
    pub booking_id: Uuid,
    pub pnr: String,
    pub status: BookingStatus,
    pub refund: RefundQuote,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HistoryFilter {
    #[default]
    All,
    Upcoming,
    Completed,
    Cancelled,
}

impl HistoryFilter {
    pub fn matches(&self, booking: &Booking, today: NaiveDate) -> bool {
        let cancelled = booking.status == BookingStatus::Cancelled;
        match self {
            HistoryFilter::All => true,
            HistoryFilter::Upcoming => !cancelled && booking.journey_date >= today,
            HistoryFilter::Completed => !cancelled && booking.journey_date < today,
            HistoryFilter::Cancelled => cancelled,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub filter: HistoryFilter,
}

pub fn routes(state: AppState) -> Router<AppState> {
    let traveller = Router::new()
        .route("/api/bookings", get(list_bookings).post(create_booking))
        .route("/api/bookings/{id}/refund-quote", get(refund_quote))
        .route("/api/bookings/{id}/cancel", post(cancel_booking))
        .route_layer(middleware::from_fn_with_state(state, current_user_middleware));

    Router::new()
        .route("/api/pnr/{pnr}", get(pnr_status))
        .route("/api/bookings/{id}/fare-summary", get(fare_summary))
        .route("/api/bookings/{id}/confirm-payment", post(confirm_payment))
        .route("/api/bookings/{id}/release", post(release_booking))
        .merge(traveller)
}

async fn load(state: &AppState, id: Uuid) -> Result<BookingRecord, AppError> {
    state
        .repo
        .get(id)
        .await
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::NotFoundError(format!("Booking not found: {}", id)))
}

fn ensure_owner(ctx: &AppContext, record: &BookingRecord) -> Result<(), AppError> {
    match ctx.user() {
        Some(user) if user.id == record.booking.user_id => Ok(()),
        _ => Err(AppError::AuthorizationError(format!(
            "Booking {} belongs to another traveller",
            record.booking.pnr
        ))),
    }
}

async fn pnr_status(
    State(state): State<AppState>,
    Path(pnr): Path<String>,
) -> Result<Json<PnrStatusResponse>, AppError> {
    let record = state
        .repo
        .find_by_pnr(pnr.trim())
        .await
        .map_err(AppError::from_core)?
        .ok_or_else(|| AppError::NotFoundError(format!("No booking with PNR {}", pnr)))?;

    Ok(Json(PnrStatusResponse {
        fare: record.fare_details.breakdown(),
        booking: record.booking,
        passengers: record.passengers,
    }))
}

async fn list_bookings(
    State(state): State<AppState>,
    Extension(ctx): Extension<AppContext>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let user = ctx
        .user()
        .ok_or_else(|| AppError::AuthenticationError("Not signed in".to_string()))?;
    let today = Local::now().date_naive();

    let entries = state
        .repo
        .list_for_user(&user.id)
        .await
        .map_err(AppError::from_core)?
        .into_iter()
        .filter(|r| query.filter.matches(&r.booking, today))
        .map(|r| HistoryEntry {
            booking_id: r.booking.id,
            train: r.booking.train_label(),
            route: r.booking.route(),
            journey_date: r.booking.journey_date,
            status: r.booking.status,
            passengers: r.passengers.len(),
            gross_fare: r.fare_details.breakdown().gross_fare,
            ticket_url: ctx.endpoints().ticket(&r.booking.pnr),
            pnr: r.booking.pnr,
        })
        .collect();

    Ok(Json(entries))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(ctx): Extension<AppContext>,
    Json(request): Json<BookingRequest>,
) -> Result<(StatusCode, Json<BookingRecord>), AppError> {
    let user = ctx
        .user()
        .ok_or_else(|| AppError::AuthenticationError("Not signed in".to_string()))?;

    let record = state
        .bookings
        .create(&user.id, request, &state.fares)
        .await
        .map_err(AppError::from_store)?;
    Ok((StatusCode::CREATED, Json(record)))
}

async fn fare_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FareBreakdown>, AppError> {
    let record = load(&state, id).await?;
    Ok(Json(record.fare_details.breakdown()))
}

async fn confirm_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PaymentConfirmation>, AppError> {
    let answer = state
        .bookings
        .confirm_payment(id)
        .await
        .map_err(AppError::from_service)?;
    Ok(Json(answer))
}

/// Beacon target. Always accepted, whatever happened to the booking.
async fn release_booking(State(state): State<AppState>, Path(id): Path<Uuid>) -> StatusCode {
    if let Err(e) = state.bookings.release_booking(id).await {
        warn!("Release of {} dropped: {}", id, e);
    }
    StatusCode::ACCEPTED
}

async fn refund_quote(
    State(state): State<AppState>,
    Extension(ctx): Extension<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<RefundQuote>, AppError> {
    let record = load(&state, id).await?;
    ensure_owner(&ctx, &record)?;

    let quote = state
        .bookings
        .refund_quote(id, &state.refunds)
        .await
        .map_err(AppError::from_store)?;
    Ok(Json(quote))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Extension(ctx): Extension<AppContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<CancellationResponse>, AppError> {
    let record = load(&state, id).await?;
    ensure_owner(&ctx, &record)?;

    let (cancelled, refund) = state
        .bookings
        .cancel(id, &state.refunds)
        .await
        .map_err(AppError::from_store)?;
    info!("Cancellation of {} settled", cancelled.booking.pnr);

    Ok(Json(CancellationResponse {
        booking_id: cancelled.booking.id,
        pnr: cancelled.booking.pnr,
        status: cancelled.booking.status,
        refund,
    }))
}
