use std::sync::Arc;
use std::net::SocketAddr;
use rail_api::{app, state::AppState, worker};
use rail_store::{seed, Config, InMemoryBookingRepository};
use rail_ticket::TicketRenderer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rail_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load()?;
    tracing::info!("Starting Rail API on port {}", config.server.port);

    let today = chrono::Local::now().date_naive();
    let fares = config.fares.clone();
    let repo = Arc::new(InMemoryBookingRepository::with_records(seed::demo_records(
        today,
        |base| fares.details(base),
    )));

    let app_state = AppState::new(
        repo.clone(),
        config.fares.clone(),
        config.refunds.clone(),
        config.endpoints.registry(),
        TicketRenderer::new(config.tickets.watermark.clone()),
    );

    tokio::spawn(worker::start_event_audit(app_state.events_tx.subscribe()));
    tokio::spawn(worker::start_ticket_issuer(
        app_state.events_tx.subscribe(),
        repo,
        app_state.renderer.clone(),
        config.tickets.output_dir.clone(),
    ));

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
