use std::net::SocketAddr;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_booking::{app, config::Config, AppState};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cinema Booking API ({})", config.app.environment);

    // Build the shared application state
    let host: std::net::IpAddr = config.app.host.parse()?;
    let port = config.app.port;
    let app_state = AppState::new(config)?;
    info!(
        "Seat layout ready: {} rows, {} VIP rows",
        app_state.config.seating.rows, app_state.config.seating.vip_rows
    );

    // --- Start background tasks ---

    // Task to evict abandoned booking sessions
    let sessions = app_state.sessions.clone();
    let ttl = app_state.config.sessions.ttl();
    let mut cleanup = tokio::time::interval(app_state.config.sessions.cleanup_interval());
    tokio::spawn(async move {
        loop {
            cleanup.tick().await;
            sessions.evict_expired(ttl).await;
        }
    });

    // --- Start the web server ---
    let addr = SocketAddr::new(host, port);
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app(app_state).into_make_service()).await?;

    Ok(())
}
