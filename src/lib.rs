pub mod config;
pub mod models;
pub mod services;
pub mod movie_client;
pub mod sessions;
pub mod controllers;

use axum::{routing::get, Router};
use std::sync::Arc;
use thiserror::Error;
use tower_http::trace::TraceLayer;

use services::{
    catalog::ConfigurationError,
    payment::{MockPaymentGateway, PaymentCollaborator},
    schedule::Schedule,
};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid seat layout: {0}")]
    SeatLayout(#[from] ConfigurationError),
    #[error("failed to build movie service client: {0}")]
    MovieClient(#[from] movie_client::CatalogError),
}

// Shared state для всего приложения
#[derive(Clone)]
pub struct AppState {
    pub config: config::Config,
    pub movies: movie_client::MovieCatalogClient,
    pub schedule: Schedule,
    pub sessions: sessions::SessionStore,
    pub payment: Arc<dyn PaymentCollaborator>,
}

impl AppState {
    pub fn new(config: config::Config) -> Result<Arc<Self>, StartupError> {
        let payment = Arc::new(MockPaymentGateway::from_config(&config.payment));
        Self::with_payment(config, payment)
    }

    /// Состояние с произвольной платёжной системой.
    pub fn with_payment(
        config: config::Config,
        payment: Arc<dyn PaymentCollaborator>,
    ) -> Result<Arc<Self>, StartupError> {
        let movies = movie_client::MovieCatalogClient::from_config(&config.tmdb)?;
        let sessions = sessions::SessionStore::from_config(&config.seating)?;
        let schedule = Schedule::reference(config.pricing.price_table());

        Ok(Arc::new(Self {
            config,
            movies,
            schedule,
            sessions,
            payment,
        }))
    }
}

/// Главный роутер: служебные маршруты и API под `/api`.
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Cinema Booking API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
