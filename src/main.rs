mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use config::environment::EnvironmentConfig;
use database::DatabaseConnection;
use middleware::cors::cors_middleware;
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::default();

    // Logging verboso solo en desarrollo
    let log_level = if config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    info!("🚗 Vehicle Rental Marketplace - API");
    info!("===================================");
    info!("🔧 Entorno: {}", config.environment);

    // Inicializar base de datos
    let db_connection = match DatabaseConnection::new_default().await {
        Ok(conn) => conn,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    let pool = db_connection.pool().clone();
    info!("✅ Base de datos conectada exitosamente");

    let addr: SocketAddr = config.server_url().parse()?;
    let cors = cors_middleware(&config.cors_origins);

    let app_state = AppState::new(pool, config);

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .nest("/api/auth", routes::auth_routes::create_auth_router())
        .nest("/api/vehicles", routes::vehicle_routes::create_vehicle_router())
        .nest("/api/bookings", routes::booking_routes::create_booking_router())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("🔑 Endpoints - Auth:");
    info!("   POST /api/auth/register - Registrar usuario");
    info!("   POST /api/auth/login - Login");
    info!("🚙 Endpoints - Vehicles:");
    info!("   POST  /api/vehicles - Publicar vehículo");
    info!("   GET   /api/vehicles - Buscar vehículos");
    info!("   GET   /api/vehicles/owner - Vehículos del owner");
    info!("   GET   /api/vehicles/:id - Detalle de vehículo");
    info!("   PATCH /api/vehicles/:id/availability - Cambiar disponibilidad");
    info!("   DELETE /api/vehicles/:id - Eliminar vehículo");
    info!("📅 Endpoints - Bookings:");
    info!("   POST  /api/bookings - Crear reserva");
    info!("   GET   /api/bookings - Listar reservas (por rol)");
    info!("   PATCH /api/bookings/:id/status - Cambiar estado de reserva");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "service": "vehicle_rental",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("❌ Error esperando señal de shutdown: {}", e);
    }
    info!("👋 Apagando servidor...");
}
