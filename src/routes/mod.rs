//! Routers de la API
//!
//! Cada recurso expone su propio `Router<AppState>`; `main` los anida
//! bajo `/api`.

pub mod auth_routes;
pub mod booking_routes;
pub mod vehicle_routes;
