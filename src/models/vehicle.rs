//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle con sus tarifas de alquiler.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use rust_decimal::Decimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Vehicle {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: String,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub price_per_day: Decimal,
    pub price_per_week: Option<Decimal>,
    pub price_per_month: Option<Decimal>,
    pub location: Option<String>,
    pub availability: bool,
    pub created_at: DateTime<Utc>,
}
