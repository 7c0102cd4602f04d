use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use validator::Validate;

use crate::models::vehicle::Vehicle;

// Request para publicar un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateVehicleRequest {
    #[validate(length(min = 2, max = 255))]
    pub name: String,

    pub description: Option<String>,

    #[validate(length(min = 2, max = 100))]
    pub category: String,

    pub brand: Option<String>,
    pub model: Option<String>,

    #[validate(range(min = 1900, max = 2100))]
    pub year: Option<i32>,

    pub price_per_day: Decimal,
    pub price_per_week: Option<Decimal>,
    pub price_per_month: Option<Decimal>,

    pub location: Option<String>,
}

// Request para cambiar la disponibilidad
#[derive(Debug, Deserialize)]
pub struct UpdateAvailabilityRequest {
    pub availability: bool,
}

// Filtros de búsqueda del listado público
#[derive(Debug, Default, Deserialize)]
pub struct VehicleListQuery {
    pub category: Option<String>,
    pub location: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

// Response de vehículo
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
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

impl From<Vehicle> for VehicleResponse {
    fn from(v: Vehicle) -> Self {
        Self {
            id: v.id,
            owner_id: v.owner_id,
            name: v.name,
            description: v.description,
            category: v.category,
            brand: v.brand,
            model: v.model,
            year: v.year,
            price_per_day: v.price_per_day,
            price_per_week: v.price_per_week,
            price_per_month: v.price_per_month,
            location: v.location,
            availability: v.availability,
            created_at: v.created_at,
        }
    }
}

// Detalle de vehículo con el nombre del propietario
#[derive(Debug, Serialize)]
pub struct VehicleDetailResponse {
    #[serde(flatten)]
    pub vehicle: VehicleResponse,
    pub owner_name: String,
}
