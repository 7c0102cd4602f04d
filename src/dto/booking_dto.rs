use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::models::booking::{Booking, BookingStatus};

// Request para crear una reserva
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub vehicle_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

// Request para cambiar el estado de una reserva
#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: BookingStatus,
}

// Filtros del listado de reservas
#[derive(Debug, Default, Deserialize)]
pub struct BookingListQuery {
    pub status: Option<BookingStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

// Resumen del vehículo asociado a una reserva
#[derive(Debug, Serialize)]
pub struct BookingVehicleSummary {
    pub name: String,
    pub brand: Option<String>,
    pub model: Option<String>,
}

// Datos de contacto del renter (solo visibles para el owner)
#[derive(Debug, Serialize)]
pub struct BookingRenterSummary {
    pub name: String,
    pub email: String,
}

// Response de reserva
#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub renter_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_amount: Decimal,
    pub status: String,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<BookingVehicleSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub renter: Option<BookingRenterSummary>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            vehicle_id: b.vehicle_id,
            renter_id: b.renter_id,
            start_date: b.start_date,
            end_date: b.end_date,
            total_amount: b.total_amount,
            status: b.status,
            payment_status: b.payment_status,
            created_at: b.created_at,
            vehicle: None,
            renter: None,
        }
    }
}

// Response del cambio de estado
#[derive(Debug, Serialize)]
pub struct BookingStatusResponse {
    pub id: Uuid,
    pub status: String,
}
