//! Modelo de Booking
//!
//! Este módulo contiene el struct Booking y los enums de estado del
//! ciclo de vida de una reserva. Los bookings nunca se borran físicamente;
//! solo avanzan de estado según la tabla de transiciones.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use rust_decimal::Decimal;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Estado del ciclo de vida de una reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(BookingStatus::Pending),
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "completed" => Some(BookingStatus::Completed),
            _ => None,
        }
    }

    /// Estados terminales: sin transiciones salientes
    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Cancelled | BookingStatus::Completed)
    }

    /// Estados activos: bloquean la disponibilidad del vehículo
    pub fn is_active(&self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Confirmed)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estado de pago de una reserva
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

/// Booking principal - mapea exactamente a la tabla bookings
///
/// Las fechas son días calendario inclusivos: una reserva [start_date, end_date]
/// ocupa ambos extremos.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub renter_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_amount: Decimal,
    pub status: String,
    pub payment_status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn status(&self) -> Option<BookingStatus> {
        BookingStatus::from_str(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for s in ["pending", "confirmed", "cancelled", "completed"] {
            assert_eq!(BookingStatus::from_str(s).unwrap().as_str(), s);
        }
        assert_eq!(BookingStatus::from_str("rejected"), None);
    }

    #[test]
    fn test_terminal_and_active_states() {
        assert!(BookingStatus::Cancelled.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(BookingStatus::Pending.is_active());
        assert!(BookingStatus::Confirmed.is_active());
        assert!(!BookingStatus::Cancelled.is_active());
    }
}
