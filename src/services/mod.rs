//! Services module
//!
//! Este módulo contiene las reglas de negocio de las reservas: cálculo de
//! precios, comprobación de disponibilidad y la máquina de estados de booking.
//! Los servicios son funciones puras sin efectos secundarios; la capa de
//! persistencia (repositories) los invoca alrededor de sus queries.

pub mod availability;
pub mod booking_status;
pub mod pricing;

pub use availability::*;
pub use booking_status::*;
pub use pricing::*;

use thiserror::Error;

use crate::models::booking::BookingStatus;
use crate::models::user::UserRole;

/// Errores deterministas de las reglas de reserva
///
/// Ninguno es reintentable: con los mismos inputs el resultado es el mismo.
/// Se convierten a errores HTTP en `utils::errors`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BookingRuleError {
    #[error("Rango de fechas inválido: {0}")]
    InvalidDateRange(String),

    #[error("El vehículo no está disponible para las fechas seleccionadas")]
    VehicleUnavailable,

    #[error("No se puede cambiar el estado de '{from}' a '{to}' como {role}")]
    InvalidTransition {
        role: UserRole,
        from: BookingStatus,
        to: BookingStatus,
    },
}
