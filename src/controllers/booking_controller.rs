//! Controller de bookings
//!
//! Orquesta el flujo de creación y transición de reservas alrededor de las
//! reglas puras de `services`: validación de fechas, chequeo de
//! disponibilidad, cálculo de precio y máquina de estados.

use crate::dto::booking_dto::{
    BookingListQuery, BookingRenterSummary, BookingResponse, BookingStatusResponse,
    BookingVehicleSummary, CreateBookingRequest, UpdateBookingStatusRequest,
};
use crate::dto::ApiResponse;
use crate::models::user::UserRole;
use crate::repositories::booking_repository::{
    BookingListFilters, BookingListRow, BookingRepository,
};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::services::{availability, booking_status, pricing, BookingRuleError};
use crate::utils::errors::AppError;
use sqlx::PgPool;
use uuid::Uuid;

pub struct BookingController {
    bookings: BookingRepository,
    vehicles: VehicleRepository,
}

impl BookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            bookings: BookingRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        actor_id: Uuid,
        actor_role: UserRole,
        request: CreateBookingRequest,
    ) -> Result<ApiResponse<BookingResponse>, AppError> {
        // Solo los renters crean reservas
        if actor_role != UserRole::Renter {
            return Err(AppError::Forbidden(
                "Solo los arrendatarios pueden crear reservas".to_string(),
            ));
        }

        availability::validate_date_range(request.start_date, request.end_date)?;

        // El vehículo debe existir y estar publicado como disponible
        let vehicle = self
            .vehicles
            .find_by_id(request.vehicle_id)
            .await?
            .filter(|v| v.availability)
            .ok_or_else(|| {
                AppError::NotFound("Vehículo no encontrado o no disponible".to_string())
            })?;

        // Pre-chequeo de disponibilidad contra las reservas activas. La
        // garantía real la da la transacción con lock en el repositorio;
        // esto solo evita abrir transacciones para rechazos obvios.
        let active = self.bookings.find_active_for_vehicle(vehicle.id).await?;
        if !availability::is_available(request.start_date, request.end_date, &active) {
            return Err(BookingRuleError::VehicleUnavailable.into());
        }

        let total = pricing::rental_total(
            vehicle.price_per_day,
            vehicle.price_per_week,
            vehicle.price_per_month,
            request.start_date,
            request.end_date,
        );

        let booking = self
            .bookings
            .create(
                vehicle.id,
                actor_id,
                request.start_date,
                request.end_date,
                total,
            )
            .await?;

        tracing::info!(
            "Reserva {} creada: vehículo {} del {} al {} por {}",
            booking.id,
            booking.vehicle_id,
            booking.start_date,
            booking.end_date,
            booking.total_amount
        );

        Ok(ApiResponse::success_with_message(
            booking.into(),
            "Reserva creada exitosamente".to_string(),
        ))
    }

    pub async fn list(
        &self,
        actor_id: Uuid,
        actor_role: UserRole,
        query: BookingListQuery,
    ) -> Result<Vec<BookingResponse>, AppError> {
        let filters = BookingListFilters {
            status: query.status,
            start_date: query.start_date,
            end_date: query.end_date,
        };

        let rows = match actor_role {
            UserRole::Renter => self.bookings.list_for_renter(actor_id, &filters).await?,
            UserRole::Owner => self.bookings.list_for_owner(actor_id, &filters).await?,
        };

        let include_renter = actor_role == UserRole::Owner;

        Ok(rows
            .into_iter()
            .map(|row| Self::to_response(row, include_renter))
            .collect())
    }

    pub async fn update_status(
        &self,
        booking_id: Uuid,
        actor_id: Uuid,
        actor_role: UserRole,
        request: UpdateBookingStatusRequest,
    ) -> Result<ApiResponse<BookingStatusResponse>, AppError> {
        let row = self
            .bookings
            .find_with_vehicle_owner(booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Reserva no encontrada".to_string()))?;

        // Autorización antes de consultar la tabla de transiciones: el actor
        // tiene que ser realmente el owner del vehículo o el renter de la reserva
        let authorized = match actor_role {
            UserRole::Owner => row.owner_id == actor_id,
            UserRole::Renter => row.booking.renter_id == actor_id,
        };

        if !authorized {
            return Err(AppError::Forbidden(
                "No estás autorizado para actualizar esta reserva".to_string(),
            ));
        }

        let from = row.booking.status().ok_or_else(|| {
            AppError::Internal(format!("Estado desconocido en DB: {}", row.booking.status))
        })?;

        booking_status::validate_transition(actor_role, from, request.status)?;

        // Compare-and-set contra el estado validado: si otra request ya movió
        // la reserva, el repositorio devuelve Conflict en lugar de pisarla
        let updated = self
            .bookings
            .update_status(booking_id, from, request.status)
            .await?;

        tracing::info!(
            "Reserva {} pasó de '{}' a '{}' por {}",
            booking_id,
            from,
            updated.status,
            actor_role
        );

        Ok(ApiResponse::success_with_message(
            BookingStatusResponse {
                id: updated.id,
                status: updated.status,
            },
            "Estado de la reserva actualizado exitosamente".to_string(),
        ))
    }

    fn to_response(row: BookingListRow, include_renter: bool) -> BookingResponse {
        let renter = if include_renter {
            match (row.renter_name, row.renter_email) {
                (Some(name), Some(email)) => Some(BookingRenterSummary { name, email }),
                _ => None,
            }
        } else {
            None
        };

        let mut response = BookingResponse::from(row.booking);
        response.vehicle = Some(BookingVehicleSummary {
            name: row.vehicle_name,
            brand: row.vehicle_brand,
            model: row.vehicle_model,
        });
        response.renter = renter;
        response
    }
}
