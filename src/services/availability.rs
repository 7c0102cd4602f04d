//! Comprobación de disponibilidad
//!
//! Detección de solapamiento de rangos de fechas con semántica de extremos
//! inclusivos y granularidad de día calendario completo. Solo las reservas
//! activas (pending/confirmed) bloquean la disponibilidad.
//!
//! Nota: esta comprobación en memoria se repite en SQL dentro de la
//! transacción de creación (ver `BookingRepository::create`), con un lock de
//! fila sobre el vehículo, para cerrar la carrera check-then-insert.

use chrono::NaiveDate;

use crate::models::booking::Booking;
use crate::services::BookingRuleError;

/// Validar que el rango de fechas es coherente (end >= start)
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), BookingRuleError> {
    if end < start {
        return Err(BookingRuleError::InvalidDateRange(
            "la fecha de fin no puede ser anterior a la de inicio".to_string(),
        ));
    }
    Ok(())
}

/// Test de intersección de intervalos inclusivos [s1,e1] y [s2,e2]
pub fn ranges_overlap(s1: NaiveDate, e1: NaiveDate, s2: NaiveDate, e2: NaiveDate) -> bool {
    s1 <= e2 && e1 >= s2
}

/// Buscar una reserva activa que entre en conflicto con el rango candidato
///
/// Las reservas canceladas o completadas nunca bloquean.
pub fn find_conflict<'a>(
    start: NaiveDate,
    end: NaiveDate,
    existing: &'a [Booking],
) -> Option<&'a Booking> {
    existing
        .iter()
        .filter(|b| b.status().map(|s| s.is_active()).unwrap_or(false))
        .find(|b| ranges_overlap(start, end, b.start_date, b.end_date))
}

/// Determinar si el rango candidato está disponible
pub fn is_available(start: NaiveDate, end: NaiveDate, existing: &[Booking]) -> bool {
    find_conflict(start, end, existing).is_none()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn booking(start: NaiveDate, end: NaiveDate, status: &str) -> Booking {
        Booking {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            renter_id: Uuid::new_v4(),
            start_date: start,
            end_date: end,
            total_amount: Decimal::from(100),
            status: status.to_string(),
            payment_status: "pending".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_overlapping_range_is_rejected() {
        let existing = vec![booking(date(2024, 6, 10), date(2024, 6, 15), "confirmed")];
        // Solapa en los días 14-15
        assert!(!is_available(date(2024, 6, 14), date(2024, 6, 20), &existing));
    }

    #[test]
    fn test_adjacent_range_is_available() {
        let existing = vec![booking(date(2024, 6, 10), date(2024, 6, 15), "confirmed")];
        assert!(is_available(date(2024, 6, 16), date(2024, 6, 20), &existing));
    }

    #[test]
    fn test_contained_range_is_rejected() {
        let existing = vec![booking(date(2024, 6, 10), date(2024, 6, 20), "pending")];
        assert!(!is_available(date(2024, 6, 12), date(2024, 6, 14), &existing));
    }

    #[test]
    fn test_shared_endpoint_is_rejected() {
        let existing = vec![booking(date(2024, 6, 10), date(2024, 6, 15), "pending")];
        assert!(!is_available(date(2024, 6, 15), date(2024, 6, 18), &existing));
    }

    #[test]
    fn test_cancelled_and_completed_do_not_block() {
        let existing = vec![
            booking(date(2024, 6, 10), date(2024, 6, 15), "cancelled"),
            booking(date(2024, 6, 12), date(2024, 6, 18), "completed"),
        ];
        assert!(is_available(date(2024, 6, 14), date(2024, 6, 20), &existing));
    }

    #[test]
    fn test_invalid_date_range() {
        assert!(validate_date_range(date(2024, 6, 10), date(2024, 6, 9)).is_err());
        assert!(validate_date_range(date(2024, 6, 10), date(2024, 6, 10)).is_ok());
    }
}
