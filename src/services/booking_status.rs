//! Máquina de estados de booking
//!
//! Transiciones permitidas, condicionadas por el rol del actor:
//!
//! | Rol    | Desde     | Hacia                 |
//! |--------|-----------|-----------------------|
//! | owner  | pending   | confirmed, cancelled  |
//! | owner  | confirmed | completed, cancelled  |
//! | renter | pending   | cancelled             |
//! | renter | confirmed | cancelled             |
//!
//! `cancelled` y `completed` son terminales. La autorización (que el actor
//! sea realmente el owner del vehículo o el renter de la reserva) se
//! comprueba antes de consultar esta tabla, en el controller.

use crate::models::booking::BookingStatus;
use crate::models::user::UserRole;
use crate::services::BookingRuleError;

/// Validar una transición de estado para un rol dado
///
/// Devuelve `InvalidTransition` con la tripleta (rol, desde, hacia) si la
/// transición no está en la tabla. El caller no debe mutar estado en ese caso.
pub fn validate_transition(
    role: UserRole,
    from: BookingStatus,
    to: BookingStatus,
) -> Result<(), BookingRuleError> {
    let allowed = match (role, from) {
        (UserRole::Owner, BookingStatus::Pending) => {
            matches!(to, BookingStatus::Confirmed | BookingStatus::Cancelled)
        }
        (UserRole::Owner, BookingStatus::Confirmed) => {
            matches!(to, BookingStatus::Completed | BookingStatus::Cancelled)
        }
        (UserRole::Renter, BookingStatus::Pending | BookingStatus::Confirmed) => {
            matches!(to, BookingStatus::Cancelled)
        }
        // Estados terminales: sin transiciones salientes para nadie
        _ => false,
    };

    if allowed {
        Ok(())
    } else {
        Err(BookingRuleError::InvalidTransition { role, from, to })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;
    use UserRole::*;

    #[test]
    fn test_owner_confirms_pending() {
        assert!(validate_transition(Owner, Pending, Confirmed).is_ok());
    }

    #[test]
    fn test_owner_completes_or_cancels_confirmed() {
        assert!(validate_transition(Owner, Confirmed, Completed).is_ok());
        assert!(validate_transition(Owner, Confirmed, Cancelled).is_ok());
    }

    #[test]
    fn test_renter_cannot_confirm() {
        let err = validate_transition(Renter, Pending, Confirmed).unwrap_err();
        assert_eq!(
            err,
            BookingRuleError::InvalidTransition {
                role: Renter,
                from: Pending,
                to: Confirmed,
            }
        );
    }

    #[test]
    fn test_renter_can_cancel() {
        assert!(validate_transition(Renter, Pending, Cancelled).is_ok());
        assert!(validate_transition(Renter, Confirmed, Cancelled).is_ok());
    }

    #[test]
    fn test_terminal_states_have_no_outgoing_transitions() {
        for role in [Owner, Renter] {
            for from in [Cancelled, Completed] {
                for to in [Pending, Confirmed, Cancelled, Completed] {
                    assert!(validate_transition(role, from, to).is_err());
                }
            }
        }
    }

    #[test]
    fn test_owner_cannot_skip_to_completed() {
        assert!(validate_transition(Owner, Pending, Completed).is_err());
    }

    #[test]
    fn test_no_self_transitions() {
        assert!(validate_transition(Owner, Pending, Pending).is_err());
        assert!(validate_transition(Owner, Confirmed, Confirmed).is_err());
    }
}
