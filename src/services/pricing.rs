//! Cálculo de precios de alquiler
//!
//! Tarifas escalonadas por día/semana/mes. La tarifa mensual aplica a partir
//! de 30 días y la semanal a partir de 7; los días sueltos restantes se
//! cobran siempre a tarifa diaria.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Duración de una reserva en días (mínimo 1)
pub fn duration_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().max(1)
}

/// Calcular el importe total de una reserva
///
/// Función pura: mismas entradas, mismo total. Nunca negativo con
/// tarifas válidas (`price_per_day > 0`).
pub fn rental_total(
    price_per_day: Decimal,
    price_per_week: Option<Decimal>,
    price_per_month: Option<Decimal>,
    start: NaiveDate,
    end: NaiveDate,
) -> Decimal {
    let days = duration_days(start, end);

    if days >= 30 {
        if let Some(monthly) = price_per_month {
            let months = days / 30;
            let remainder = days % 30;
            return Decimal::from(months) * monthly + Decimal::from(remainder) * price_per_day;
        }
    }

    if days >= 7 {
        if let Some(weekly) = price_per_week {
            let weeks = days / 7;
            let remainder = days % 7;
            return Decimal::from(weeks) * weekly + Decimal::from(remainder) * price_per_day;
        }
    }

    Decimal::from(days) * price_per_day
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn test_weekly_rate_for_ten_days() {
        // 10 días = 1 semana + 3 días: 1800 + 3*300 = 2700
        let total = rental_total(
            dec(300),
            Some(dec(1800)),
            Some(dec(7000)),
            date(2024, 6, 1),
            date(2024, 6, 11),
        );
        assert_eq!(total, dec(2700));
    }

    #[test]
    fn test_monthly_rate_for_thirty_five_days() {
        // 35 días = 1 mes + 5 días: 7000 + 5*300 = 8500
        let total = rental_total(
            dec(300),
            Some(dec(1800)),
            Some(dec(7000)),
            date(2024, 6, 1),
            date(2024, 7, 6),
        );
        assert_eq!(total, dec(8500));
    }

    #[test]
    fn test_daily_rate_for_three_days() {
        let total = rental_total(
            dec(300),
            Some(dec(1800)),
            Some(dec(7000)),
            date(2024, 6, 1),
            date(2024, 6, 4),
        );
        assert_eq!(total, dec(900));
    }

    #[test]
    fn test_weekly_duration_without_weekly_rate_uses_daily() {
        let total = rental_total(dec(300), None, None, date(2024, 6, 1), date(2024, 6, 11));
        assert_eq!(total, dec(3000));
    }

    #[test]
    fn test_monthly_duration_without_monthly_rate_falls_back_to_weekly() {
        // 35 días = 5 semanas exactas a tarifa semanal
        let total = rental_total(dec(300), Some(dec(1800)), None, date(2024, 6, 1), date(2024, 7, 6));
        assert_eq!(total, dec(9000));
    }

    #[test]
    fn test_same_day_counts_as_one_day() {
        let total = rental_total(dec(300), None, None, date(2024, 6, 1), date(2024, 6, 1));
        assert_eq!(total, dec(300));
    }

    #[test]
    fn test_pricing_is_idempotent() {
        let args = (dec(300), Some(dec(1800)), Some(dec(7000)), date(2024, 6, 1), date(2024, 6, 11));
        let first = rental_total(args.0, args.1, args.2, args.3, args.4);
        let second = rental_total(args.0, args.1, args.2, args.3, args.4);
        assert_eq!(first, second);
    }
}
