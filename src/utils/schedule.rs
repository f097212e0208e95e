//! Enumeración de días programados
//!
//! Usado para materializar rides de una suscripción y para crear
//! assignments en bloque.

use chrono::{Datelike, NaiveDate, Weekday};
use std::str::FromStr;

/// Fechas en `[start, end)` cuyo día de la semana está en `days`
pub fn dates_matching(start: NaiveDate, end: NaiveDate, days: &[Weekday]) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|date| *date < end)
        .filter(|date| days.contains(&date.weekday()))
        .collect()
}

/// Parsear nombres de días ("monday", "Mon", ...) sin duplicados
pub fn parse_weekdays(names: &[String]) -> Result<Vec<Weekday>, String> {
    let mut days = Vec::with_capacity(names.len());
    for name in names {
        let day = Weekday::from_str(name.trim()).map_err(|_| name.clone())?;
        if !days.contains(&day) {
            days.push(day);
        }
    }
    Ok(days)
}

/// Nombre en minúsculas para persistir
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
