// Month grid for the dashboard's navigation calendar
use chrono::{Datelike, Month, NaiveDate};
use shared::models::CalendarGrid;

use crate::error::EngineError;

/// Lays out `month` of `year` as Monday-first weeks.
///
/// Rows always hold 7 cells; days of the neighbouring months are
/// [`CalendarGrid::SENTINEL`]. Depending on alignment the grid has 4, 5 or 6 rows.
pub fn build_month_grid(year: i32, month: u32) -> Result<CalendarGrid, EngineError> {
    if !(1..=12).contains(&month) {
        return Err(EngineError::invalid_input(format!(
            "month must be within 1..=12, got {}",
            month
        )));
    }
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::invalid_input(format!("year {} is out of the supported range", year)))?;
    let days = days_in_month(year, month)?;

    let mut weeks = Vec::with_capacity(6);
    let mut week = [CalendarGrid::SENTINEL; 7];
    let mut col = first.weekday().num_days_from_monday() as usize;
    for day in 1..=days {
        week[col] = day;
        col += 1;
        if col == 7 {
            weeks.push(week);
            week = [CalendarGrid::SENTINEL; 7];
            col = 0;
        }
    }
    if col > 0 {
        weeks.push(week);
    }

    tracing::debug!(year, month, rows = weeks.len(), days, "Built month grid");
    Ok(CalendarGrid { year, month, weeks })
}

/// Number of days in `month` of `year`, leap years included.
///
/// Only looks at `year` itself, so the last month chrono can represent works too.
pub fn days_in_month(year: i32, month: u32) -> Result<u32, EngineError> {
    if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
        return Err(EngineError::invalid_input(format!("no such month: {}-{:02}", year, month)));
    }
    Ok(match month {
        4 | 6 | 9 | 11 => 30,
        2 if NaiveDate::from_ymd_opt(year, 2, 29).is_some() => 29,
        2 => 28,
        _ => 31,
    })
}

/// Accepts `"11"`, `"Nov"` or `"November"` (any case) and returns the month number.
pub fn parse_month(input: &str) -> Result<u32, EngineError> {
    let trimmed = input.trim();
    if let Ok(number) = trimmed.parse::<u32>() {
        return if (1..=12).contains(&number) {
            Ok(number)
        } else {
            Err(EngineError::invalid_input(format!("month must be within 1..=12, got {}", number)))
        };
    }
    trimmed
        .parse::<Month>()
        .map(|m| m.number_from_month())
        .map_err(|_| EngineError::invalid_input(format!("unrecognized month '{}'", input)))
}
