//! Date to stardate conversion.
//!
//! Formulas follow trekguide.com/Stardates.htm (Classic, XI, SOL) and the
//! Wikipedia reading of the XI stardates. `day` below is the 1-based
//! ordinal day of the year.

use crate::domain::{StardateConfig, StardateStyle};
use crate::ports::Result;
use crate::utils::parse_post_date;
use chrono::{Datelike, Local, NaiveDateTime};

const TROPICAL_YEAR_DAYS: f64 = 365.2422;

// SOL epoch offsets, kept as published
const SOL_DAY_PIVOT: f64 = 143.9;
const SOL_DAY_CARRY: f64 = 221.3422;
const SOL_YEAR_AFTER_PIVOT: i32 = 1922;
const SOL_YEAR_BEFORE_PIVOT: i32 = 1923;

/// Renders `date` as `"{prefix} {stardate}"`
/// The separating space is always present, so an empty prefix yields a
/// leading space.
pub fn calculate(date: NaiveDateTime, config: &StardateConfig) -> String {
    format!("{} {}", config.prefix, stardate(date, config.style))
}

/// Same as [`calculate`] for a raw date string
pub fn calculate_str(date: &str, config: &StardateConfig) -> Result<String> {
    let date = parse_post_date(date)?;
    Ok(calculate(date, config))
}

/// Stardate of the current local time
pub fn calculate_now(config: &StardateConfig) -> String {
    calculate(Local::now().naive_local(), config)
}

fn stardate(date: NaiveDateTime, style: StardateStyle) -> String {
    let year = date.year();
    let day = date.ordinal();

    match style {
        StardateStyle::XI => {
            let fraction = f64::from(day) / TROPICAL_YEAR_DAYS * 100.0;
            format!("{}.{:02}", year, fraction as u32)
        }
        StardateStyle::XIWikipedia => format!("{}.{:03}", year, day),
        StardateStyle::SOL => {
            let (day, yy) = if f64::from(day) > SOL_DAY_PIVOT {
                (f64::from(day) - SOL_DAY_PIVOT, year - SOL_YEAR_AFTER_PIVOT)
            } else {
                (f64::from(day) + SOL_DAY_CARRY, year - SOL_YEAR_BEFORE_PIVOT)
            };
            let scaled = day / TROPICAL_YEAR_DAYS * 1000.0;
            let tenths = (scaled.fract() * 10.0) as u32;
            format!("{}{:03}.{}", yy, scaled as u32, tenths)
        }
        StardateStyle::Classic => {
            format!("{}{:02}.{:02}", year - 1900, date.month(), date.day())
        }
    }
}
