//! Day-number arithmetic over the proleptic Gregorian calendar.
//!
//! A day number counts days since January 1, 0001 (day 0). All date encodings
//! derive their day fields from these helpers.

use super::*;
use sqlnorm_common::{Result, error::Error};

const DAYS_TO_MONTH_365: [i32; 13] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334, 365];
const DAYS_TO_MONTH_366: [i32; 13] = [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335, 366];

/// Day number of December 31, 9999.
pub const MAX_DAY_NUMBER: i32 = DAYS_TO_10000 - 1;

/// Day number of January 1, 1900, the base date of the legacy `datetime` and
/// `smalldatetime` encodings.
pub const SQL_BASE_DAY_NUMBER: i32 = 693595;

pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

pub fn days_in_month(year: i32, month: i32) -> i32 {
    let days = month_table(year);
    days[month as usize] - days[(month - 1) as usize]
}

fn month_table(year: i32) -> &'static [i32; 13] {
    if is_leap_year(year) {
        &DAYS_TO_MONTH_366
    } else {
        &DAYS_TO_MONTH_365
    }
}

/// Converts a civil date to its day number.
pub fn days_from_civil(year: i32, month: i32, day: i32) -> Result<i32> {
    if !(1..=9999).contains(&year) {
        return Err(Error::out_of_range("year", year.to_string()));
    }
    if !(1..=12).contains(&month) {
        return Err(Error::out_of_range("month", month.to_string()));
    }
    if day < 1 || day > days_in_month(year, month) {
        return Err(Error::out_of_range("day", format!("{year}-{month:02}-{day:02}")));
    }
    let y = year - 1;
    Ok(y * 365 + y / 4 - y / 100 + y / 400 + month_table(year)[(month - 1) as usize] + day - 1)
}

/// Converts a day number in `0..=MAX_DAY_NUMBER` to `(year, month, day)`.
pub fn civil_from_days(day_number: i32) -> Result<(i32, i32, i32)> {
    if !(0..=MAX_DAY_NUMBER).contains(&day_number) {
        return Err(Error::out_of_range(
            "day number",
            format!("{day_number} is outside 0..={MAX_DAY_NUMBER}"),
        ));
    }
    let mut n = day_number;
    let y400 = n / DAYS_PER_400_YEARS;
    n -= y400 * DAYS_PER_400_YEARS;
    // The last day of a 400-year cycle belongs to the fourth century.
    let y100 = (n / DAYS_PER_100_YEARS).min(3);
    n -= y100 * DAYS_PER_100_YEARS;
    let y4 = n / DAYS_PER_4_YEARS;
    n -= y4 * DAYS_PER_4_YEARS;
    let y1 = (n / DAYS_PER_YEAR).min(3);
    n -= y1 * DAYS_PER_YEAR;

    let year = y400 * 400 + y100 * 100 + y4 * 4 + y1 + 1;
    let days = month_table(year);
    let mut month = 1;
    while n >= days[month as usize] {
        month += 1;
    }
    Ok((year, month, n - days[(month - 1) as usize] + 1))
}
