//! Payment date schedules.
//!
//! Semesters start every six months from the cohort start, and the
//! instalments of a semester are spaced two months apart from the
//! semester start.  The flat instalment-wise schedule spaces payments
//! one month apart across the whole program instead.
//!
//! Month arithmetic rolls over like a calendar `setMonth` does: a day
//! that does not exist in the target month spills into the next one
//! (31 Jan + 1 month is 3 Mar in a non-leap year), rather than being
//! clamped to the month's last day.

use crate::error::ValidationError;
use chrono::{Datelike, Days, Months, NaiveDate};

/// Moves `date` forward by `months` calendar months with day rollover.
/// Returns `None` past the end of the representable calendar.
pub fn add_months(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    date.with_day(1)?
        .checked_add_months(Months::new(months))?
        .checked_add_days(Days::new(u64::from(date.day() - 1)))
}

/// Start date of semester `semester_number` (1-based).  Semester 1
/// starts on the cohort start itself.
pub fn semester_start_date(semester_number: u32, cohort_start_date: NaiveDate) -> Option<NaiveDate> {
    add_months(cohort_start_date, semester_number.saturating_sub(1).checked_mul(6)?)
}

/// Due dates of the instalments of one semester, in order.
pub fn generate_semester_payment_dates(
    semester_number: u32,
    instalments_per_semester: u32,
    cohort_start_date: NaiveDate,
) -> Vec<NaiveDate> {
    let Some(start) = semester_start_date(semester_number, cohort_start_date) else {
        return Vec::new();
    };
    (0..instalments_per_semester)
        .map_while(|i| add_months(start, i.checked_mul(2)?))
        .collect()
}

/// One due date per semester, six months apart.
pub fn generate_semester_wise_payment_dates(
    number_of_semesters: u32,
    start_date: NaiveDate,
) -> Vec<NaiveDate> {
    (0..number_of_semesters)
        .map_while(|i| add_months(start_date, i.checked_mul(6)?))
        .collect()
}

/// One due date per instalment across the whole program, a month apart.
pub fn generate_installment_wise_payment_dates(
    total_installments: u32,
    start_date: NaiveDate,
) -> Vec<NaiveDate> {
    (0..total_installments)
        .map_while(|i| add_months(start_date, i))
        .collect()
}

/// Due date of instalment `installment_number` (1-based) of `semester`.
pub fn get_installment_payment_date(
    semester: u32,
    installment_number: u32,
    instalments_per_semester: u32,
    cohort_start_date: NaiveDate,
) -> Option<NaiveDate> {
    let index = installment_number.checked_sub(1)? as usize;
    generate_semester_payment_dates(semester, instalments_per_semester, cohort_start_date)
        .get(index)
        .copied()
}

/// Display form, e.g. `05 Jan 2025`.
pub fn format_payment_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

/// Parses a strict `YYYY-MM-DD` string.
pub fn parse_date_string(value: &str) -> Result<NaiveDate, ValidationError> {
    let bytes = value.as_bytes();
    let shaped = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !shaped {
        return Err(ValidationError::InvalidDate(value.to_string()));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| ValidationError::InvalidDate(value.to_string()))
}

pub fn is_valid_date_string(value: &str) -> bool {
    parse_date_string(value).is_ok()
}
