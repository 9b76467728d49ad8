//! Formatting of transaction timestamps for display.

use time::{
    Date, OffsetDateTime, PrimitiveDateTime, UtcOffset,
    format_description::{BorrowedFormatItem, well_known::Rfc3339},
    macros::format_description,
};

use crate::Error;

const MONTH_NAMES: [&str; 12] = [
    "январь",
    "февраль",
    "март",
    "апрель",
    "май",
    "июнь",
    "июль",
    "август",
    "сентябрь",
    "октябрь",
    "ноябрь",
    "декабрь",
];

const SPACE_SEPARATED_FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
    "[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"
);
const T_SEPARATED_FORMAT: &[BorrowedFormatItem<'_>] = format_description!(
    "[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
);
const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Format a timestamp such as "2019-03-10 03:20:41" as
/// "10 март 2019 г. в 03:20".
///
/// Timestamps without an offset are taken to already be in local time and are
/// not converted. Timestamps with an offset (RFC 3339) are converted to
/// `local_offset` first. A bare date is shown at midnight.
///
/// # Errors
///
/// Returns [Error::InvalidDate] if `date` is not in one of the formats above.
pub fn format_date(date: &str, local_offset: UtcOffset) -> Result<String, Error> {
    let local = parse_local(date.trim(), local_offset)
        .ok_or_else(|| Error::InvalidDate(date.to_owned()))?;
    let month = MONTH_NAMES[usize::from(u8::from(local.month())) - 1];

    Ok(format!(
        "{} {month} {} г. в {:02}:{:02}",
        local.day(),
        local.year(),
        local.hour(),
        local.minute()
    ))
}

fn parse_local(date: &str, local_offset: UtcOffset) -> Option<PrimitiveDateTime> {
    if let Ok(date_time) = OffsetDateTime::parse(date, &Rfc3339) {
        let local = date_time.checked_to_offset(local_offset)?;
        return Some(PrimitiveDateTime::new(local.date(), local.time()));
    }

    PrimitiveDateTime::parse(date, SPACE_SEPARATED_FORMAT)
        .or_else(|_| PrimitiveDateTime::parse(date, T_SEPARATED_FORMAT))
        .or_else(|_| Date::parse(date, DATE_FORMAT).map(Date::midnight))
        .ok()
}
