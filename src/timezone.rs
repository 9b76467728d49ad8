use time::{OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// The current UTC offset of a canonical timezone, e.g. "Europe/Moscow".
///
/// Returns `None` if the timezone name is not known.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

#[cfg(test)]
mod tests {
    use time::UtcOffset;

    use super::get_local_offset;

    #[test]
    fn resolves_fixed_offset_timezone() {
        // Moscow has not observed daylight saving time since 2014.
        assert_eq!(
            get_local_offset("Europe/Moscow"),
            Some(UtcOffset::from_hms(3, 0, 0).unwrap())
        );
    }

    #[test]
    fn unknown_timezone_is_none() {
        assert_eq!(get_local_offset("Mars/Olympus_Mons"), None);
    }
}
