use time::{macros::format_description, Duration, OffsetDateTime, Time, UtcOffset};

/// Weekday labels in bucket order, Sunday first.
pub const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Number of calendar days covered by the weekly summary.
pub const WINDOW_DAYS: i64 = 7;

/// 0 = Sunday .. 6 = Saturday, computed in UTC.
pub fn weekday_index(at: OffsetDateTime) -> usize {
    at.to_offset(UtcOffset::UTC)
        .weekday()
        .number_days_from_sunday() as usize
}

/// `MM/DD` rendering of a timestamp in UTC.
pub fn format_month_day(at: OffsetDateTime) -> String {
    let fmt = format_description!("[month]/[day]");
    at.to_offset(UtcOffset::UTC)
        .format(&fmt)
        .unwrap_or_default()
}

/// Start of the aggregation window: UTC midnight six days before `now`.
///
/// Bounding by calendar date keeps the window to seven distinct dates, so no
/// two dates can share a weekday bucket.
pub fn window_start(now: OffsetDateTime) -> OffsetDateTime {
    let today = now.to_offset(UtcOffset::UTC).date();
    let first = today - Duration::days(WINDOW_DAYS - 1);
    first.with_time(Time::MIDNIGHT).assume_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn weekday_is_sunday_based() {
        // 2024-03-03 was a Sunday
        assert_eq!(weekday_index(datetime!(2024-03-03 12:00 UTC)), 0);
        assert_eq!(WEEKDAYS[weekday_index(datetime!(2024-03-09 23:59 UTC))], "Sat");
        assert_eq!(WEEKDAYS[weekday_index(datetime!(2024-03-06 00:00 UTC))], "Wed");
    }

    #[test]
    fn weekday_uses_utc_not_local_offset() {
        // 01:00 on Monday at +03:00 is still Sunday in UTC
        assert_eq!(weekday_index(datetime!(2024-03-04 01:00 +3)), 0);
    }

    #[test]
    fn month_day_is_zero_padded() {
        assert_eq!(format_month_day(datetime!(2024-03-05 08:30 UTC)), "03/05");
        assert_eq!(format_month_day(datetime!(2024-12-25 08:30 UTC)), "12/25");
    }

    #[test]
    fn window_covers_seven_calendar_days() {
        let now = datetime!(2024-03-09 15:45 UTC);
        let start = window_start(now);
        assert_eq!(start, datetime!(2024-03-03 00:00 UTC));

        let mut labels: Vec<_> = (0..WINDOW_DAYS)
            .map(|d| weekday_index(start + Duration::days(d)))
            .collect();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), 7);
    }
}
