use chrono::{DateTime, Datelike, Local, NaiveDate, Utc};

/// Hours between `start` and `now`. Only whole minutes are counted.
pub fn elapsed_hours(start: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - start).num_minutes() as f64 / 60.
}

/// Hours between two fixed moments, rounded to 2 decimals. The result gets persisted, so it has to
/// be the same every time it's computed for the same pair.
pub fn total_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    round_hours(elapsed_hours(start, end))
}

/// Signed `estimate - actual`. Positive means the work took less than expected.
pub fn difference(estimate: f64, actual: f64) -> f64 {
    estimate - actual
}

pub fn round_hours(hours: f64) -> f64 {
    (hours * 100.).round() / 100.
}

/// Converts hours into a readable string. Anything shorter than an hour is shown in minutes.
pub fn humanize(hours: f64) -> String {
    if hours.abs() < 1. {
        // 0.1 * 60 gives 6.000000000000001, which would be rounded up to 7 minutes.
        let minutes = (hours * 60. * 1e6).round() / 1e6;
        format!("{} minutes", minutes.ceil() as i64)
    } else {
        format!("{} hours", round_hours(hours))
    }
}

/// Calendar day of `time` in the user's timezone.
pub fn local_date(time: DateTime<Utc>) -> NaiveDate {
    time.with_timezone(&Local).date_naive()
}

/// This is the standard way of converting a date to a string in metodo.
pub fn date_to_record_name(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// For example `Friday, March 15th 2024, 4:05 pm`.
pub fn format_full(time: DateTime<Utc>) -> String {
    let local = time.with_timezone(&Local);
    format!("{}, {}", local.format("%A"), format_short(time))
}

/// For example `March 15th 2024, 4:05 pm`.
pub fn format_short(time: DateTime<Utc>) -> String {
    let local = time.with_timezone(&Local);
    format!(
        "{} {}{} {}",
        local.format("%B"),
        local.day(),
        ordinal_suffix(local.day()),
        local.format("%Y, %-I:%M %P")
    )
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};

    use super::{
        date_to_record_name, difference, elapsed_hours, humanize, ordinal_suffix, total_hours,
    };

    const TEST_START_DATE: NaiveDateTime =
        NaiveDateTime::new(NaiveDate::from_ymd_opt(2018, 7, 4).unwrap(), NaiveTime::MIN);

    #[test]
    fn elapsed_hours_counts_whole_minutes() {
        let start = Utc.from_utc_datetime(&TEST_START_DATE);
        let now = start + Duration::minutes(90) + Duration::seconds(59);
        assert_eq!(elapsed_hours(start, now), 1.5);
        assert_eq!(elapsed_hours(start, start + Duration::minutes(20)), 20. / 60.);
    }

    #[test]
    fn total_hours_is_rounded() {
        let start = Utc.from_utc_datetime(&TEST_START_DATE);
        assert_eq!(total_hours(start, start + Duration::minutes(20)), 0.33);
        assert_eq!(total_hours(start, start + Duration::minutes(100)), 1.67);
        assert_eq!(total_hours(start, start + Duration::hours(3)), 3.);
        assert_eq!(total_hours(start, start + Duration::seconds(30)), 0.);
    }

    #[test]
    fn difference_is_signed() {
        assert_eq!(difference(2., 3.), -1.);
        assert_eq!(difference(2., 0.), 2.);
        assert_eq!(difference(1.5, 1.), 0.5);
    }

    #[test]
    fn humanize_switches_units_at_one_hour() {
        assert_eq!(humanize(0.5), "30 minutes");
        assert_eq!(humanize(0.1), "6 minutes");
        assert_eq!(humanize(0.33), "20 minutes");
        assert_eq!(humanize(0.), "0 minutes");
        assert_eq!(humanize(1.), "1 hours");
        assert_eq!(humanize(1.5), "1.5 hours");
        assert_eq!(humanize(2.), "2 hours");
        assert_eq!(humanize(-1.), "-1 hours");
        assert_eq!(humanize(-0.5), "-30 minutes");
        assert_eq!(humanize(0.1 + 0.2 + 1.), "1.3 hours");
    }

    #[test]
    fn record_names_are_iso_dates() {
        assert_eq!(date_to_record_name(TEST_START_DATE.date()), "2018-07-04");
    }

    #[test]
    fn ordinal_suffixes() {
        assert_eq!(ordinal_suffix(1), "st");
        assert_eq!(ordinal_suffix(2), "nd");
        assert_eq!(ordinal_suffix(3), "rd");
        assert_eq!(ordinal_suffix(4), "th");
        assert_eq!(ordinal_suffix(11), "th");
        assert_eq!(ordinal_suffix(12), "th");
        assert_eq!(ordinal_suffix(13), "th");
        assert_eq!(ordinal_suffix(21), "st");
        assert_eq!(ordinal_suffix(22), "nd");
        assert_eq!(ordinal_suffix(31), "st");
    }
}
