use chrono::{NaiveTime, Timelike, Weekday};

/// Display format for clock times, e.g. "9:05 AM"
const CLOCK_FORMAT: &str = "%-I:%M %p";

/// Parse format for clock times, accepts "9:05 AM" and "09:05 pm"
const CLOCK_PARSE_FORMAT: &str = "%I:%M %p";

/// Maps a single-letter weekday code to a weekday. Thursday is `R`.
pub fn weekday_from_code(code: char) -> Option<Weekday> {
    match code {
        'M' => Some(Weekday::Mon),
        'T' => Some(Weekday::Tue),
        'W' => Some(Weekday::Wed),
        'R' => Some(Weekday::Thu),
        'F' => Some(Weekday::Fri),
        'S' => Some(Weekday::Sat),
        _ => None,
    }
}

/// Full English name of a weekday, e.g. "Monday"
pub fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Parses a 12-hour clock string ("h:mm AM|PM") into a time of day
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value.trim(), CLOCK_PARSE_FORMAT).ok()
}

/// Formats a time of day on the 12-hour clock ("h:mm AM|PM")
pub fn format_clock(time: NaiveTime) -> String {
    time.format(CLOCK_FORMAT).to_string()
}

/// Minutes elapsed since midnight
pub fn minutes_of_day(time: NaiveTime) -> u32 {
    time.hour() * 60 + time.minute()
}

/// Signed number of whole minutes from `from` to `to`
pub fn minutes_between(from: NaiveTime, to: NaiveTime) -> i64 {
    to.signed_duration_since(from).num_minutes()
}

/// Formats a gap between classes as "H hr(s) M mins".
///
/// Zero parts are omitted, hours are pluralized only above one, and an
/// empty gap reads "0 mins".
pub fn format_walking_time(minutes: i64) -> String {
    let minutes = minutes.max(0);
    let hours = minutes / 60;
    let rest = minutes % 60;

    let mut parts = Vec::with_capacity(2);
    if hours > 0 {
        let unit = if hours > 1 { "hrs" } else { "hr" };
        parts.push(format!("{} {}", hours, unit));
    }
    if rest > 0 || hours == 0 {
        parts.push(format!("{} mins", rest));
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn parses_twelve_hour_clock() {
        assert_eq!(parse_clock("9:00 AM"), Some(time(9, 0)));
        assert_eq!(parse_clock(" 12:30 PM "), Some(time(12, 30)));
        assert_eq!(parse_clock("12:15 AM"), Some(time(0, 15)));
        assert_eq!(parse_clock("11:45 pm"), Some(time(23, 45)));
        assert_eq!(parse_clock("13:00 PM"), None);
        assert_eq!(parse_clock("nine"), None);
    }

    #[test]
    fn formats_without_leading_zero() {
        assert_eq!(format_clock(time(9, 5)), "9:05 AM");
        assert_eq!(format_clock(time(12, 0)), "12:00 PM");
        assert_eq!(format_clock(time(15, 40)), "3:40 PM");
    }

    #[test]
    fn thursday_is_r() {
        assert_eq!(weekday_from_code('R'), Some(Weekday::Thu));
        assert_eq!(weekday_from_code('S'), Some(Weekday::Sat));
        assert_eq!(weekday_from_code('U'), None);
        assert_eq!(weekday_from_code('m'), None);
    }

    #[test]
    fn walking_time_text() {
        assert_eq!(format_walking_time(0), "0 mins");
        assert_eq!(format_walking_time(45), "45 mins");
        assert_eq!(format_walking_time(60), "1 hr");
        assert_eq!(format_walking_time(65), "1 hr 5 mins");
        assert_eq!(format_walking_time(150), "2 hrs 30 mins");
        assert_eq!(format_walking_time(180), "3 hrs");
    }

    #[test]
    fn minutes_arithmetic() {
        assert_eq!(minutes_of_day(time(7, 1)), 421);
        assert_eq!(minutes_between(time(9, 0), time(10, 30)), 90);
        assert_eq!(minutes_between(time(10, 0), time(9, 0)), -60);
    }
}
