use chrono::{DateTime, Timelike, Utc};
use chrono_tz::Tz;

use crate::alerts::QuietHours;

const ENABLE_LOGS: bool = false;

use crate::log_debug;

pub(crate) fn parse_timezone(name: &str) -> Option<Tz> {
    name.parse::<Tz>().ok()
}

/// Resolve an IANA zone name. Unknown names fall back to UTC so alert
/// evaluation never fails on a bad preference. Settings validation is where a
/// bad zone gets reported.
pub fn resolve_timezone(name: &str) -> Tz {
    parse_timezone(name).unwrap_or_else(|| {
        log_debug!("unknown time zone {:?}, using UTC for quiet hours", name);
        Tz::UTC
    })
}

/// Whether `date` falls inside the quiet window, judged by the hour of day in
/// `timezone`.
pub fn is_within_quiet_hours(date: DateTime<Utc>, quiet_hours: &QuietHours, timezone: &str) -> bool {
    let hour = date.with_timezone(&resolve_timezone(timezone)).hour();
    hour_in_window(hour, quiet_hours.start_hour as u32, quiet_hours.end_hour as u32)
}

fn hour_in_window(hour: u32, start: u32, end: u32) -> bool {
    if start == end {
        true
    } else if start > end {
        hour >= start || hour < end
    } else {
        hour >= start && hour < end
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_utc_hour(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, hour, 30, 0).unwrap()
    }

    fn overnight() -> QuietHours {
        QuietHours {
            start_hour: 22,
            end_hour: 7,
        }
    }

    #[test]
    fn window_wrapping_midnight() {
        assert!(is_within_quiet_hours(at_utc_hour(23), &overnight(), "UTC"));
        assert!(is_within_quiet_hours(at_utc_hour(3), &overnight(), "UTC"));
        assert!(is_within_quiet_hours(at_utc_hour(22), &overnight(), "UTC"));
        assert!(!is_within_quiet_hours(at_utc_hour(7), &overnight(), "UTC"));
        assert!(!is_within_quiet_hours(at_utc_hour(12), &overnight(), "UTC"));
    }

    #[test]
    fn same_day_window() {
        let siesta = QuietHours {
            start_hour: 13,
            end_hour: 15,
        };
        assert!(!is_within_quiet_hours(at_utc_hour(12), &siesta, "UTC"));
        assert!(is_within_quiet_hours(at_utc_hour(13), &siesta, "UTC"));
        assert!(is_within_quiet_hours(at_utc_hour(14), &siesta, "UTC"));
        assert!(!is_within_quiet_hours(at_utc_hour(15), &siesta, "UTC"));
    }

    #[test]
    fn equal_hours_mean_all_day() {
        let always = QuietHours {
            start_hour: 9,
            end_hour: 9,
        };
        for hour in 0..24 {
            assert!(is_within_quiet_hours(at_utc_hour(hour), &always, "UTC"));
        }
    }

    #[test]
    fn hour_is_taken_in_the_device_zone() {
        // 05:30 UTC in January is 22:30 the previous day in Denver (UTC-7).
        assert!(is_within_quiet_hours(at_utc_hour(5), &overnight(), "America/Denver"));
        // 19:30 UTC is 12:30 in Denver.
        assert!(!is_within_quiet_hours(at_utc_hour(19), &overnight(), "America/Denver"));
        // ...but 04:30 the next morning in Tokyo (UTC+9).
        assert!(is_within_quiet_hours(at_utc_hour(19), &overnight(), "Asia/Tokyo"));
    }

    #[test]
    fn unknown_zone_falls_back_to_utc() {
        assert!(is_within_quiet_hours(at_utc_hour(23), &overnight(), "Nowhere/Special"));
        assert!(!is_within_quiet_hours(at_utc_hour(12), &overnight(), "Nowhere/Special"));
    }
}
