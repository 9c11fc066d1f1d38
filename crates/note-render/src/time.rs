//! Relative timestamps for the feed ("now", "5 minutes ago", "March 3").

use chrono::{DateTime, Datelike, Local, TimeZone};

const MINUTE: i64 = 60;
const HOUR: i64 = 3600;
const DAY: i64 = 86_400;

/// Label for a millisecond timestamp relative to the local clock.
pub fn time_ago(timestamp_ms: i64) -> String {
    time_ago_at(timestamp_ms, &Local::now())
}

/// Label for a millisecond timestamp relative to `now`.
///
/// Under a minute is "now", under an hour counts minutes, up to and
/// including a full day counts hours. Older timestamps show the calendar
/// day in `now`'s time zone, with the year only when it differs.
pub fn time_ago_at<Tz: TimeZone>(timestamp_ms: i64, now: &DateTime<Tz>) -> String {
    let seconds_past = now
        .timestamp_millis()
        .saturating_sub(timestamp_ms)
        .div_euclid(1000);

    if seconds_past < MINUTE {
        return "now".to_string();
    }
    if seconds_past < HOUR {
        let m = seconds_past / MINUTE;
        return format!("{m} minute{} ago", plural(m));
    }
    if seconds_past <= DAY {
        let h = seconds_past / HOUR;
        return format!("{h} hour{} ago", plural(h));
    }

    let Some(date) = now.timezone().timestamp_millis_opt(timestamp_ms).single() else {
        return String::new();
    };
    let day = date.naive_local().format("%B %-d").to_string();
    if date.year() == now.year() {
        day
    } else {
        format!("{day} {}", date.year())
    }
}

fn plural(n: i64) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
