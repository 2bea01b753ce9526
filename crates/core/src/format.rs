use chrono::{NaiveDate, NaiveTime};

/// "09:00 AM", "05:30 PM".
pub fn format_time(time: NaiveTime) -> String {
    time.format("%I:%M %p").to_string()
}

/// "Sunday, October 18, 2026".
pub fn format_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}
