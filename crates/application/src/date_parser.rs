//! Date and time parsing utilities
//!
//! Accepts the ISO forms, the US forms used by older backup files
//! ("MM/DD/YYYY", "h:mm AM") and a handful of relative expressions.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveTime, Weekday};
use tracing::debug;

/// Date format used by legacy backups
pub const US_DATE_FORMAT: &str = "%m/%d/%Y";

/// Time format used by legacy backups
pub const US_TIME_FORMAT: &str = "%-I:%M %p";

/// Parse a date string relative to the local current date
///
/// Supports formats like:
/// - "today", "tomorrow", "yesterday"
/// - "monday", "next friday"
/// - "2024-03-15", "03/15/2024", "3/15/2024"
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    parse_date_from(input, Local::now().date_naive())
}

/// Parse a date string relative to `today`
pub fn parse_date_from(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    if let Some(date) = parse_relative(&input, today) {
        debug!(input = %input, date = %date, "Parsed relative date");
        return Some(date);
    }

    if let Some(date) = parse_weekday(&input, today) {
        debug!(input = %input, date = %date, "Parsed weekday");
        return Some(date);
    }

    if let Some(date) = parse_date_format(&input) {
        debug!(input = %input, date = %date, "Parsed date format");
        return Some(date);
    }

    // Fall back to fuzzydate library
    match fuzzydate::parse(&input) {
        Ok(datetime) => {
            let date = datetime.date();
            debug!(input = %input, date = %date, "Parsed with fuzzydate");
            Some(date)
        },
        Err(_) => {
            debug!(input = %input, "Failed to parse date");
            None
        },
    }
}

/// Parse a time of day such as "14:30", "2:30 PM" or "2:30pm"
pub fn parse_time(input: &str) -> Option<NaiveTime> {
    let input = input.trim().to_uppercase();
    if input.is_empty() {
        return None;
    }

    // "2:30PM" -> "2:30 PM"
    let spaced = match input.strip_suffix("AM").or_else(|| input.strip_suffix("PM")) {
        Some(head) if !head.ends_with(' ') => {
            format!("{head} {}", &input[head.len()..])
        },
        _ => input.clone(),
    };

    let parsed = ["%H:%M", "%H:%M:%S", "%I:%M %p"]
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(&spaced, format).ok());

    if parsed.is_none() {
        debug!(input = %input, "Failed to parse time");
    }
    parsed
}

/// Format a date the way legacy backups store it
pub fn format_us_date(date: NaiveDate) -> String {
    date.format(US_DATE_FORMAT).to_string()
}

/// Format a time the way legacy backups store it
pub fn format_us_time(time: NaiveTime) -> String {
    time.format(US_TIME_FORMAT).to_string()
}

fn parse_relative(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    match input {
        "today" => Some(today),
        "tomorrow" => Some(today + Duration::days(1)),
        "yesterday" => Some(today - Duration::days(1)),
        _ if input.contains("day after tomorrow") => Some(today + Duration::days(2)),
        _ if input.contains("next week") => Some(today + Duration::weeks(1)),
        _ => None,
    }
}

/// Parse weekday expressions like "friday" or "next monday"
fn parse_weekday(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let mut words = input.split_whitespace();
    let (is_next, day) = match (words.next(), words.next(), words.next()) {
        (Some("next"), Some(day), None) => (true, day),
        (Some(day), None, None) => (false, day),
        _ => return None,
    };
    let weekday = day.parse::<Weekday>().ok()?;
    Some(next_weekday(today, weekday, is_next))
}

/// Find the next occurrence of a weekday
fn next_weekday(from: NaiveDate, target: Weekday, force_next: bool) -> NaiveDate {
    let target_num = target.num_days_from_monday();
    let current_num = from.weekday().num_days_from_monday();

    let days_until = match target_num.cmp(&current_num) {
        std::cmp::Ordering::Greater => target_num - current_num,
        std::cmp::Ordering::Less => 7 - (current_num - target_num),
        std::cmp::Ordering::Equal if force_next => 7,
        std::cmp::Ordering::Equal => 0,
    };

    from + Duration::days(i64::from(days_until))
}

fn parse_date_format(input: &str) -> Option<NaiveDate> {
    ["%Y-%m-%d", US_DATE_FORMAT, "%Y/%m/%d"]
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
}
