//! Conversions between the human-entry display format and stored instants.
//!
//! Display strings are wall-clock times in the calendar's time zone; instants are always
//! kept in UTC. Every calendar-day question (which cell a meeting belongs to, whether a day
//! is today) is answered in the calendar's zone.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// `dd/MM/yyyy HH:mm`
pub const DISPLAY_FORMAT: &str = "%d/%m/%Y %H:%M";
/// `HH:mm`
pub const TIME_FORMAT: &str = "%H:%M";
/// `MMMM yyyy`
pub const MONTH_TITLE_FORMAT: &str = "%B %Y";
/// `MMM dd, yyyy`
pub const DAY_HEADING_FORMAT: &str = "%b %d, %Y";

// `d` marks a digit, everything else must match literally.
const DISPLAY_SHAPE: &str = "dd/dd/dddd dd:dd";

/// Parse a display string as wall-clock time in `tz`.
///
/// Returns `None` when the text is not exactly `dd/MM/yyyy HH:mm`, names a date or time
/// that doesn't exist, or lands in a DST gap. Ambiguous times resolve to the earlier
/// instant.
pub fn parse_display<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    if !has_display_shape(text) {
        return None;
    }

    let naive = NaiveDateTime::parse_from_str(text, DISPLAY_FORMAT).ok()?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

pub fn format_display<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    instant.with_timezone(tz).format(DISPLAY_FORMAT).to_string()
}

pub fn format_time<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    instant.with_timezone(tz).format(TIME_FORMAT).to_string()
}

/// The display text for `day` at midnight, used to seed new drafts.
pub fn midnight_display(day: NaiveDate) -> String {
    day.format("%d/%m/%Y 00:00").to_string()
}

/// The calendar day `instant` falls on in `tz`.
pub fn local_date<Tz: TimeZone>(instant: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    instant.with_timezone(tz).date_naive()
}

pub fn today<Tz: TimeZone>(tz: &Tz) -> NaiveDate {
    local_date(&Utc::now(), tz)
}

pub fn is_same_day(a: NaiveDate, b: NaiveDate) -> bool {
    a == b
}

pub fn is_same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

pub fn is_today<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> bool {
    is_same_day(day, today(tz))
}

pub fn first_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// Step `month` by whole months. Saturates at the edges of chrono's range.
pub fn add_months(month: NaiveDate, offset: i32) -> NaiveDate {
    let first = first_of_month(month);
    let months = Months::new(offset.unsigned_abs());

    let stepped = if offset >= 0 {
        first.checked_add_months(months)
    } else {
        first.checked_sub_months(months)
    };

    stepped.unwrap_or(first)
}

/// Every day of the month containing `month`, in order.
pub fn month_days(month: NaiveDate) -> Vec<NaiveDate> {
    let first = first_of_month(month);

    first
        .iter_days()
        .take_while(|day| is_same_month(*day, first))
        .collect()
}

fn has_display_shape(text: &str) -> bool {
    text.len() == DISPLAY_SHAPE.len()
        && text
            .bytes()
            .zip(DISPLAY_SHAPE.bytes())
            .all(|(c, shape)| match shape {
                b'd' => c.is_ascii_digit(),
                literal => c == literal,
            })
}
