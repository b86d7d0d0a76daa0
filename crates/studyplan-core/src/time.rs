//! Wall-clock to absolute-instant conversion.
//!
//! Requests carry a calendar date (`YYYY-MM-DD`), times of day (`HH:MM`) and
//! an IANA timezone. Everything stored or compared downstream is UTC.

use chrono::{DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::DomainError;

const DATE_SHAPE: &str = "DDDD-DD-DD";
const TIME_SHAPE: &str = "DD:DD";

/// `D` in the shape matches one ASCII digit, every other byte matches itself.
fn has_shape(input: &str, shape: &str) -> bool {
    input.len() == shape.len()
        && input.bytes().zip(shape.bytes()).all(|(c, p)| match p {
            b'D' => c.is_ascii_digit(),
            _ => c == p,
        })
}

pub fn parse_date(date: &str) -> Result<NaiveDate, DomainError> {
    if !has_shape(date, DATE_SHAPE) {
        return Err(DomainError::MalformedInput(format!(
            "date '{date}' must be YYYY-MM-DD"
        )));
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| DomainError::MalformedInput(format!("date '{date}' does not exist")))
}

pub fn parse_time(time: &str) -> Result<NaiveTime, DomainError> {
    if !has_shape(time, TIME_SHAPE) {
        return Err(DomainError::MalformedInput(format!(
            "time '{time}' must be HH:MM"
        )));
    }
    NaiveTime::parse_from_str(time, "%H:%M")
        .map_err(|_| DomainError::MalformedInput(format!("time '{time}' is out of range")))
}

pub fn parse_timezone(name: &str) -> Result<Tz, DomainError> {
    name.parse::<Tz>()
        .map_err(|_| DomainError::MalformedInput(format!("unknown timezone '{name}'")))
}

/// Resolves a local wall-clock reading in `tz`. Ambiguous readings (DST
/// fall-back) take the earlier instant; readings inside a DST gap are rejected.
pub fn to_utc(local: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>, DomainError> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(dt.with_timezone(&Utc)),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest.with_timezone(&Utc)),
        LocalResult::None => Err(DomainError::MalformedInput(format!(
            "{local} does not exist in {}",
            tz.name()
        ))),
    }
}

pub fn local_instant(date: &str, time: &str, tz: Tz) -> Result<DateTime<Utc>, DomainError> {
    let date = parse_date(date)?;
    let time = parse_time(time)?;
    to_utc(date.and_time(time), tz)
}

/// Both ends share `date`, so a slot never crosses local midnight.
pub fn normalize_slot(
    date: &str,
    start_time: &str,
    end_time: &str,
    tz: Tz,
) -> Result<(DateTime<Utc>, DateTime<Utc>), DomainError> {
    let day = parse_date(date)?;
    let start = to_utc(day.and_time(parse_time(start_time)?), tz)?;
    let end = to_utc(day.and_time(parse_time(end_time)?), tz)?;
    Ok((start, end))
}

fn start_of_day(day: NaiveDate, tz: Tz) -> DateTime<Utc> {
    // A few zones skip midnight on DST days; the day then starts at the
    // first wall-clock hour that exists.
    (0..3)
        .find_map(|hour| {
            let local = day.and_hms_opt(hour, 0, 0)?;
            to_utc(local, tz).ok()
        })
        .unwrap_or_else(|| tz.from_utc_datetime(&day.and_time(NaiveTime::MIN)).with_timezone(&Utc))
}

/// `[local midnight of day, local midnight of day + days)` expressed in UTC.
pub fn day_bounds(day: NaiveDate, days: u32, tz: Tz) -> (DateTime<Utc>, DateTime<Utc>) {
    let from = start_of_day(day, tz);
    let to = start_of_day(day + Duration::days(i64::from(days)), tz);
    (from, to)
}
