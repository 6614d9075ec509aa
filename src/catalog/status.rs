use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

/// Derived availability of a race or event. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
  Open,
  Closed,
}

impl Status {
  /// `Closed` once the advertised start is strictly in the past.
  ///
  /// Depends on the host clock being correct.
  pub fn at(advertised_start_time: DateTime<Utc>, now: DateTime<Utc>) -> Self {
    if advertised_start_time < now {
      Self::Closed
    } else {
      Self::Open
    }
  }
}

/// Timestamps are stored as fixed-width RFC 3339 text in UTC so that
/// lexical order in SQLite matches chronological order.
pub fn encode_timestamp(ts: DateTime<Utc>) -> Value {
  Value::Text(ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Decode a stored timestamp column.
///
/// Accepts RFC 3339 as well as the `YYYY-MM-DD HH:MM:SS[.f][+zz:zz]` forms
/// other SQLite writers produce. Anything else is a conversion failure.
pub fn decode_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
  let raw: String = row.get(idx)?;
  parse_timestamp(&raw).ok_or_else(|| {
    rusqlite::Error::FromSqlConversionFailure(
      idx,
      Type::Text,
      format!("invalid timestamp '{}'", raw).into(),
    )
  })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
  if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
    return Some(ts.with_timezone(&Utc));
  }
  if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
    return Some(ts.with_timezone(&Utc));
  }
  NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
    .ok()
    .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{Duration, TimeZone};

  #[test]
  fn test_status_past_is_closed() {
    let now = Utc::now();
    assert_eq!(Status::at(now - Duration::seconds(1), now), Status::Closed);
  }

  #[test]
  fn test_status_future_is_open() {
    let now = Utc::now();
    assert_eq!(Status::at(now + Duration::hours(2), now), Status::Open);
  }

  #[test]
  fn test_status_exact_start_is_open() {
    let now = Utc::now();
    assert_eq!(Status::at(now, now), Status::Open);
  }

  #[test]
  fn test_status_serializes_uppercase() {
    assert_eq!(serde_json::to_string(&Status::Open).unwrap(), "\"OPEN\"");
    assert_eq!(serde_json::to_string(&Status::Closed).unwrap(), "\"CLOSED\"");
  }

  #[test]
  fn test_encode_is_fixed_width() {
    let a = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 0).unwrap();
    let b = a + Duration::milliseconds(250);
    let (Value::Text(a), Value::Text(b)) = (encode_timestamp(a), encode_timestamp(b)) else {
      panic!("expected text values");
    };
    assert_eq!(a, "2024-03-01T09:05:00.000Z");
    assert_eq!(a.len(), b.len());
    assert!(a < b);
  }

  #[test]
  fn test_parse_timestamp_formats() {
    let expected = Utc.with_ymd_and_hms(2024, 3, 1, 9, 5, 0).unwrap();
    assert_eq!(parse_timestamp("2024-03-01T09:05:00Z"), Some(expected));
    assert_eq!(parse_timestamp("2024-03-01T19:05:00+10:00"), Some(expected));
    assert_eq!(parse_timestamp("2024-03-01 09:05:00+00:00"), Some(expected));
    assert_eq!(parse_timestamp("2024-03-01 09:05:00"), Some(expected));
    assert_eq!(parse_timestamp("yesterday"), None);
  }
}
