//! Timestamp encoding shared by the record types.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::DbError;

/// Encode a timestamp with fixed nanosecond precision so that string
/// ordering in queries matches chronological ordering.
pub(crate) fn encode_time(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

pub(crate) fn decode_time(raw: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| DbError::InvalidRecord(format!("bad timestamp {raw:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn encoded_times_sort_chronologically() {
        let whole = Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap();
        let later = whole + chrono::Duration::milliseconds(500);
        assert!(encode_time(&whole) < encode_time(&later));
        assert_eq!(decode_time(&encode_time(&later)).unwrap(), later);
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(decode_time("yesterday"), Err(DbError::InvalidRecord(_))));
    }
}
