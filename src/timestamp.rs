use chrono::{DateTime, TimeZone, Utc};
use std::time::SystemTime;

/// A moment to generate a snowflake for.
///
/// Either a point in time or a raw count of milliseconds since the Unix
/// epoch. Both normalize to Unix milliseconds before the generator epoch is
/// subtracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Timestamp {
    At(DateTime<Utc>),
    Millis(i64),
}

impl Timestamp {
    pub fn now() -> Self {
        Timestamp::At(Utc::now())
    }

    /// Milliseconds since 1970-01-01T00:00:00Z.
    pub fn as_unix_millis(&self) -> i64 {
        match self {
            Timestamp::At(at) => at.timestamp_millis(),
            Timestamp::Millis(ms) => *ms,
        }
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Timestamp::Millis(ms)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(at: DateTime<Tz>) -> Self {
        Timestamp::At(at.with_timezone(&Utc))
    }
}

impl From<SystemTime> for Timestamp {
    fn from(at: SystemTime) -> Self {
        Timestamp::At(DateTime::<Utc>::from(at))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn millis_pass_through() {
        assert_eq!(Timestamp::from(1653653263221).as_unix_millis(), 1653653263221);
    }

    #[test]
    fn date_time_normalizes_to_utc_millis() {
        let utc = Utc.timestamp_millis_opt(1653653263221).unwrap();
        let offset = utc.with_timezone(&FixedOffset::east_opt(9 * 3600).unwrap());

        assert_eq!(Timestamp::from(utc).as_unix_millis(), 1653653263221);
        assert_eq!(Timestamp::from(offset).as_unix_millis(), 1653653263221);
    }

    #[test]
    fn system_time_is_accepted() {
        let at = UNIX_EPOCH + Duration::from_millis(1653653289600);
        assert_eq!(Timestamp::from(at).as_unix_millis(), 1653653289600);
    }

    #[test]
    fn now_is_recent() {
        let before = Utc::now().timestamp_millis();
        let now = Timestamp::now().as_unix_millis();
        assert!(now >= before);
        assert!(now - before < 1_000);
    }
}
