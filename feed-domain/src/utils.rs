use chrono::{DateTime, Utc};

pub fn epoch_seconds_to_utc(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds, 0)
}
