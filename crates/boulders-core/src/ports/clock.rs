use chrono::{DateTime, NaiveDate, Utc};

pub trait ClockPort: Send + Sync {
    fn now_ms(&self) -> i64;

    fn today(&self) -> NaiveDate {
        DateTime::<Utc>::from_timestamp_millis(self.now_ms())
            .unwrap_or_default()
            .date_naive()
    }
}
