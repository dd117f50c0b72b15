use chrono::Utc;
use boulders_core::ports::ClockPort;

pub struct SystemClock;

impl ClockPort for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_ms_is_after_2024() {
        assert!(SystemClock.now_ms() > 1_704_067_200_000);
    }
}
