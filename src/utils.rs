use chrono::{DateTime, Local};
use std::time::{Duration, Instant};

/// Format a recording timestamp as `YYYY-MM-DD HH:MM:SS.ffffff` (local time).
pub fn format_timestamp(time: &DateTime<Local>) -> String {
    time.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Fixed-interval trigger for work driven from the GUI frame loop.
///
/// Fires on the first poll, then at most once per `interval`.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    interval: Duration,
    last: Option<Instant>,
}

impl IntervalTimer {
    pub fn new(interval: Duration) -> Self {
        Self { interval, last: None }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Returns true (and re-arms) if the interval has elapsed at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }

    /// Time left until the next firing, zero if already due.
    pub fn remaining(&self, now: Instant) -> Duration {
        match self.last {
            Some(last) => self.interval.saturating_sub(now.duration_since(last)),
            None => Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn formats_with_microseconds() {
        let time = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(format_timestamp(&time), "2024-03-09 14:05:07.000000");
    }

    #[test]
    fn timer_fires_once_per_interval() {
        let start = Instant::now();
        let mut timer = IntervalTimer::from_millis(100);

        assert!(timer.poll(start));
        assert!(!timer.poll(start + Duration::from_millis(50)));
        assert_eq!(timer.remaining(start + Duration::from_millis(50)), Duration::from_millis(50));
        assert!(timer.poll(start + Duration::from_millis(100)));
        assert!(!timer.poll(start + Duration::from_millis(150)));
    }
}
