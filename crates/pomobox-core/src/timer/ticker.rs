//! Cancellable periodic tick over an injected clock.
//!
//! The ticker holds no thread and no timer handle. The driver calls
//! [`Ticker::fire`] whenever it wakes; the ticker answers whether a tick is
//! due. Cancelling simply forgets the next deadline, so a cancelled ticker
//! can never fire late.

use chrono::{DateTime, Duration, Utc};

#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
    next_due: Option<DateTime<Utc>>,
}

impl Ticker {
    pub fn new(period: std::time::Duration) -> Self {
        Self {
            period: Duration::from_std(period).unwrap_or_else(|_| Duration::days(1)),
            next_due: None,
        }
    }

    pub fn is_armed(&self) -> bool {
        self.next_due.is_some()
    }

    /// Schedule the first tick one period from `now`.
    pub fn arm(&mut self, now: DateTime<Utc>) {
        self.next_due = Some(self.after(now));
    }

    pub fn cancel(&mut self) {
        self.next_due = None;
    }

    /// Returns true when a tick is due and schedules the next one.
    ///
    /// Missed periods collapse into a single tick.
    pub fn fire(&mut self, now: DateTime<Utc>) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(self.after(now));
                true
            }
            _ => false,
        }
    }

    fn after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_add_signed(self.period)
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: i64) -> DateTime<Utc> {
        DateTime::<Utc>::UNIX_EPOCH + Duration::milliseconds(ms)
    }

    #[test]
    fn fires_once_per_period() {
        let mut ticker = Ticker::new(std::time::Duration::from_millis(100));
        assert!(!ticker.fire(at(1_000)));

        ticker.arm(at(0));
        assert!(!ticker.fire(at(99)));
        assert!(ticker.fire(at(100)));
        assert!(!ticker.fire(at(150)));
        assert!(ticker.fire(at(200)));
    }

    #[test]
    fn missed_periods_collapse() {
        let mut ticker = Ticker::new(std::time::Duration::from_millis(100));
        ticker.arm(at(0));
        assert!(ticker.fire(at(10_000)));
        assert!(!ticker.fire(at(10_050)));
    }

    #[test]
    fn cancel_prevents_late_fire() {
        let mut ticker = Ticker::new(std::time::Duration::from_millis(100));
        ticker.arm(at(0));
        ticker.cancel();
        assert!(!ticker.is_armed());
        assert!(!ticker.fire(at(1_000)));
    }
}
