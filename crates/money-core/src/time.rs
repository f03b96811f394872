use chrono::{DateTime, NaiveDate, Utc};

/// Clock abstracts access to the current timestamp so services remain deterministic in tests.
pub trait Clock: Send + Sync {
    /// Returns the current UTC timestamp.
    fn now(&self) -> DateTime<Utc>;

    /// Returns the current UTC date. Defaults to `now().date_naive()`.
    ///
    /// Transfer dates are checked against this UTC date, not the host's local date,
    /// so near midnight the two can differ by one day.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Seconds since the Unix epoch with microsecond precision.
    fn epoch_seconds(&self) -> f64 {
        self.now().timestamp_micros() as f64 / 1_000_000.0
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Midnight UTC of the given calendar day.
    pub fn on(year: i32, month: u32, day: u32) -> Option<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day)?;
        Some(Self(date.and_hms_opt(0, 0, 0)?.and_utc()))
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn today_is_the_utc_calendar_date() {
        let late = FixedClock(Utc.with_ymd_and_hms(2025, 6, 1, 23, 30, 0).unwrap());
        assert_eq!(late.today(), NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
        assert_eq!(late.epoch_seconds(), late.0.timestamp() as f64);
    }
}
