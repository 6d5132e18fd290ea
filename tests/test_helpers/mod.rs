//! Shared clock fixtures for integration tests.

use std::sync::Mutex;

use chrono::{DateTime, Days, Duration, Local, NaiveDate, Utc};
use mockable::Clock;
use taskkeeper::task::domain::local_midnight;

/// Clock pinned to a settable instant.
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    /// Pins the clock to local noon of `date`, so "today" is `date`.
    pub fn local_noon(date: NaiveDate) -> Self {
        Self {
            now: Mutex::new(local_midnight(date) + Duration::hours(12)),
        }
    }

    /// Moves the clock forward.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().expect("clock lock");
        *now += by;
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

/// Builds a calendar date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

/// Local midnight `offset` days after `day`, plus `minutes`.
pub fn local_day_at(day: NaiveDate, offset: u64, minutes: i64) -> DateTime<Utc> {
    let target = day
        .checked_add_days(Days::new(offset))
        .expect("date in range");
    local_midnight(target) + Duration::minutes(minutes)
}
