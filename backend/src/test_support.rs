//! Test doubles shared by unit tests in `src/` and integration tests in
//! `tests/`.

use std::sync::Mutex;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rust_decimal::Decimal;

use crate::domain::{Bike, BikeDraft, BikeId};

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: TimeDelta) {
        *self.lock_clock() += delta;
    }

    pub fn advance_seconds(&self, seconds: i64) {
        self.advance(TimeDelta::seconds(seconds));
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.lock_clock() = now;
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// UTC timestamp from calendar fields; panics on an impossible date.
pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).single() {
        Some(at) => at,
        None => panic!("invalid fixture timestamp {year}-{month}-{day} {hour}:{minute}"),
    }
}

/// Bike with a random id and a medium frame.
pub fn test_bike(name: &str, category: &str, price_per_hour: Decimal, is_available: bool) -> Bike {
    let draft = BikeDraft {
        id: BikeId::random(),
        name: name.to_owned(),
        category: category.to_owned(),
        description: format!("{name} test bike"),
        size: "M".to_owned(),
        price_per_hour,
        is_available,
    };
    match Bike::new(draft) {
        Ok(bike) => bike,
        Err(error) => panic!("invalid fixture bike {name}: {error}"),
    }
}
