use chrono::{Days, NaiveDate};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::model::ForecastRecord;

const SUMMARIES: [&str; 10] = [
    "Freezing",
    "Bracing",
    "Chilly",
    "Cool",
    "Mild",
    "Warm",
    "Balmy",
    "Hot",
    "Sweltering",
    "Scorching",
];

/// Authoritative in-memory collection of forecasts.
///
/// Every operation takes the lock for its full duration, so concurrent
/// requests observe each other's writes in a total order.
#[derive(Debug, Default)]
pub struct ForecastStore {
    records: Mutex<Vec<ForecastRecord>>,
}

impl ForecastStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `count` sample forecasts on consecutive days from `start`.
    pub fn seeded(count: usize, start: NaiveDate) -> Self {
        let records = (0..count)
            .filter_map(|i| {
                let date = start.checked_add_days(Days::new(i as u64))?;
                let idx = i % SUMMARIES.len();
                // -20 (Freezing) .. 52 (Scorching)
                let temperature_c = -20 + (idx as i32) * 8;
                Some(ForecastRecord::new(date, temperature_c, SUMMARIES[idx]))
            })
            .collect();

        Self {
            records: Mutex::new(records),
        }
    }

    /// Insert `record`. Returns `false` if its id is already present.
    pub fn add(&self, record: ForecastRecord) -> bool {
        let mut records = self.records.lock();
        if records.iter().any(|r| r.id == record.id) {
            tracing::debug!(id = %record.id, "rejecting duplicate forecast id");
            return false;
        }
        records.push(record);
        true
    }

    /// Remove the record with `id`. Returns `false` if there was none.
    pub fn delete(&self, id: Uuid) -> bool {
        let mut records = self.records.lock();
        match records.iter().position(|r| r.id == id) {
            Some(pos) => {
                records.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Snapshot of the collection in insertion order.
    pub fn list(&self) -> Vec<ForecastRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}
