use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single forecast entry, identified by `id`.
///
/// On the wire this is `{"id", "date", "temperatureC", "summary"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub temperature_c: i32,
    pub summary: String,
}

impl ForecastRecord {
    /// Build a record with a freshly generated id.
    pub fn new(date: NaiveDate, temperature_c: i32, summary: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            temperature_c,
            summary: summary.into(),
        }
    }

    /// Fahrenheit equivalent, truncated the same way the old forecast pages did.
    ///
    /// Saturates at the `i32` bounds for out-of-range Celsius values.
    pub fn temperature_f(&self) -> i32 {
        let fahrenheit = 32.0 + (f64::from(self.temperature_c) / 0.5556).trunc();
        // float-to-int `as` saturates
        fahrenheit as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ForecastRecord {
        ForecastRecord {
            id: Uuid::parse_str("6f1c8a52-1d2e-4b8a-9a51-0a7f3f0b2c11").unwrap(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            temperature_c: 20,
            summary: "Mild".to_string(),
        }
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let json = serde_json::to_value(sample()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "id": "6f1c8a52-1d2e-4b8a-9a51-0a7f3f0b2c11",
                "date": "2024-01-01",
                "temperatureC": 20,
                "summary": "Mild",
            })
        );
    }

    #[test]
    fn wire_roundtrip_preserves_every_field() {
        let record = sample();
        let body = serde_json::to_string(&record).unwrap();
        let decoded: ForecastRecord = serde_json::from_str(&body).unwrap();

        assert_eq!(decoded, record);
    }

    #[test]
    fn rejects_wrong_shape() {
        let err = serde_json::from_str::<ForecastRecord>(r#"{"id": "nope", "date": "2024-01-01"}"#);
        assert!(err.is_err());
    }

    #[test]
    fn new_generates_distinct_ids() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let a = ForecastRecord::new(date, 1, "Cool");
        let b = ForecastRecord::new(date, 1, "Cool");

        assert_ne!(a.id, b.id);
    }

    #[test]
    fn fahrenheit_conversion() {
        let mut record = sample();
        assert_eq!(record.temperature_f(), 67);

        record.temperature_c = 0;
        assert_eq!(record.temperature_f(), 32);

        record.temperature_c = -20;
        assert_eq!(record.temperature_f(), -3);
    }

    #[test]
    fn fahrenheit_saturates_at_extremes() {
        let mut record = sample();

        record.temperature_c = 1_500_000_000;
        assert_eq!(record.temperature_f(), i32::MAX);

        record.temperature_c = i32::MAX;
        assert_eq!(record.temperature_f(), i32::MAX);

        record.temperature_c = i32::MIN;
        assert_eq!(record.temperature_f(), i32::MIN);
    }
}
