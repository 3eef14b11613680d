//! Metered consumption, one record per time block.

use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::dates::parse_date_time;
use crate::models::payload::{self, Payload};
use crate::models::supply::Supply;
use crate::params::MeasurementType;

/// Consumption for a single time block (an hour or a quarter hour).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionRecord {
    pub cups: String,
    /// Raw block date and start time as sent by upstream.
    pub date: Option<String>,
    pub time: Option<String>,
    #[serde(rename = "consumptionKWh")]
    pub consumption_kwh: Option<f64>,
    #[serde(rename = "surplusEnergyKWh")]
    pub surplus_energy_kwh: Option<f64>,
    /// How the reading was obtained ("Real" or "Estimada").
    pub obtain_method: String,

    /// `date` and `time` combined; `None` unless both parse.
    pub when: Option<NaiveDateTime>,
}

impl ConsumptionRecord {
    pub fn from_payload(obj: &Payload) -> Self {
        let date = payload::string(obj, "date");
        let time = payload::string(obj, "time");
        let when = match (&date, &time) {
            (Some(date), Some(time)) => parse_date_time(date, time),
            _ => None,
        };

        Self {
            cups: payload::string_or_empty(obj, "cups"),
            date,
            time,
            consumption_kwh: payload::number(obj, "consumptionKWh"),
            surplus_energy_kwh: payload::number(obj, "surplusEnergyKWh"),
            obtain_method: payload::string_or_empty(obj, "obtainMethod"),
            when,
        }
    }

    pub fn is_estimated(&self) -> bool {
        self.obtain_method.eq_ignore_ascii_case("estimada")
    }
}

/// Consumption of one supply over a requested range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsumptionSeries {
    pub supply: Supply,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub measurement_type: MeasurementType,
    /// Records in the order upstream returned them.
    pub data: Vec<ConsumptionRecord>,
}

impl ConsumptionSeries {
    /// Sum of `consumption_kwh` over all records; missing values count as zero.
    pub fn total_kwh(&self) -> f64 {
        self.data.iter().filter_map(|r| r.consumption_kwh).sum()
    }

    /// Sum of `surplus_energy_kwh` over all records; missing values count as zero.
    pub fn total_surplus_kwh(&self) -> f64 {
        self.data.iter().filter_map(|r| r.surplus_energy_kwh).sum()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn derives_timestamp_from_date_and_time() {
        let raw = json!({"date": "2024/10/02", "time": "13:30", "consumptionKWh": 1.5});
        let record = ConsumptionRecord::from_payload(raw.as_object().unwrap());

        let expected = NaiveDate::from_ymd_opt(2024, 10, 2)
            .unwrap()
            .and_hms_opt(13, 30, 0)
            .unwrap();
        assert_eq!(record.when, Some(expected));
        assert_eq!(record.consumption_kwh, Some(1.5));
    }

    #[test]
    fn missing_time_means_no_timestamp() {
        let raw = json!({"date": "2024/10/02", "consumptionKWh": 0.2});
        let record = ConsumptionRecord::from_payload(raw.as_object().unwrap());

        assert_eq!(record.when, None);
        assert_eq!(record.date.as_deref(), Some("2024/10/02"));
    }

    #[test]
    fn recognises_estimated_readings() {
        let raw = json!({"obtainMethod": "Estimada"});
        assert!(ConsumptionRecord::from_payload(raw.as_object().unwrap()).is_estimated());

        let raw = json!({"obtainMethod": "Real"});
        assert!(!ConsumptionRecord::from_payload(raw.as_object().unwrap()).is_estimated());
    }

    #[test]
    fn series_totals_skip_missing_values() {
        let records = [
            json!({"consumptionKWh": 1.25, "surplusEnergyKWh": 0.5}),
            json!({"consumptionKWh": null}),
            json!({"consumptionKWh": "0,75"}),
        ]
        .iter()
        .map(|v| ConsumptionRecord::from_payload(v.as_object().unwrap()))
        .collect();

        let day = NaiveDate::from_ymd_opt(2024, 10, 2).unwrap();
        let series = ConsumptionSeries {
            supply: Supply::from_payload(&Payload::new()),
            start: day,
            end: day,
            measurement_type: MeasurementType::Hourly,
            data: records,
        };

        assert_eq!(series.total_kwh(), 2.0);
        assert_eq!(series.total_surplus_kwh(), 0.5);
    }
}
