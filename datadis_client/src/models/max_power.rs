use chrono::NaiveDateTime;
use serde::Serialize;

use crate::dates::parse_date_time;
use crate::models::payload::{self, Payload};

/// Peak power demand registered for one tariff period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxPowerRecord {
    pub cups: String,
    pub date: Option<String>,
    pub time: Option<String>,
    /// Peak demand as reported by upstream (W).
    pub max_power: Option<f64>,
    /// Tariff period label, e.g. "VALLE" or "PUNTA".
    pub period: String,

    pub when: Option<NaiveDateTime>,
}

impl MaxPowerRecord {
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
            max_power: payload::number(obj, "maxPower"),
            period: payload::string_or_empty(obj, "period"),
            when,
        }
    }
}
