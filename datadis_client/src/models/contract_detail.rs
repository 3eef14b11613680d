use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::parse_date;
use crate::models::payload::{self, Payload};

/// One contract period of a supply, as returned by `get-contract-detail`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDetail {
    pub cups: String,
    pub distributor: String,
    pub marketer: String,
    pub tension: String,
    pub access_fare: String,
    pub province: String,
    pub municipality: String,
    pub postal_code: String,
    /// Contracted power in kW, one entry per tariff period (P1, P2, ...).
    #[serde(rename = "contractedPowerkW")]
    pub contracted_power_kw: Vec<f64>,
    pub time_discrimination: String,
    pub mode_power_control: String,
    pub code_fare: String,
    pub self_consumption_type_code: String,
    pub self_consumption_type_desc: String,
    pub section: String,
    pub subsection: String,
    pub partition_coefficient: Option<f64>,
    pub cau: String,
    pub installed_capacity: Option<f64>,
    /// Raw contract bounds as sent by upstream.
    pub start_date: Option<String>,
    pub end_date: Option<String>,

    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl ContractDetail {
    pub fn from_payload(obj: &Payload) -> Self {
        let start_date = payload::string(obj, "startDate");
        let end_date = payload::string(obj, "endDate");

        Self {
            cups: payload::string_or_empty(obj, "cups"),
            distributor: payload::string_or_empty(obj, "distributor"),
            marketer: payload::string_or_empty(obj, "marketer"),
            tension: payload::string_or_empty(obj, "tension"),
            access_fare: payload::string_or_empty(obj, "accessFare"),
            province: payload::string_or_empty(obj, "province"),
            municipality: payload::string_or_empty(obj, "municipality"),
            postal_code: payload::string_or_empty(obj, "postalCode"),
            contracted_power_kw: payload::number_list(obj, "contractedPowerkW"),
            time_discrimination: payload::string_or_empty(obj, "timeDiscrimination"),
            mode_power_control: payload::string_or_empty(obj, "modePowerControl"),
            code_fare: payload::string_or_empty(obj, "codeFare"),
            self_consumption_type_code: payload::string_or_empty(obj, "selfConsumptionTypeCode"),
            self_consumption_type_desc: payload::string_or_empty(obj, "selfConsumptionTypeDesc"),
            section: payload::string_or_empty(obj, "section"),
            subsection: payload::string_or_empty(obj, "subsection"),
            partition_coefficient: payload::number(obj, "partitionCoefficient"),
            cau: payload::string_or_empty(obj, "cau"),
            installed_capacity: payload::number(obj, "installedCapacity"),
            start: start_date.as_deref().and_then(parse_date),
            end: end_date.as_deref().and_then(parse_date),
            start_date,
            end_date,
        }
    }

    /// Whether the contract covers `date`. An open end means still in force.
    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        let started = self.start.is_some_and(|start| start <= date);
        let not_ended = self.end.is_none_or(|end| date <= end);
        started && not_ended
    }
}
