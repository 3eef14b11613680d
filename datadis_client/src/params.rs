//! Request parameters for the Datadis private endpoints.
//!
//! The public types ([`SupplyRef`], [`DateRange`], [`MeasurementType`],
//! [`SupplyFilter`]) are what callers build; the crate-private `*Query`
//! structs are their wire shape, serialized into query-string pairs.

use chrono::{Local, NaiveDate};
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

use crate::dates::format_month;
use crate::errors::DatadisError;
use crate::models::supply::Supply;

/// Identifies one supply point for the per-supply endpoints.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct SupplyRef {
    pub cups: String,
    pub distributor_code: String,
    pub point_type: Option<i64>,
}

impl SupplyRef {
    pub fn new(cups: impl Into<String>, distributor_code: impl Into<String>) -> Self {
        Self {
            cups: cups.into(),
            distributor_code: distributor_code.into(),
            point_type: None,
        }
    }

    pub fn with_point_type(mut self, point_type: i64) -> Self {
        self.point_type = Some(point_type);
        self
    }

    /// CUPS and distributor code must both be non-blank.
    pub(crate) fn validate(&self, operation: &str) -> Result<(), DatadisError> {
        let mut missing = Vec::new();
        if self.cups.trim().is_empty() {
            missing.push("cups");
        }
        if self.distributor_code.trim().is_empty() {
            missing.push("distributorCode");
        }
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DatadisError::validation(format!(
                "{operation}: {} mandatory",
                missing.join(" and ") + if missing.len() > 1 { " are" } else { " is" }
            )))
        }
    }
}

impl From<&Supply> for SupplyRef {
    fn from(supply: &Supply) -> Self {
        Self {
            cups: supply.cups.clone(),
            distributor_code: supply.distributor_code.clone(),
            point_type: supply.point_type,
        }
    }
}

/// Inclusive date range. Upstream works at month granularity, so only the
/// year and month of each bound reach the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn single_day(date: NaiveDate) -> Self {
        Self::new(date, date)
    }

    /// Both bounds set to the current local date.
    pub fn today() -> Self {
        Self::single_day(Local::now().date_naive())
    }

    pub(crate) fn start_month(&self) -> String {
        format_month(self.start)
    }

    pub(crate) fn end_month(&self) -> String {
        format_month(self.end)
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::today()
    }
}

/// Granularity of consumption data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MeasurementType {
    #[default]
    Hourly,
    /// Only available for some point types and distributors; upstream decides.
    QuarterHourly,
}

impl MeasurementType {
    /// Wire value: `0` hourly, `1` quarter-hourly.
    pub fn code(self) -> u8 {
        match self {
            Self::Hourly => 0,
            Self::QuarterHourly => 1,
        }
    }
}

/// Optional filters for the supplies listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SupplyFilter {
    /// NIF of another holder who authorised this account.
    pub authorized_nif: Option<String>,
    pub distributor_code: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SuppliesQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized_nif: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distributor_code: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ContractDetailQuery<'a> {
    pub cups: &'a str,
    pub distributor_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized_nif: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ConsumptionQuery<'a> {
    pub cups: &'a str,
    pub distributor_code: &'a str,
    pub start_date: String,
    pub end_date: String,
    pub measurement_type: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub point_type: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized_nif: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MaxPowerQuery<'a> {
    pub cups: &'a str,
    pub distributor_code: &'a str,
    pub start_date: String,
    pub end_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized_nif: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DistributorsQuery<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorized_nif: Option<&'a str>,
}

/// Flattens a query struct into ordered `(name, value)` pairs.
pub(crate) fn to_query<T: Serialize>(params: &T) -> Result<IndexMap<String, String>, DatadisError> {
    let value = serde_json::to_value(params)
        .map_err(|e| DatadisError::client(format!("failed to encode query parameters: {e}")))?;

    let Value::Object(fields) = value else {
        return Err(DatadisError::client("query parameters must encode to an object"));
    };

    Ok(fields
        .into_iter()
        .filter_map(|(name, value)| match value {
            Value::String(s) => Some((name, s)),
            Value::Number(n) => Some((name, n.to_string())),
            Value::Bool(b) => Some((name, b.to_string())),
            _ => None,
        })
        .collect())
}

/// Treats blank optional strings as unset.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
