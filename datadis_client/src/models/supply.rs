//! A supply is one metering point (CUPS) registered to the account.

use chrono::NaiveDate;
use serde::Serialize;

use crate::dates::parse_date;
use crate::models::distributor::Distributor;
use crate::models::payload::{self, Payload};

/// One supply point as returned by `get-supplies`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Supply {
    /// Unique supply point code (Código Universal del Punto de Suministro).
    pub cups: String,
    pub address: String,
    pub postal_code: String,
    pub province: String,
    pub municipality: String,
    /// Distributor name as spelled by upstream.
    pub distributor: String,
    pub distributor_code: String,
    /// Metering point type (1 to 5). Absent when upstream omits it.
    pub point_type: Option<i64>,
    /// Raw validity bounds as sent by upstream.
    pub valid_date_from: Option<String>,
    pub valid_date_to: Option<String>,

    /// Parsed `valid_date_from`, `None` when missing or malformed.
    pub valid_from: Option<NaiveDate>,
    /// Parsed `valid_date_to`, `None` when missing or malformed.
    pub valid_to: Option<NaiveDate>,
    /// Distributor resolved from `distributor_code`, `None` when there is no code.
    pub distributor_info: Option<Distributor>,
}

impl Supply {
    pub fn from_payload(obj: &Payload) -> Self {
        let valid_date_from = payload::string(obj, "validDateFrom");
        let valid_date_to = payload::string(obj, "validDateTo");
        let distributor_code = payload::string_or_empty(obj, "distributorCode");

        let distributor_info = if distributor_code.trim().is_empty() {
            None
        } else {
            Some(Distributor::from_code(distributor_code.clone()))
        };

        Self {
            cups: payload::string_or_empty(obj, "cups"),
            address: payload::string_or_empty(obj, "address"),
            postal_code: payload::string_or_empty(obj, "postalCode"),
            province: payload::string_or_empty(obj, "province"),
            municipality: payload::string_or_empty(obj, "municipality"),
            distributor: payload::string_or_empty(obj, "distributor"),
            distributor_code,
            point_type: payload::integer(obj, "pointType"),
            valid_from: valid_date_from.as_deref().and_then(parse_date),
            valid_to: valid_date_to.as_deref().and_then(parse_date),
            valid_date_from,
            valid_date_to,
            distributor_info,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn maps_full_payload() {
        let raw = json!({
            "address": "CALLE MAYOR 1",
            "cups": "ES0031000000000001JN0F",
            "postalCode": "28001",
            "province": "Madrid",
            "municipality": "MADRID",
            "distributor": "E-DISTRIBUCIÓN REDES DIGITALES, S.L.",
            "validDateFrom": "2020/01/15",
            "validDateTo": "",
            "pointType": 5,
            "distributorCode": "2",
            "somethingNew": true
        });
        let supply = Supply::from_payload(raw.as_object().unwrap());

        assert_eq!(supply.cups, "ES0031000000000001JN0F");
        assert_eq!(supply.point_type, Some(5));
        assert_eq!(supply.valid_from, NaiveDate::from_ymd_opt(2020, 1, 15));
        assert_eq!(supply.valid_date_to.as_deref(), Some(""));
        assert_eq!(supply.valid_to, None);

        let distributor = supply.distributor_info.unwrap();
        assert_eq!(distributor.code, "2");
        assert_eq!(distributor.name, Some("E-distribución"));
    }

    #[test]
    fn tolerates_missing_fields() {
        let supply = Supply::from_payload(&Payload::new());

        assert!(supply.cups.is_empty());
        assert_eq!(supply.point_type, None);
        assert_eq!(supply.valid_from, None);
        assert_eq!(supply.distributor_info, None);
    }

    #[test]
    fn malformed_validity_dates_are_absent() {
        let raw = json!({"validDateFrom": "not a date", "validDateTo": "31/12/2030"});
        let supply = Supply::from_payload(raw.as_object().unwrap());

        assert_eq!(supply.valid_from, None);
        assert_eq!(supply.valid_to, NaiveDate::from_ymd_opt(2030, 12, 31));
    }
}
