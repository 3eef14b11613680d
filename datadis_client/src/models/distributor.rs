//! Distribution companies known to Datadis and their numeric codes.

use serde::Serialize;

use crate::models::payload::{self, Payload};

/// Fixed `(code, name)` table of distributors, in code order.
pub const DISTRIBUTORS: [(u8, &str); 8] = [
    (1, "Viesgo"),
    (2, "E-distribución"),
    (3, "E-redes"),
    (4, "ASEME"),
    (5, "UFD"),
    (6, "EOSA"),
    (7, "CIDE"),
    (8, "I-DE REDES ELÉCTRICAS INTELIGENTES, S.A.U."),
];

/// Looks up a distributor name by its code. Leading zeros and surrounding
/// whitespace are ignored; unknown codes yield `None`.
pub fn distributor_name(code: &str) -> Option<&'static str> {
    let code: u8 = code.trim().parse().ok()?;
    DISTRIBUTORS
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, name)| *name)
}

/// A distributor code together with its resolved name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Distributor {
    pub code: String,
    /// `None` when the code is not in [`DISTRIBUTORS`].
    pub name: Option<&'static str>,
}

impl Distributor {
    pub fn from_code(code: impl Into<String>) -> Self {
        let code = code.into();
        let name = distributor_name(&code);
        Self { code, name }
    }
}

/// The distributors that hold at least one supply for the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributorSet {
    pub distributor_codes: Vec<String>,
    /// One entry per code, same order.
    pub distributors: Vec<Distributor>,
}

impl DistributorSet {
    pub fn from_codes(codes: Vec<String>) -> Self {
        let distributors = codes.iter().cloned().map(Distributor::from_code).collect();
        Self {
            distributor_codes: codes,
            distributors,
        }
    }

    pub fn from_payload(obj: &Payload) -> Self {
        Self::from_codes(payload::string_list(obj, "distributorCodes"))
    }
}
