//! Datadis origin and private API paths.

pub const BASE_URL: &str = "https://datadis.es";

pub const LOGIN: &str = "/nikola-auth/tokens/login";
pub const GET_SUPPLIES: &str = "/api-private/api/get-supplies";
pub const GET_CONTRACT_DETAIL: &str = "/api-private/api/get-contract-detail";
pub const GET_CONSUMPTION_DATA: &str = "/api-private/api/get-consumption-data";
pub const GET_MAX_POWER: &str = "/api-private/api/get-max-power";
pub const GET_DISTRIBUTORS_WITH_SUPPLIES: &str = "/api-private/api/get-distributors-with-supplies";
