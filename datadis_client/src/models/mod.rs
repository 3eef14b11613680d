//! Domain entities built from Datadis responses.
//!
//! Each entity has a pure `from_payload` constructor taking one untyped JSON
//! object. Constructors never fail: missing or malformed fields become empty
//! strings or `None`, and unknown fields are ignored.

pub mod account;
pub mod consumption;
pub mod contract_detail;
pub mod distributor;
pub mod max_power;
pub mod payload;
pub mod supply;

pub use account::Account;
pub use consumption::{ConsumptionRecord, ConsumptionSeries};
pub use contract_detail::ContractDetail;
pub use distributor::{DISTRIBUTORS, Distributor, DistributorSet, distributor_name};
pub use max_power::MaxPowerRecord;
pub use supply::Supply;
