//! Async client for the Datadis private REST API (Spanish electricity
//! metering data).
//!
//! ```no_run
//! use datadis_client::{DatadisClient, DateRange, MeasurementType, SupplyFilter, SupplyRef};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = DatadisClient::new("12345678Z", "password")?;
//! client.login().await?;
//!
//! for supply in client.get_supplies(&SupplyFilter::default()).await? {
//!     let records = client
//!         .get_consumption_data(
//!             &SupplyRef::from(&supply),
//!             Some(DateRange::today()),
//!             MeasurementType::Hourly,
//!             None,
//!         )
//!         .await?;
//!     println!("{}: {} records", supply.cups, records.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod dates;
pub mod endpoints;
pub mod errors;
pub mod models;
pub mod params;
pub mod retry;
pub mod session;
pub mod transport;

pub use client::DatadisClient;
pub use config::{ClientConfig, RetryConfig};
pub use errors::{ClientInitError, DatadisError, ErrorKind};
pub use models::{
    Account, ConsumptionRecord, ConsumptionSeries, ContractDetail, Distributor, DistributorSet,
    MaxPowerRecord, Supply,
};
pub use params::{DateRange, MeasurementType, SupplyFilter, SupplyRef};
pub use retry::RetryPolicy;
pub use session::LoginOutcome;
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport, TransportError};
