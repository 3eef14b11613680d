//! The Datadis API facade.
//!
//! One method per remote operation. Every method validates its input, builds
//! the query, sends it through the [`Transport`] with the session's bearer
//! token, and maps the JSON answer into domain entities. Whatever goes wrong,
//! the caller sees a [`DatadisError`].

use std::time::Duration;

use indexmap::IndexMap;
use serde_json::Value;
use snafu::ResultExt;
use tracing::{debug, warn};

use shared_utils::env::{get_env_var_opt, parse_env_var};

use crate::config::{CONFIG_PATH_VAR, ClientConfig};
use crate::endpoints;
use crate::errors::{ClientInitError, DatadisError, InvalidEnvVarSnafu, empty_body};
use crate::models::payload::Payload;
use crate::models::{
    Account, ConsumptionRecord, ConsumptionSeries, ContractDetail, DistributorSet, MaxPowerRecord,
    Supply,
};
use crate::params::{
    ConsumptionQuery, ContractDetailQuery, DateRange, DistributorsQuery, MaxPowerQuery,
    MeasurementType, SuppliesQuery, SupplyFilter, SupplyRef, non_blank, to_query,
};
use crate::retry::RetryPolicy;
use crate::session::{LoginOutcome, SessionManager};
use crate::transport::{HttpRequest, ReqwestTransport, Transport};

/// Overrides the configured timeout when set.
pub const TIMEOUT_MS_VAR: &str = "DATADIS_TIMEOUT_MS";

/// Client for the Datadis private API.
///
/// Call [`login`](Self::login) once before any data operation. Data operations
/// take `&self` and may run concurrently; `login` takes `&mut self`.
pub struct DatadisClient {
    session: SessionManager,
    transport: Box<dyn Transport>,
}

impl DatadisClient {
    /// Client against the public Datadis origin with default settings.
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self, ClientInitError> {
        Self::with_options(username, password, None, None)
    }

    /// Client with an optional timeout (default 10 s) and retry policy.
    pub fn with_options(
        username: impl Into<String>,
        password: impl Into<String>,
        timeout: Option<Duration>,
        retry: Option<RetryPolicy>,
    ) -> Result<Self, ClientInitError> {
        let config = ClientConfig::default();
        let timeout = timeout.unwrap_or_else(|| config.timeout());
        let transport = ReqwestTransport::new(config.base_url, timeout, retry)?;
        Ok(Self::with_transport(Account::new(username, password), transport))
    }

    pub fn with_config(account: Account, config: &ClientConfig) -> Result<Self, ClientInitError> {
        let transport =
            ReqwestTransport::new(config.base_url.clone(), config.timeout(), config.retry_policy())?;
        Ok(Self::with_transport(account, transport))
    }

    /// Client over any [`Transport`] implementation.
    pub fn with_transport(account: Account, transport: impl Transport + 'static) -> Self {
        Self {
            session: SessionManager::new(account),
            transport: Box::new(transport),
        }
    }

    /// Builds a client from the environment: credentials from
    /// `DATADIS_USERNAME` / `DATADIS_PASSWORD`, an optional TOML config file
    /// named by `DATADIS_CONFIG`, and an optional `DATADIS_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, ClientInitError> {
        let account = Account::from_env()?;
        let mut config = match get_env_var_opt(CONFIG_PATH_VAR) {
            Some(path) => ClientConfig::from_path(path)?,
            None => ClientConfig::default(),
        };
        if let Some(timeout_ms) = parse_env_var::<u64>(TIMEOUT_MS_VAR).context(InvalidEnvVarSnafu)? {
            config.timeout_ms = timeout_ms;
        }
        Self::with_config(account, &config)
    }

    pub fn account(&self) -> &Account {
        self.session.account()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Logs in and stores the bearer token for all later requests.
    pub async fn login(&mut self) -> Result<LoginOutcome, DatadisError> {
        self.session.login(self.transport.as_ref()).await
    }

    /// Lists the supplies visible to the account.
    pub async fn get_supplies(&self, filter: &SupplyFilter) -> Result<Vec<Supply>, DatadisError> {
        let query = to_query(&SuppliesQuery {
            authorized_nif: non_blank(filter.authorized_nif.as_deref()),
            distributor_code: non_blank(filter.distributor_code.as_deref()),
        })?;
        let payload = self.fetch(endpoints::GET_SUPPLIES, query).await?;
        map_list(endpoints::GET_SUPPLIES, payload, Supply::from_payload)
    }

    /// Contract periods of one supply, current and historical.
    pub async fn get_contract_detail(
        &self,
        supply: &SupplyRef,
        authorized_nif: Option<&str>,
    ) -> Result<Vec<ContractDetail>, DatadisError> {
        supply.validate("getContractDetail")?;
        let query = to_query(&ContractDetailQuery {
            cups: supply.cups.trim(),
            distributor_code: supply.distributor_code.trim(),
            authorized_nif: non_blank(authorized_nif),
        })?;
        let payload = self.fetch(endpoints::GET_CONTRACT_DETAIL, query).await?;
        map_list(endpoints::GET_CONTRACT_DETAIL, payload, ContractDetail::from_payload)
    }

    /// Consumption records of one supply over `range` (today when `None`).
    ///
    /// Upstream serves whole months and accepts each exact range only once a
    /// day; repeating the same query the same day may be rejected.
    pub async fn get_consumption_data(
        &self,
        supply: &SupplyRef,
        range: Option<DateRange>,
        measurement_type: MeasurementType,
        authorized_nif: Option<&str>,
    ) -> Result<Vec<ConsumptionRecord>, DatadisError> {
        supply.validate("getConsumptionData")?;
        let range = range.unwrap_or_default();
        let query = to_query(&ConsumptionQuery {
            cups: supply.cups.trim(),
            distributor_code: supply.distributor_code.trim(),
            start_date: range.start_month(),
            end_date: range.end_month(),
            measurement_type: measurement_type.code(),
            point_type: supply.point_type,
            authorized_nif: non_blank(authorized_nif),
        })?;
        let payload = self.fetch(endpoints::GET_CONSUMPTION_DATA, query).await?;
        map_list(endpoints::GET_CONSUMPTION_DATA, payload, ConsumptionRecord::from_payload)
    }

    /// Same as [`get_consumption_data`](Self::get_consumption_data), wrapped
    /// together with the supply, the requested bounds and the granularity.
    pub async fn get_consumption_series(
        &self,
        supply: &Supply,
        range: Option<DateRange>,
        measurement_type: MeasurementType,
        authorized_nif: Option<&str>,
    ) -> Result<ConsumptionSeries, DatadisError> {
        let range = range.unwrap_or_default();
        let data = self
            .get_consumption_data(
                &SupplyRef::from(supply),
                Some(range),
                measurement_type,
                authorized_nif,
            )
            .await?;

        Ok(ConsumptionSeries {
            supply: supply.clone(),
            start: range.start,
            end: range.end,
            measurement_type,
            data,
        })
    }

    /// Peak power per tariff period of one supply over `range` (today when `None`).
    pub async fn get_max_power(
        &self,
        supply: &SupplyRef,
        range: Option<DateRange>,
        authorized_nif: Option<&str>,
    ) -> Result<Vec<MaxPowerRecord>, DatadisError> {
        supply.validate("getMaxPower")?;
        let range = range.unwrap_or_default();
        let query = to_query(&MaxPowerQuery {
            cups: supply.cups.trim(),
            distributor_code: supply.distributor_code.trim(),
            start_date: range.start_month(),
            end_date: range.end_month(),
            authorized_nif: non_blank(authorized_nif),
        })?;
        let payload = self.fetch(endpoints::GET_MAX_POWER, query).await?;
        map_list(endpoints::GET_MAX_POWER, payload, MaxPowerRecord::from_payload)
    }

    /// Distributors that hold at least one supply for the account.
    pub async fn get_distributors_with_supplies(
        &self,
        authorized_nif: Option<&str>,
    ) -> Result<DistributorSet, DatadisError> {
        let query = to_query(&DistributorsQuery {
            authorized_nif: non_blank(authorized_nif),
        })?;
        let payload = self
            .fetch(endpoints::GET_DISTRIBUTORS_WITH_SUPPLIES, query)
            .await?;

        match payload {
            Value::Object(obj) => Ok(DistributorSet::from_payload(&obj)),
            other => Err(unexpected_shape(
                endpoints::GET_DISTRIBUTORS_WITH_SUPPLIES,
                "an object",
                &other,
            )),
        }
    }

    async fn fetch(
        &self,
        path: &'static str,
        query: IndexMap<String, String>,
    ) -> Result<Value, DatadisError> {
        let request = self
            .session
            .authorize(HttpRequest::get(path).with_query(query))?;
        debug!(
            path,
            params = ?request.query.keys().collect::<Vec<_>>(),
            "Datadis request"
        );

        let response = self
            .transport
            .send(request)
            .await
            .map_err(DatadisError::from_request_failure)?;

        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| DatadisError::Client {
            message: format!("malformed response from {path}: {e}"),
            status: response.status,
            body: empty_body(),
        })
    }
}

/// Maps a JSON array with `map`, preserving order. Entries that are not
/// objects are skipped with a warning; `null` maps to an empty list.
fn map_list<T>(
    path: &str,
    payload: Value,
    map: fn(&Payload) -> T,
) -> Result<Vec<T>, DatadisError> {
    match payload {
        Value::Array(items) => Ok(items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match item.as_object() {
                Some(obj) => Some(map(obj)),
                None => {
                    warn!(path, index, "Skipping non-object entry in Datadis response");
                    None
                }
            })
            .collect()),
        Value::Null => Ok(Vec::new()),
        other => Err(unexpected_shape(path, "a list", &other)),
    }
}

fn unexpected_shape(path: &str, expected: &str, got: &Value) -> DatadisError {
    let got = match got {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    };
    DatadisError::client(format!("expected {expected} from {path}, got {got}"))
}
