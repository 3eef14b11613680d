#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use datadis_client::endpoints;
use datadis_client::{
    Account, DatadisClient, HttpRequest, HttpResponse, Transport, TransportError,
};
use serde_json::{Value, json};

pub const TOKEN: &str = "eyJhbGciOiJIUzI1NiJ9.test-token";
pub const CUPS: &str = "ES0031000000000001JN0F";

type Reply = Result<HttpResponse, TransportError>;

/// In-memory transport: answers per path and records every request it sees.
#[derive(Clone, Default)]
pub struct FakeTransport {
    routes: Arc<Mutex<HashMap<String, Reply>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose login endpoint hands out [`TOKEN`].
    pub fn with_login() -> Self {
        let fake = Self::new();
        fake.reply(endpoints::LOGIN, Ok(HttpResponse::ok(TOKEN)));
        fake
    }

    pub fn reply(&self, path: &str, reply: Reply) {
        self.routes.lock().unwrap().insert(path.to_string(), reply);
    }

    pub fn reply_json(&self, path: &str, body: Value) {
        self.reply(path, Ok(HttpResponse::ok(body.to_string())));
    }

    pub fn reply_status(&self, path: &str, status: u16, body: &str) {
        self.reply(path, Err(TransportError::from_response(status, body)));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<HttpRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.path == path)
            .collect()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let reply = self.routes.lock().unwrap().get(&request.path).cloned();
        self.requests.lock().unwrap().push(request);
        reply.unwrap_or_else(|| Err(TransportError::from_response(404, "")))
    }
}

pub fn account() -> Account {
    Account::new("12345678Z", "hunter2")
}

pub fn client(fake: &FakeTransport) -> DatadisClient {
    DatadisClient::with_transport(account(), fake.clone())
}

pub async fn logged_in_client(fake: &FakeTransport) -> DatadisClient {
    let mut client = client(fake);
    client.login().await.expect("login");
    client
}

pub fn supplies_payload() -> Value {
    json!([
        {
            "address": "CALLE MAYOR 1",
            "cups": CUPS,
            "postalCode": "28001",
            "province": "Madrid",
            "municipality": "MADRID",
            "distributor": "E-DISTRIBUCIÓN REDES DIGITALES, S.L.",
            "validDateFrom": "2020/01/15",
            "validDateTo": "",
            "pointType": 5,
            "distributorCode": "2"
        },
        {
            "address": "AVDA. DEL PUERTO 20",
            "cups": "ES0021000000000002XY1F",
            "postalCode": "46021",
            "province": "Valencia",
            "municipality": "VALENCIA",
            "distributor": "I-DE REDES ELÉCTRICAS INTELIGENTES, S.A.U.",
            "validDateFrom": "2018/03/01",
            "validDateTo": "2023/02/28",
            "pointType": 4,
            "distributorCode": "8"
        }
    ])
}

pub fn consumption_payload() -> Value {
    json!([
        {"cups": CUPS, "date": "2024/10/02", "time": "01:00", "consumptionKWh": 0.21, "obtainMethod": "Real", "surplusEnergyKWh": 0.0},
        {"cups": CUPS, "date": "2024/10/02", "time": "02:00", "consumptionKWh": 0.18, "obtainMethod": "Real", "surplusEnergyKWh": 0.0},
        {"cups": CUPS, "date": "2024/10/01", "time": "24:00", "consumptionKWh": 0.30, "obtainMethod": "Estimada", "surplusEnergyKWh": 0.0}
    ])
}
