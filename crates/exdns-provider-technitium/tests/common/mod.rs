//! Test doubles and fixtures for the Technitium contract tests
//!
//! `MockDnsService` accumulates every mutation into collectors the test
//! passes in, so each test observes only its own side effects.

#![allow(dead_code)]

use exdns_core::{Error, Result};
use exdns_provider_technitium::sdk::{RData, Record, RecordRequest, Zone};
use exdns_provider_technitium::{ApiClient, Configuration, DnsService};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Session token handed out by the mocked login endpoint
pub const TOKEN: &str = "932b2a3495852c15af01598f62563ae534460388b6a370bfbbb8bb6094b698e9";

/// Side effects observed by a [`MockDnsService`]
#[derive(Clone, Default)]
pub struct Collectors {
    pub created: Arc<Mutex<Vec<RecordRequest>>>,
    pub deleted: Arc<Mutex<Vec<Record>>>,
    pub calls: Arc<AtomicUsize>,
    /// "delete" / "create" per mutation attempt, in call order
    pub log: Arc<Mutex<Vec<&'static str>>>,
}

impl Collectors {
    pub fn created(&self) -> Vec<RecordRequest> {
        self.created.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<Record> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn log(&self) -> Vec<&'static str> {
        self.log.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Whether a create request for exactly this record was issued
    pub fn was_created(&self, name: &str, record_type: &str, value: &str, ttl: Option<u32>) -> bool {
        self.created().iter().any(|request| {
            request.domain == name
                && request.record_type == record_type
                && [&request.ip_address, &request.cname, &request.text]
                    .iter()
                    .any(|field| field.as_deref() == Some(value))
                && request.ttl == ttl
        })
    }
}

/// In-memory DnsService
pub struct MockDnsService {
    pub records: Vec<Record>,
    pub fail_listing: bool,
    /// Record values whose mutation fails
    pub failing_values: Vec<String>,
    pub collectors: Collectors,
}

impl MockDnsService {
    pub fn new(records: Vec<Record>, collectors: Collectors) -> Self {
        Self {
            records,
            fail_listing: false,
            failing_values: Vec::new(),
            collectors,
        }
    }

    pub fn failing(collectors: Collectors) -> Self {
        Self {
            fail_listing: true,
            ..Self::new(Vec::new(), collectors)
        }
    }

    fn fails_for(&self, values: [&Option<String>; 3]) -> bool {
        values
            .iter()
            .filter_map(|value| value.as_deref())
            .any(|value| self.failing_values.iter().any(|f| f == value))
    }
}

#[async_trait::async_trait]
impl DnsService for MockDnsService {
    async fn get_zones(&self) -> Result<Vec<Zone>> {
        self.collectors.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(Error::transport("ListZones", "connection refused"));
        }
        Ok(vec![zone("a.au", "Secondary"), zone("b.au", "Primary")])
    }

    async fn get_records(&self) -> Result<Vec<Record>> {
        self.collectors.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_listing {
            return Err(Error::transport("ListRecords", "connection refused"));
        }
        Ok(self.records.clone())
    }

    async fn create_record(&self, request: &RecordRequest) -> Result<Record> {
        self.collectors.calls.fetch_add(1, Ordering::SeqCst);
        self.collectors.log.lock().unwrap().push("create");
        if self.fails_for([&request.ip_address, &request.cname, &request.text]) {
            return Err(backend_error("CreateRecord", "record already exists"));
        }
        self.collectors.created.lock().unwrap().push(request.clone());
        Ok(Record {
            name: request.domain.clone(),
            record_type: request.record_type.clone(),
            ttl: request.ttl.unwrap_or(3600),
            ..Default::default()
        })
    }

    async fn delete_record(&self, record: &Record) -> Result<()> {
        self.collectors.calls.fetch_add(1, Ordering::SeqCst);
        self.collectors.log.lock().unwrap().push("delete");
        let r_data = &record.r_data;
        if self.fails_for([&r_data.ip_address, &r_data.cname, &r_data.text]) {
            return Err(backend_error("DeleteRecord", "no such record"));
        }
        self.collectors.deleted.lock().unwrap().push(record.clone());
        Ok(())
    }
}

fn backend_error(operation: &str, message: &str) -> Error {
    Error::Backend {
        operation: operation.to_string(),
        status: "error".to_string(),
        message: message.to_string(),
        stack_trace: None,
        inner_message: None,
    }
}

pub fn zone(name: &str, zone_type: &str) -> Zone {
    Zone {
        name: name.to_string(),
        zone_type: zone_type.to_string(),
        ..Default::default()
    }
}

pub fn a_record(name: &str, ttl: u32, ip: &str) -> Record {
    Record {
        name: name.to_string(),
        record_type: "A".to_string(),
        ttl,
        r_data: RData {
            ip_address: Some(ip.to_string()),
            ..Default::default()
        },
        dnssec_status: "Unknown".to_string(),
        ..Default::default()
    }
}

/// The three A records of zones a.au and b.au
pub fn fixture_records() -> Vec<Record> {
    vec![
        a_record("a.au", 3000, "1.1.1.1"),
        a_record("a.au", 3000, "1.1.1.2"),
        a_record("b.au", 3000, "2.2.2.2"),
    ]
}

// ===== HTTP fixtures =====

/// Client pointed at `server`
pub fn api_client(server: &MockServer) -> ApiClient {
    let mut cfg = Configuration::new(server.uri(), "admin", "admin");
    cfg.debug = true;
    ApiClient::new(cfg).expect("client builds")
}

/// Mount a login endpoint that accepts admin/admin and hands out [`TOKEN`]
pub async fn mount_login(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/user/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "displayName": "Administrator",
            "username": "admin",
            "token": TOKEN,
            "status": "ok"
        })))
        .mount(server)
        .await;
}

/// Successful envelope around `payload`
pub fn ok(payload: serde_json::Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "response": payload, "status": "ok" }))
}

/// Failed envelope
pub fn failed(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "status": "error",
        "errorMessage": message,
        "stackTrace": "at DnsServerCore.WebServiceZonesApi",
        "innerErrorMessage": "inner failure"
    }))
}

pub fn record_json(name: &str, record_type: &str, ttl: u32, r_data: serde_json::Value) -> serde_json::Value {
    json!({
        "disabled": false,
        "name": name,
        "type": record_type,
        "ttl": ttl,
        "rData": r_data,
        "dnssecStatus": "Unknown"
    })
}

pub fn zone_json(name: &str) -> serde_json::Value {
    json!({
        "name": name,
        "type": "Primary",
        "internal": false,
        "dnssecStatus": "Unsigned",
        "soaSerial": 1,
        "lastModified": "2022-03-05T10:45:31.1238744Z",
        "disabled": false
    })
}

/// Requests the server received for `request_path`
pub async fn requests_to(server: &MockServer, request_path: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|request| request.url.path() == request_path)
        .collect()
}

/// Query parameters of a received request, in order
pub fn query_of(request: &wiremock::Request) -> Vec<(String, String)> {
    request
        .url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}
