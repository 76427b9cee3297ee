//! Record listing, creation and deletion

use super::ApiClient;
use super::zones::Zone;
use exdns_core::{Error, RecordType, Result};
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use tracing::debug;

const LIST_RECORDS_PATH: &str = "/api/zones/records/get";
const ADD_RECORD_PATH: &str = "/api/zones/records/add";
const DELETE_RECORD_PATH: &str = "/api/zones/records/delete";

/// One record as stored by the server
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Record {
    pub disabled: bool,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub ttl: u32,
    #[serde(rename = "rData")]
    pub r_data: RData,
    pub dnssec_status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_on: Option<String>,
}

/// Type-dependent record data
///
/// Only the fields of the supported record kinds are decoded; the server
/// sends many more (SOA, RRSIG, ...) which are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// The record-data field a record type keeps its value in
///
/// | type        | field       |
/// |-------------|-------------|
/// | A, AAAA     | `ipAddress` |
/// | CNAME       | `cname`     |
/// | TXT         | `text`      |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueField {
    IpAddress,
    Cname,
    Text,
}

impl ValueField {
    /// Field for `record_type`, `None` for types without a mapping
    pub fn for_type(record_type: &RecordType) -> Option<Self> {
        match record_type {
            RecordType::A | RecordType::Aaaa => Some(Self::IpAddress),
            RecordType::Cname => Some(Self::Cname),
            RecordType::Txt => Some(Self::Text),
            RecordType::Other(_) => None,
        }
    }

    /// Query parameter name
    pub fn param(self) -> &'static str {
        match self {
            Self::IpAddress => "ipAddress",
            Self::Cname => "cname",
            Self::Text => "text",
        }
    }

    pub fn get(self, r_data: &RData) -> Option<&str> {
        match self {
            Self::IpAddress => r_data.ip_address.as_deref(),
            Self::Cname => r_data.cname.as_deref(),
            Self::Text => r_data.text.as_deref(),
        }
    }

    pub fn set(self, r_data: &mut RData, value: impl Into<String>) {
        let slot = match self {
            Self::IpAddress => &mut r_data.ip_address,
            Self::Cname => &mut r_data.cname,
            Self::Text => &mut r_data.text,
        };
        *slot = Some(value.into());
    }

    pub fn set_request(self, request: &mut RecordRequest, value: impl Into<String>) {
        let slot = match self {
            Self::IpAddress => &mut request.ip_address,
            Self::Cname => &mut request.cname,
            Self::Text => &mut request.text,
        };
        *slot = Some(value.into());
    }
}

/// Payload of `/api/zones/records/get`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListRecordsResponse {
    pub zone: Zone,
    pub records: Vec<Record>,
}

/// Payload of `/api/zones/records/add`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRecordResponse {
    #[serde(default, alias = "Zone")]
    pub zone: Zone,
    pub added_record: Record,
}

/// Parameters of `/api/zones/records/add`
///
/// Serialized straight into the query string: absent options and empty
/// strings are left out, the rest appear in declaration order. The session
/// token is added by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordRequest {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "String::is_empty")]
    pub record_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_ttl: Option<u32>,

    // A, AAAA
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ptr: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_ptr_zone: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_svcb_hints: Option<bool>,

    // NS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_server: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub glue: Option<String>,

    // CNAME
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,

    // PTR
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ptr_name: Option<String>,

    // MX
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exchange: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preference: Option<u16>,

    // TXT
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub split_text: Option<bool>,

    // RP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailbox: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub txt_domain: Option<String>,

    // SRV
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,

    // NAPTR
    #[serde(skip_serializing_if = "Option::is_none")]
    pub naptr_order: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub naptr_preference: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub naptr_flags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub naptr_services: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub naptr_regexp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub naptr_replacement: Option<String>,

    // DNAME
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dname: Option<String>,

    // DS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_tag: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,

    // SSHFP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sshfp_algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sshfp_fingerprint_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sshfp_fingerprint: Option<String>,

    // TLSA
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tlsa_certificate_usage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tlsa_selector: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tlsa_matching_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tlsa_certificate_association_data: Option<String>,

    // SVCB, HTTPS
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svc_priority: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svc_target_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub svc_params: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_ipv4_hint: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_ipv6_hint: Option<bool>,

    // URI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_priority: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri_weight: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,

    // CAA
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    // ANAME
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aname: Option<String>,

    // FWD
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwarder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forwarder_priority: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dnssec_validation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy_password: Option<String>,

    // APP
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub record_data: Option<String>,

    // Unknown types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rdata: Option<String>,
}

impl RecordRequest {
    /// Request for a record of `record_type` at `domain`, all other fields unset
    pub fn new(domain: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            record_type: record_type.into(),
            ..Default::default()
        }
    }
}

impl ApiClient {
    /// List the records of a zone
    pub async fn list_records(&self, domain: &str) -> Result<Vec<Record>> {
        let payload: ListRecordsResponse = self
            .call_api(
                "ListRecords",
                LIST_RECORDS_PATH,
                &[("domain", domain), ("listZone", "true")],
            )
            .await?;
        Ok(payload.records)
    }

    /// Add a record, returning it as the server stored it
    pub async fn create_record(&self, request: &RecordRequest) -> Result<Record> {
        let payload: CreateRecordResponse = self
            .call_api("CreateRecord", ADD_RECORD_PATH, request)
            .await?;
        Ok(payload.added_record)
    }

    /// Delete a record
    ///
    /// The server identifies the record by name, type and the value field of
    /// its type. Records of other types, or without that value, are rejected
    /// before anything is sent.
    pub async fn delete_record(&self, record: &Record) -> Result<()> {
        let record_type = RecordType::from(record.record_type.as_str());
        let field = ValueField::for_type(&record_type)
            .ok_or_else(|| Error::unsupported_record_type(record_type.as_str()))?;
        let value = field.get(&record.r_data).ok_or_else(|| {
            Error::invalid_input(format!(
                "{} record {} has no {} value",
                record.record_type,
                record.name,
                field.param()
            ))
        })?;

        debug!("Deleting {} record {} ({})", record.record_type, record.name, value);

        let _: IgnoredAny = self
            .call_api(
                "DeleteRecord",
                DELETE_RECORD_PATH,
                &[
                    ("domain", record.name.as_str()),
                    ("type", record.record_type.as_str()),
                    (field.param(), value),
                ],
            )
            .await?;
        Ok(())
    }
}
