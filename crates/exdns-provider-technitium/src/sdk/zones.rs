//! Zone listing

use super::ApiClient;
use exdns_core::Result;
use serde::{Deserialize, Serialize};

const LIST_ZONES_PATH: &str = "/api/zones/list";

/// Payload of `/api/zones/list`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ListZonesResponse {
    pub page_number: u32,
    pub total_pages: u32,
    pub total_zones: u32,
    pub zones: Vec<Zone>,
}

/// Zone metadata
///
/// Only `name` is used; the rest is passed through as the server sent it.
/// Timestamps stay strings because Technitium emits them without an offset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Zone {
    pub name: String,

    /// `Primary`, `Secondary`, `Stub`, `Forwarder`, ...
    #[serde(rename = "type")]
    pub zone_type: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub internal: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub dnssec_status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub soa_serial: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,

    pub disabled: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_expired: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sync_failed: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_failed: Option<bool>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notify_failed_for: Vec<String>,
}

impl ApiClient {
    /// List every zone on the server
    pub async fn list_zones(&self) -> Result<Vec<Zone>> {
        let no_params: &[(&str, &str)] = &[];
        let payload: ListZonesResponse = self
            .call_api("ListZones", LIST_ZONES_PATH, no_params)
            .await?;
        Ok(payload.zones)
    }
}
