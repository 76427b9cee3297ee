//! Backend operations the provider depends on
//!
//! [`TechnitiumProvider`](crate::TechnitiumProvider) talks to the server only
//! through [`DnsService`], so tests can swap the HTTP client for a double.

use crate::sdk::{ApiClient, Record, RecordRequest, Zone};
use async_trait::async_trait;
use exdns_core::Result;
use tracing::debug;

/// Record-level operations on a DNS backend
#[async_trait]
pub trait DnsService: Send + Sync {
    /// Every zone on the server
    async fn get_zones(&self) -> Result<Vec<Zone>>;

    /// Every record of every zone
    ///
    /// All or nothing: a failure on any zone fails the whole listing.
    async fn get_records(&self) -> Result<Vec<Record>>;

    /// Add one record
    async fn create_record(&self, request: &RecordRequest) -> Result<Record>;

    /// Delete one record
    async fn delete_record(&self, record: &Record) -> Result<()>;
}

#[async_trait]
impl DnsService for ApiClient {
    async fn get_zones(&self) -> Result<Vec<Zone>> {
        self.list_zones().await
    }

    async fn get_records(&self) -> Result<Vec<Record>> {
        let zones = self.list_zones().await?;

        let mut records = Vec::new();
        for zone in &zones {
            let zone_records = self.list_records(&zone.name).await.inspect_err(|e| {
                debug!("Listing records of zone {} failed: {}", zone.name, e);
            })?;
            debug!("Zone {} holds {} records", zone.name, zone_records.len());
            records.extend(zone_records);
        }

        Ok(records)
    }

    async fn create_record(&self, request: &RecordRequest) -> Result<Record> {
        ApiClient::create_record(self, request).await
    }

    async fn delete_record(&self, record: &Record) -> Result<()> {
        ApiClient::delete_record(self, record).await
    }
}
