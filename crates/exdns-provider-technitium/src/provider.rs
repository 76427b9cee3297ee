//! Reconciliation against a Technitium server

use crate::sdk::ApiClient;
use crate::service::DnsService;
use crate::translate::{endpoint_to_records, endpoint_to_requests, record_to_endpoint};
use async_trait::async_trait;
use exdns_core::{
    Changes, DnsProvider, DomainFilter, DomainMatcher, Endpoint, Error, Plan, Result,
};
use tracing::{debug, error, info, warn};

/// DnsProvider backed by Technitium DNS
///
/// Stateless: every call reads from or writes to the server directly, one
/// HTTP call after the other.
pub struct TechnitiumProvider<S = ApiClient> {
    client: S,
    domain_filter: DomainFilter,
}

impl<S: DnsService> TechnitiumProvider<S> {
    pub fn new(client: S, domain_filter: DomainFilter) -> Self {
        Self {
            client,
            domain_filter,
        }
    }

    /// Endpoints on the server whose names `matcher` accepts
    ///
    /// A failed listing is logged and yields no endpoints rather than an
    /// error, so one unreachable zone never aborts a reconciliation loop.
    pub async fn fetch<M>(&self, matcher: &M) -> Result<Vec<Endpoint>>
    where
        M: DomainMatcher + ?Sized,
    {
        let records = match self.client.get_records().await {
            Ok(records) => records,
            Err(e) => {
                warn!("Failed to fetch records: {}", e);
                Vec::new()
            }
        };

        let endpoints: Vec<Endpoint> = records
            .iter()
            .filter_map(record_to_endpoint)
            .filter(|endpoint| matcher.matches(&endpoint.dns_name))
            .collect();

        debug!("Found {} endpoints", endpoints.len());
        Ok(endpoints)
    }

    /// Submit a plan: every delete first, then every create
    ///
    /// Operations are independent; a failure is recorded and the next
    /// operation is still attempted.
    async fn submit(&self, plan: &Plan) -> Result<()> {
        let mut outcome = Outcome::default();

        for endpoint in &plan.to_delete {
            match endpoint_to_records(endpoint) {
                Ok(records) => {
                    for record in &records {
                        let result = self.client.delete_record(record).await;
                        outcome.record("delete", endpoint, result);
                    }
                }
                Err(e) => outcome.record("delete", endpoint, Err(e)),
            }
        }

        for endpoint in &plan.to_create {
            match endpoint_to_requests(endpoint) {
                Ok(requests) => {
                    for request in &requests {
                        let result = self.client.create_record(request).await.map(|_| ());
                        outcome.record("create", endpoint, result);
                    }
                }
                Err(e) => outcome.record("create", endpoint, Err(e)),
            }
        }

        outcome.into_result()
    }
}

/// Tally of a batch of record operations
#[derive(Debug, Default)]
struct Outcome {
    attempted: usize,
    failures: Vec<String>,
}

impl Outcome {
    fn record(&mut self, action: &str, endpoint: &Endpoint, result: Result<()>) {
        self.attempted += 1;
        match result {
            Ok(()) => info!("{} {} {}: ok", action, endpoint.record_type, endpoint.dns_name),
            Err(e) => {
                error!("Failed to {} {}: {}", action, endpoint, e);
                self.failures.push(format!(
                    "{} {} {}: {}",
                    action, endpoint.record_type, endpoint.dns_name, e
                ));
            }
        }
    }

    fn into_result(self) -> Result<()> {
        if self.failures.is_empty() {
            return Ok(());
        }
        Err(Error::PartialApply {
            attempted: self.attempted,
            failures: self.failures,
        })
    }
}

#[async_trait]
impl<S: DnsService> DnsProvider for TechnitiumProvider<S> {
    async fn records(&self) -> Result<Vec<Endpoint>> {
        self.fetch(&self.domain_filter).await
    }

    async fn apply_changes(&self, changes: Option<Changes>) -> Result<()> {
        let changes = changes.ok_or_else(|| Error::invalid_input("changes cannot be nil"))?;

        info!(
            "Request to apply changes: {} create, {} update, {} delete",
            changes.create.len(),
            changes.update_new.len(),
            changes.delete.len()
        );

        let plan = Plan::from_changes(&changes)?;
        if plan.is_empty() {
            debug!("Nothing to do");
            return Ok(());
        }

        self.submit(&plan).await
    }

    fn domain_filter(&self) -> &DomainFilter {
        &self.domain_filter
    }

    fn provider_name(&self) -> &'static str {
        "technitium"
    }
}
