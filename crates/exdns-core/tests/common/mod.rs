//! Test doubles and common utilities for contract tests
//!
//! The doubles record what they were asked to do into collectors owned by the
//! test, so assertions never depend on shared global state.

#![allow(dead_code)]

use exdns_core::config::ProviderConfig;
use exdns_core::error::{Error, Result};
use exdns_core::{Changes, DnsProvider, DnsProviderFactory, DomainFilter, Endpoint};
use std::sync::{Arc, Mutex};

/// A DnsProvider that serves a fixed set of endpoints and records changes
pub struct MockDnsProvider {
    endpoints: Vec<Endpoint>,
    applied: Arc<Mutex<Vec<Changes>>>,
    domain_filter: DomainFilter,
}

impl MockDnsProvider {
    pub fn new(endpoints: Vec<Endpoint>, applied: Arc<Mutex<Vec<Changes>>>) -> Self {
        Self {
            endpoints,
            applied,
            domain_filter: DomainFilter::any(),
        }
    }
}

#[async_trait::async_trait]
impl DnsProvider for MockDnsProvider {
    async fn records(&self) -> Result<Vec<Endpoint>> {
        Ok(self.endpoints.clone())
    }

    async fn apply_changes(&self, changes: Option<Changes>) -> Result<()> {
        let changes = changes.ok_or_else(|| Error::invalid_input("changes cannot be nil"))?;
        self.applied.lock().unwrap().push(changes);
        Ok(())
    }

    fn domain_filter(&self) -> &DomainFilter {
        &self.domain_filter
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}

/// Factory handing out MockDnsProviders that share one change collector
pub struct MockFactory {
    pub endpoints: Vec<Endpoint>,
    pub applied: Arc<Mutex<Vec<Changes>>>,
}

impl DnsProviderFactory for MockFactory {
    fn create(
        &self,
        config: &ProviderConfig,
        domain_filter: DomainFilter,
    ) -> Result<Box<dyn DnsProvider>> {
        config.validate()?;
        let mut provider = MockDnsProvider::new(self.endpoints.clone(), Arc::clone(&self.applied));
        provider.domain_filter = domain_filter;
        Ok(Box::new(provider))
    }
}

/// A valid provider configuration for tests
pub fn technitium_config() -> ProviderConfig {
    ProviderConfig::Technitium {
        api_url: "http://127.0.0.1:5380".to_string(),
        user: "admin".to_string(),
        pass: "admin".to_string(),
        debug: false,
        timeout_secs: 5,
    }
}
