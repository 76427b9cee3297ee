// # Technitium DNS Provider
//
// This crate provides the Technitium DNS backend for the external-dns webhook.
//
// ## Layers
//
// - `sdk`: typed client for the Technitium HTTP API (login, zones, records)
// - `translate`: endpoint <-> record mapping
// - `service`: the `DnsService` seam between provider and client
// - `provider`: `TechnitiumProvider`, the `DnsProvider` implementation
//
// ## Call Model
//
// - Every API call is preceded by its own login; tokens are never cached
// - Calls are issued one after the other, never in parallel
// - No retries and no backoff; external-dns re-plans on its next loop
// - No DNS state is kept between calls
//
// ## Security Requirements
//
// - The password and session tokens NEVER appear in logs
// - Debug dumps of requests mask the `pass` and `token` parameters
//
// ## API Reference
//
// - Technitium HTTP API: https://github.com/TechnitiumSoftware/DnsServer/blob/master/APIDOCS.md
// - Login: GET `/api/user/login?user=..&pass=..&includeInfo=false`
// - List Zones: GET `/api/zones/list`
// - List Records: GET `/api/zones/records/get?domain=..&listZone=true`
// - Add Record: GET `/api/zones/records/add?domain=..&type=..&...`
// - Delete Record: GET `/api/zones/records/delete?domain=..&type=..&<value>=..`

pub mod provider;
pub mod sdk;
pub mod service;
pub mod translate;

pub use provider::TechnitiumProvider;
pub use sdk::{ApiClient, Configuration};
pub use service::DnsService;

use exdns_core::config::ProviderConfig;
use exdns_core::traits::{DnsProvider, DnsProviderFactory};
use exdns_core::{DomainFilter, Result};
use std::time::Duration;

/// Factory for creating Technitium providers
pub struct TechnitiumFactory;

impl DnsProviderFactory for TechnitiumFactory {
    fn create(
        &self,
        config: &ProviderConfig,
        domain_filter: DomainFilter,
    ) -> Result<Box<dyn DnsProvider>> {
        config.validate()?;

        let ProviderConfig::Technitium {
            api_url,
            user,
            pass,
            debug,
            timeout_secs,
        } = config;

        if *debug {
            tracing::warn!("Technitium debug dumps enabled; request and response bodies are logged");
        }

        let client = ApiClient::new(Configuration {
            base_url: api_url.clone(),
            user: user.clone(),
            pass: pass.clone(),
            debug: *debug,
            timeout: Duration::from_secs(*timeout_secs),
        })?;

        tracing::info!("Creating TechnitiumDNS provider with {}", domain_filter);

        Ok(Box::new(TechnitiumProvider::new(client, domain_filter)))
    }
}

/// Register the Technitium provider with a registry
///
/// This function should be called during initialization to make the
/// Technitium provider available.
///
/// # Example
///
/// ```rust
/// use exdns_core::ProviderRegistry;
///
/// let registry = ProviderRegistry::new();
/// exdns_provider_technitium::register(&registry);
/// assert!(registry.has_provider("technitium"));
/// ```
pub fn register(registry: &exdns_core::ProviderRegistry) {
    registry.register_provider("technitium", Box::new(TechnitiumFactory));
}
