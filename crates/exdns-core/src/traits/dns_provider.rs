// # DNS Provider Trait
//
// Defines the interface the webhook uses to read and mutate DNS records on a
// backend.
//
// ## Implementations
//
// - Technitium DNS: `exdns-provider-technitium` crate
//
// ## Usage
//
// ```rust,ignore
// use exdns_core::{Changes, DnsProvider};
//
// async fn sync(provider: &dyn DnsProvider, changes: Changes) -> exdns_core::Result<()> {
//     let current = provider.records().await?;
//     tracing::info!("{} endpoints currently managed", current.len());
//
//     provider.apply_changes(Some(changes)).await
// }
// ```

use async_trait::async_trait;

use crate::config::ProviderConfig;
use crate::domain_filter::DomainFilter;
use crate::endpoint::Endpoint;
use crate::plan::Changes;

/// Trait for DNS provider implementations
///
/// Implementations translate between the generic [`Endpoint`] model and the
/// backend's own record model.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Call Model
///
/// - Every method performs its backend calls sequentially
/// - No retries and no backoff: a failed call ends that attempt
/// - No state is kept between calls; the backend is the source of truth
/// - Dropping the returned future cancels the outstanding backend call
#[async_trait]
pub trait DnsProvider: Send + Sync {
    /// List the endpoints currently held by the backend
    ///
    /// Only endpoints accepted by the provider's domain filter are returned.
    ///
    /// # Returns
    ///
    /// - `Ok(Vec<Endpoint>)`: the managed endpoints
    /// - `Err(Error)`: if the backend could not be read and the provider
    ///   chooses to surface that
    async fn records(&self) -> Result<Vec<Endpoint>, crate::Error>;

    /// Apply a change set
    ///
    /// # Parameters
    ///
    /// - `changes`: the change set; `None` stands for a missing (nil) change
    ///   set and is rejected without touching the backend
    ///
    /// # Returns
    ///
    /// - `Ok(())`: every record operation succeeded
    /// - `Err(Error)`: the change set was rejected or some operations failed
    async fn apply_changes(&self, changes: Option<Changes>) -> Result<(), crate::Error>;

    /// Adjust endpoints before external-dns plans with them
    ///
    /// The default implementation returns the endpoints unchanged.
    async fn adjust_endpoints(
        &self,
        endpoints: Vec<Endpoint>,
    ) -> Result<Vec<Endpoint>, crate::Error> {
        Ok(endpoints)
    }

    /// The domain filter this provider instance was built with
    fn domain_filter(&self) -> &DomainFilter;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing DNS providers from configuration
pub trait DnsProviderFactory: Send + Sync {
    /// Create a DnsProvider instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Configuration specific to this provider
    /// - `domain_filter`: Names the provider is allowed to manage
    fn create(
        &self,
        config: &ProviderConfig,
        domain_filter: DomainFilter,
    ) -> Result<Box<dyn DnsProvider>, crate::Error>;
}
