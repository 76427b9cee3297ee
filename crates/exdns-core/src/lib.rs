// # exdns-core
//
// Core library for the external-dns webhook that manages records on a
// Technitium DNS server.
//
// ## Architecture Overview
//
// This library holds everything that does not depend on a particular backend:
// - **Endpoint**: The provider-agnostic record model exchanged with external-dns
// - **Changes / Plan**: Change sets and the delete/create lists derived from them
// - **DomainMatcher / DomainFilter**: Which names a provider instance may manage
// - **DnsProvider**: Trait every backend implements
// - **ProviderRegistry**: Plugin-based registry for DNS providers
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Backend specifics live in provider crates
// 2. **Stateless**: Nothing is cached between calls; the backend is the truth
// 3. **Plugin-Based**: Providers are registered dynamically, no hard-coded if-else
// 4. **Library-First**: The daemon is a thin shell over this crate

pub mod config;
pub mod domain_filter;
pub mod endpoint;
pub mod error;
pub mod plan;
pub mod registry;
pub mod traits;

// Re-export core types for convenience
pub use config::{DomainFilterConfig, ProviderConfig, ServerConfig, WebhookConfig};
pub use domain_filter::{DomainFilter, DomainMatcher};
pub use endpoint::{Endpoint, ProviderSpecificProperty, RecordType, Targets};
pub use error::{Error, Result};
pub use plan::{Changes, Plan};
pub use registry::ProviderRegistry;
pub use traits::{DnsProvider, DnsProviderFactory};
