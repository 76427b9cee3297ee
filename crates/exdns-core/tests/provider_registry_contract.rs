//! Contract Test: Provider Registry and Trait Defaults
//!
//! Verifies that providers are built through the registry from configuration
//! and that the trait's default behaviour holds for every provider.
//!
//! Constraints verified:
//! - The registry routes a config to the factory registered under its type
//! - The domain filter handed to the registry reaches the provider
//! - `adjust_endpoints` is the identity unless a provider overrides it
//! - A nil change set is an error

mod common;

use common::*;
use exdns_core::{DomainFilter, DomainMatcher, Endpoint, ProviderRegistry, RecordType};
use std::sync::{Arc, Mutex};

fn registry_with_mock(endpoints: Vec<Endpoint>) -> (ProviderRegistry, Arc<Mutex<Vec<exdns_core::Changes>>>) {
    let applied = Arc::new(Mutex::new(Vec::new()));
    let registry = ProviderRegistry::new();
    registry.register_provider(
        "technitium",
        Box::new(MockFactory {
            endpoints,
            applied: Arc::clone(&applied),
        }),
    );
    (registry, applied)
}

#[tokio::test]
async fn registry_builds_provider_with_domain_filter() {
    let (registry, _) = registry_with_mock(vec![]);

    let provider = registry
        .create_provider(&technitium_config(), DomainFilter::suffix(["example.com"], []))
        .expect("provider is registered");

    assert_eq!(provider.provider_name(), "mock");
    assert!(provider.domain_filter().matches("www.example.com"));
    assert!(!provider.domain_filter().matches("www.example.org"));
}

#[tokio::test]
async fn adjust_endpoints_defaults_to_identity() {
    let (registry, _) = registry_with_mock(vec![]);
    let provider = registry
        .create_provider(&technitium_config(), DomainFilter::any())
        .expect("provider is registered");

    let endpoints = vec![
        Endpoint::with_ttl("a.example", RecordType::A, 60, ["1.1.1.1"]),
        Endpoint::new("b.example", RecordType::Txt, ["hello world"]),
    ];

    let adjusted = provider.adjust_endpoints(endpoints.clone()).await.unwrap();
    assert_eq!(adjusted, endpoints);
}

#[tokio::test]
async fn nil_change_set_is_rejected() {
    let (registry, applied) = registry_with_mock(vec![]);
    let provider = registry
        .create_provider(&technitium_config(), DomainFilter::any())
        .expect("provider is registered");

    assert!(provider.apply_changes(None).await.is_err());
    assert!(applied.lock().unwrap().is_empty());

    provider
        .apply_changes(Some(exdns_core::Changes::default()))
        .await
        .unwrap();
    assert_eq!(applied.lock().unwrap().len(), 1);
}

#[test]
fn invalid_config_fails_creation() {
    let (registry, _) = registry_with_mock(vec![]);
    let result = registry.create_provider(&exdns_core::ProviderConfig::default(), DomainFilter::any());
    assert!(result.is_err());
}
