//! Core traits for the webhook
//!
//! This module defines the abstract interfaces that provider implementations
//! must follow.
//!
//! - [`DnsProvider`]: Read and mutate DNS records on a backend
//! - [`DnsProviderFactory`]: Build a provider from configuration

pub mod dns_provider;

pub use dns_provider::{DnsProvider, DnsProviderFactory};
