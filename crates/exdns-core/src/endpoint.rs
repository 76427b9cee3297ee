//! Provider-agnostic DNS endpoint model
//!
//! An [`Endpoint`] is the unit of desired and observed state exchanged with
//! external-dns. One endpoint of type A or AAAA with N targets stands for N
//! records on the backend that share name, type and TTL.
//!
//! The serde representation follows the external-dns webhook JSON shape.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

/// DNS record type of an endpoint
///
/// The four kinds the provider can translate are named variants; anything
/// else is preserved verbatim in [`RecordType::Other`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordType {
    /// IPv4 address record
    #[default]
    A,
    /// IPv6 address record
    Aaaa,
    /// Canonical name (alias) record
    Cname,
    /// Text record
    Txt,
    /// Any other record type, kept as sent
    Other(String),
}

impl RecordType {
    /// Wire name of the record type (e.g. "AAAA")
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::A => "A",
            RecordType::Aaaa => "AAAA",
            RecordType::Cname => "CNAME",
            RecordType::Txt => "TXT",
            RecordType::Other(name) => name,
        }
    }
}

impl From<&str> for RecordType {
    fn from(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "A" => RecordType::A,
            "AAAA" => RecordType::Aaaa,
            "CNAME" => RecordType::Cname,
            "TXT" => RecordType::Txt,
            _ => RecordType::Other(value.to_string()),
        }
    }
}

impl From<String> for RecordType {
    fn from(value: String) -> Self {
        RecordType::from(value.as_str())
    }
}

impl FromStr for RecordType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(RecordType::from(s))
    }
}

impl From<RecordType> for String {
    fn from(value: RecordType) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered target values of an endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Targets(pub Vec<String>);

impl Targets {
    /// Create a target list from anything yielding strings
    pub fn new<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(targets.into_iter().map(Into::into).collect())
    }

    /// Whether both lists hold the same set of values, ignoring order
    pub fn same(&self, other: &Targets) -> bool {
        let left: BTreeSet<&str> = self.0.iter().map(String::as_str).collect();
        let right: BTreeSet<&str> = other.0.iter().map(String::as_str).collect();
        left == right
    }

    /// Iterate over the target values
    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    /// Number of target values
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Targets {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Targets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(" "))
    }
}

/// Provider-specific key/value attached to an endpoint by external-dns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderSpecificProperty {
    pub name: String,
    pub value: String,
}

/// One DNS endpoint as exchanged with external-dns
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Fully-qualified domain name
    pub dns_name: String,

    /// Target values, interpreted according to `record_type`
    #[serde(default)]
    pub targets: Targets,

    /// Record type
    pub record_type: RecordType,

    /// Identifier distinguishing endpoints of a routing policy set
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub set_identifier: String,

    /// TTL in seconds, 0 means "use the server default"
    #[serde(default, rename = "recordTTL", skip_serializing_if = "is_zero")]
    pub record_ttl: u32,

    /// Labels maintained by external-dns (ownership, resource)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,

    /// Provider-specific properties
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub provider_specific: Vec<ProviderSpecificProperty>,
}

fn is_zero(ttl: &u32) -> bool {
    *ttl == 0
}

impl Endpoint {
    /// Create an endpoint without a TTL
    pub fn new<I, S>(dns_name: impl Into<String>, record_type: RecordType, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::with_ttl(dns_name, record_type, 0, targets)
    }

    /// Create an endpoint with the given TTL
    pub fn with_ttl<I, S>(
        dns_name: impl Into<String>,
        record_type: RecordType,
        record_ttl: u32,
        targets: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            dns_name: dns_name.into(),
            targets: Targets::new(targets),
            record_type,
            record_ttl,
            ..Default::default()
        }
    }

    /// Whether two endpoints describe the same records
    ///
    /// Name, type and TTL must match exactly; targets are compared as sets.
    /// Labels and provider-specific data do not take part.
    pub fn same(&self, other: &Endpoint) -> bool {
        self.dns_name == other.dns_name
            && self.record_type == other.record_type
            && self.record_ttl == other.record_ttl
            && self.targets.same(&other.targets)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {}",
            self.dns_name, self.record_ttl, self.record_type, self.targets
        )
    }
}
