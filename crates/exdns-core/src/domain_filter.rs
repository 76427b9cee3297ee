//! Domain predicates
//!
//! The provider only manages names for which a [`DomainMatcher`] answers
//! `true`. [`DomainFilter`] is the configurable implementation: either a list
//! of domain suffixes (with exclusions) or a pair of regular expressions.
//! Closures of type `Fn(&str) -> bool` are matchers as well, which keeps
//! tests free of filter configuration.

use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;

/// Decides whether a DNS name is in scope
pub trait DomainMatcher: Send + Sync {
    /// Whether `name` is managed by this provider instance
    fn matches(&self, name: &str) -> bool;
}

impl<F> DomainMatcher for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn matches(&self, name: &str) -> bool {
        self(name)
    }
}

/// Configurable domain filter
#[derive(Debug, Clone)]
pub enum DomainFilter {
    /// Suffix lists
    Suffix {
        /// Domains to include; empty means every domain
        include: Vec<String>,
        /// Domains to exclude, applied after `include`
        exclude: Vec<String>,
    },

    /// Regular expressions, matched against the normalized name
    Regex {
        /// Names must match this expression
        include: Regex,
        /// Names must not match this expression
        exclude: Option<Regex>,
    },
}

impl DomainFilter {
    /// A filter that matches every name
    pub fn any() -> Self {
        Self::suffix(Vec::<String>::new(), Vec::<String>::new())
    }

    /// Build a suffix filter; entries are trimmed, lower-cased and stripped of
    /// a trailing dot, empty entries are dropped
    pub fn suffix<I, E, S>(include: I, exclude: E) -> Self
    where
        I: IntoIterator<Item = S>,
        E: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::Suffix {
            include: prepare_filters(include),
            exclude: prepare_filters(exclude),
        }
    }

    /// Build a regex filter from an include and an optional exclude pattern
    ///
    /// An empty exclude pattern is treated as no exclusion.
    pub fn regex(include: &str, exclude: Option<&str>) -> Result<Self, regex::Error> {
        let include = Regex::new(include)?;
        let exclude = match exclude.filter(|pattern| !pattern.is_empty()) {
            Some(pattern) => Some(Regex::new(pattern)?),
            None => None,
        };
        Ok(Self::Regex { include, exclude })
    }
}

impl Default for DomainFilter {
    fn default() -> Self {
        Self::any()
    }
}

impl DomainMatcher for DomainFilter {
    fn matches(&self, name: &str) -> bool {
        let name = normalize_domain(name);
        match self {
            DomainFilter::Suffix { include, exclude } => {
                match_suffixes(include, &name, true) && !match_suffixes(exclude, &name, false)
            }
            DomainFilter::Regex { include, exclude } => {
                include.is_match(&name) && !exclude.as_ref().is_some_and(|re| re.is_match(&name))
            }
        }
    }
}

impl fmt::Display for DomainFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DomainFilter::Suffix { include, exclude } => {
                if include.is_empty() && exclude.is_empty() {
                    return f.write_str("no kind of domain filters");
                }
                let mut parts = Vec::new();
                if !include.is_empty() {
                    parts.push(format!("domain filter: '{}'", include.join(",")));
                }
                if !exclude.is_empty() {
                    parts.push(format!("exclude domain filter: '{}'", exclude.join(",")));
                }
                f.write_str(&parts.join(", "))
            }
            DomainFilter::Regex { include, exclude } => {
                write!(f, "regexp domain filter: '{}'", include.as_str())?;
                if let Some(exclude) = exclude {
                    write!(f, ", with exclusion: '{}'", exclude.as_str())?;
                }
                Ok(())
            }
        }
    }
}

/// Wire shape of the filter in the webhook negotiation response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NegotiationBody<'a> {
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    include: &'a [String],
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    exclude: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    regex_include: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    regex_exclude: Option<&'a str>,
}

impl Serialize for DomainFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let body = match self {
            DomainFilter::Suffix { include, exclude } => NegotiationBody {
                include,
                exclude,
                regex_include: None,
                regex_exclude: None,
            },
            DomainFilter::Regex { include, exclude } => NegotiationBody {
                include: &[],
                exclude: &[],
                regex_include: Some(include.as_str()),
                regex_exclude: exclude.as_ref().map(Regex::as_str),
            },
        };
        body.serialize(serializer)
    }
}

fn normalize_domain(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}

fn prepare_filters<I, S>(filters: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    filters
        .into_iter()
        .map(|filter| normalize_domain(filter.as_ref()))
        .filter(|filter| !filter.is_empty())
        .collect()
}

/// `example.com` matches itself and every subdomain, `.example.com` only
/// subdomains. An empty filter list yields `empty_value`.
fn match_suffixes(filters: &[String], name: &str, empty_value: bool) -> bool {
    if filters.is_empty() {
        return empty_value;
    }

    filters.iter().any(|filter| {
        if filter.starts_with('.') {
            name.ends_with(filter.as_str())
        } else {
            name == filter || name.ends_with(&format!(".{filter}"))
        }
    })
}
