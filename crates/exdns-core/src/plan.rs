//! Change sets and change planning
//!
//! external-dns hands the provider a [`Changes`] value describing what it
//! wants created, deleted and updated. [`Plan::from_changes`] turns that into
//! the concrete lists of endpoints to delete and to create:
//!
//! ```text
//! to_delete = delete    ++ update_old[i]  where !update_old[i].same(update_new[i])
//! to_create = create    ++ update_new[i]  where !update_old[i].same(update_new[i])
//! ```
//!
//! Update pairs whose endpoints are equal (same name, type, TTL and target
//! set) produce no operation at all, so reordering targets never triggers a
//! delete/recreate cycle.

use crate::endpoint::Endpoint;
use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::{debug, warn};

/// Change set supplied by external-dns
///
/// `update_old[i]` and `update_new[i]` describe the same logical endpoint
/// before and after the update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Changes {
    /// Endpoints to create
    #[serde(default, alias = "create", deserialize_with = "null_as_empty")]
    pub create: Vec<Endpoint>,

    /// Endpoints as they are before an update
    #[serde(default, alias = "updateOld", deserialize_with = "null_as_empty")]
    pub update_old: Vec<Endpoint>,

    /// Endpoints as they should be after an update
    #[serde(default, alias = "updateNew", deserialize_with = "null_as_empty")]
    pub update_new: Vec<Endpoint>,

    /// Endpoints to delete
    #[serde(default, alias = "delete", deserialize_with = "null_as_empty")]
    pub delete: Vec<Endpoint>,
}

// external-dns encodes empty lists as `null`
fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<Vec<Endpoint>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Endpoint>>::deserialize(deserializer)?.unwrap_or_default())
}

impl Changes {
    /// Check the structural invariants of the change set
    pub fn validate(&self) -> Result<()> {
        if self.update_old.len() != self.update_new.len() {
            return Err(Error::invalid_input(format!(
                "update pairs are unbalanced: {} old vs {} new endpoints",
                self.update_old.len(),
                self.update_new.len()
            )));
        }
        Ok(())
    }

    /// Whether the change set asks for nothing
    pub fn is_empty(&self) -> bool {
        self.create.is_empty()
            && self.update_old.is_empty()
            && self.update_new.is_empty()
            && self.delete.is_empty()
    }
}

/// Concrete delete and create lists derived from a [`Changes`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Plan {
    /// Endpoints whose records must be deleted, in submission order
    pub to_delete: Vec<Endpoint>,

    /// Endpoints whose records must be created, in submission order
    pub to_create: Vec<Endpoint>,
}

impl Plan {
    /// Compute the plan for a change set
    ///
    /// # Returns
    ///
    /// - `Ok(Plan)`: deletes and creates to submit, deletes first
    /// - `Err(Error::InvalidInput)`: if the update pairs are unbalanced
    pub fn from_changes(changes: &Changes) -> Result<Self> {
        changes.validate()?;

        let mut to_delete = changes.delete.clone();
        let mut to_create = changes.create.clone();

        for (old, new) in changes.update_old.iter().zip(&changes.update_new) {
            if old.same(new) {
                debug!("Skipping unchanged update for {}", old.dns_name);
                continue;
            }

            warn!("Endpoints do not match: {} -> {}", old, new);
            to_delete.push(old.clone());
            to_create.push(new.clone());
        }

        Ok(Self {
            to_delete,
            to_create,
        })
    }

    /// Whether the plan issues no operation
    pub fn is_empty(&self) -> bool {
        self.to_delete.is_empty() && self.to_create.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoint::RecordType;

    fn a(name: &str, ttl: u32, targets: &[&str]) -> Endpoint {
        Endpoint::with_ttl(name, RecordType::A, ttl, targets.iter().copied())
    }

    #[test]
    fn test_changed_update_pair_becomes_delete_and_create() {
        let changes = Changes {
            create: vec![Endpoint::new("new.a.example", RecordType::Cname, ["a.example"])],
            delete: vec![a("b.example", 0, &["5.5.5.5"])],
            update_old: vec![a("a.example", 1000, &["1.1.1.1", "2.2.2.2"])],
            update_new: vec![a("a.example", 2000, &["3.3.3.3", "4.4.4.4"])],
        };

        let plan = Plan::from_changes(&changes).unwrap();

        assert_eq!(plan.to_delete.len(), 2);
        assert_eq!(plan.to_delete[0].dns_name, "b.example");
        assert_eq!(plan.to_delete[1].record_ttl, 1000);

        assert_eq!(plan.to_create.len(), 2);
        assert_eq!(plan.to_create[0].dns_name, "new.a.example");
        assert_eq!(plan.to_create[1].record_ttl, 2000);
    }

    /// Collects formatted log output
    #[derive(Clone, Default)]
    struct LogBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_unequal_update_pair_is_logged_as_warning() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();

        let changes = Changes {
            update_old: vec![a("a.example", 300, &["1.1.1.1"])],
            update_new: vec![a("a.example", 300, &["9.9.9.9"])],
            ..Default::default()
        };
        tracing::subscriber::with_default(subscriber, || {
            Plan::from_changes(&changes).unwrap();
        });

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"));
        assert!(output.contains("Endpoints do not match"));
    }

    #[test]
    fn test_reordered_targets_produce_no_operation() {
        let changes = Changes {
            update_old: vec![a("a.example", 300, &["1.1.1.1", "2.2.2.2"])],
            update_new: vec![a("a.example", 300, &["2.2.2.2", "1.1.1.1"])],
            ..Default::default()
        };

        let plan = Plan::from_changes(&changes).unwrap();
        assert!(plan.is_empty());
    }

    #[test]
    fn test_ttl_change_alone_is_an_update() {
        let changes = Changes {
            update_old: vec![a("a.example", 300, &["1.1.1.1"])],
            update_new: vec![a("a.example", 600, &["1.1.1.1"])],
            ..Default::default()
        };

        let plan = Plan::from_changes(&changes).unwrap();
        assert_eq!(plan.to_delete, vec![a("a.example", 300, &["1.1.1.1"])]);
        assert_eq!(plan.to_create, vec![a("a.example", 600, &["1.1.1.1"])]);
    }

    #[test]
    fn test_unbalanced_update_pairs_rejected() {
        let changes = Changes {
            update_old: vec![a("a.example", 300, &["1.1.1.1"])],
            ..Default::default()
        };

        let err = Plan::from_changes(&changes).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn test_changes_accept_webhook_field_names() {
        let json = serde_json::json!({
            "Create": [{ "dnsName": "a.example", "recordType": "A", "targets": ["1.1.1.1"] }],
            "UpdateOld": [],
            "UpdateNew": [],
        });
        let changes: Changes = serde_json::from_value(json).unwrap();
        assert_eq!(changes.create.len(), 1);
        assert!(changes.delete.is_empty());

        let camel = serde_json::json!({
            "delete": [{ "dnsName": "a.example", "recordType": "TXT", "targets": ["hello"] }]
        });
        let changes: Changes = serde_json::from_value(camel).unwrap();
        assert_eq!(changes.delete[0].record_type, RecordType::Txt);
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_null_lists_read_as_empty() {
        let json = serde_json::json!({
            "Create": null,
            "UpdateOld": null,
            "UpdateNew": null,
            "Delete": [{ "dnsName": "a.example", "recordType": "A", "targets": ["1.1.1.1"] }],
        });
        let changes: Changes = serde_json::from_value(json).unwrap();
        assert!(changes.create.is_empty());
        assert!(changes.update_old.is_empty());
        assert_eq!(changes.delete.len(), 1);
    }
}
