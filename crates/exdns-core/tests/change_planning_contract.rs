//! Contract Test: Change Planning
//!
//! Verifies how a change set from external-dns turns into record operations.
//!
//! Constraints verified:
//! - Plain deletes come before update deletes, plain creates before update creates
//! - An update pair issues work only when the endpoints really differ
//! - Target order never matters, TTL and type always do
//! - Unbalanced update pairs are rejected before any work is planned

use exdns_core::{Changes, Endpoint, Error, Plan, RecordType};

fn endpoint(name: &str, record_type: RecordType, ttl: u32, targets: &[&str]) -> Endpoint {
    Endpoint::with_ttl(name, record_type, ttl, targets.iter().copied())
}

#[test]
fn differing_update_pair_deletes_old_and_creates_new() {
    let old = endpoint("a.example", RecordType::A, 1000, &["1.1.1.1", "2.2.2.2"]);
    let new = endpoint("a.example", RecordType::A, 2000, &["3.3.3.3", "4.4.4.4"]);

    let plan = Plan::from_changes(&Changes {
        update_old: vec![old.clone()],
        update_new: vec![new.clone()],
        ..Default::default()
    })
    .expect("balanced change set");

    assert_eq!(plan.to_delete, vec![old]);
    assert_eq!(plan.to_create, vec![new]);

    // Two targets on each side: four record operations once expanded
    let operations: usize = plan
        .to_delete
        .iter()
        .chain(&plan.to_create)
        .map(|e| e.targets.len())
        .sum();
    assert_eq!(operations, 4);
}

#[test]
fn equal_update_pair_issues_nothing() {
    let old = endpoint("a.example", RecordType::A, 300, &["1.1.1.1", "2.2.2.2"]);
    let new = endpoint("a.example", RecordType::A, 300, &["2.2.2.2", "1.1.1.1"]);

    let plan = Plan::from_changes(&Changes {
        update_old: vec![old],
        update_new: vec![new],
        ..Default::default()
    })
    .expect("balanced change set");

    assert!(plan.is_empty(), "reordered targets must not be re-created");
}

#[test]
fn ordering_is_plain_operations_first() {
    let changes = Changes {
        create: vec![endpoint("new.example", RecordType::Cname, 0, &["a.example"])],
        delete: vec![endpoint("gone.example", RecordType::Txt, 0, &["bye"])],
        update_old: vec![
            endpoint("same.example", RecordType::A, 60, &["9.9.9.9"]),
            endpoint("moved.example", RecordType::A, 60, &["1.1.1.1"]),
        ],
        update_new: vec![
            endpoint("same.example", RecordType::A, 60, &["9.9.9.9"]),
            endpoint("moved.example", RecordType::A, 60, &["2.2.2.2"]),
        ],
    };

    let plan = Plan::from_changes(&changes).expect("balanced change set");

    let deleted: Vec<&str> = plan.to_delete.iter().map(|e| e.dns_name.as_str()).collect();
    let created: Vec<&str> = plan.to_create.iter().map(|e| e.dns_name.as_str()).collect();
    assert_eq!(deleted, vec!["gone.example", "moved.example"]);
    assert_eq!(created, vec!["new.example", "moved.example"]);
}

#[test]
fn type_change_is_not_equal() {
    let plan = Plan::from_changes(&Changes {
        update_old: vec![endpoint("a.example", RecordType::A, 60, &["1.1.1.1"])],
        update_new: vec![endpoint("a.example", RecordType::Aaaa, 60, &["1.1.1.1"])],
        ..Default::default()
    })
    .expect("balanced change set");

    assert_eq!(plan.to_delete.len(), 1);
    assert_eq!(plan.to_create.len(), 1);
}

#[test]
fn unbalanced_update_pairs_are_rejected() {
    let result = Plan::from_changes(&Changes {
        update_new: vec![endpoint("a.example", RecordType::A, 60, &["1.1.1.1"])],
        ..Default::default()
    });

    assert!(matches!(result, Err(Error::InvalidInput(_))));
}
