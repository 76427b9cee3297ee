//! Mapping between endpoints and Technitium records
//!
//! One endpoint with N targets corresponds to N records on the server. The
//! target value lives in the record-data field given by [`ValueField`].
//!
//! Listing is lenient: records the table does not cover produce no endpoint.
//! Mutation is strict: asking to delete or create such an endpoint is an
//! [`Error::UnsupportedRecordType`].

use crate::sdk::{RData, Record, RecordRequest, ValueField};
use exdns_core::{Endpoint, Error, RecordType, Result};

/// Endpoint for a server record, `None` if its type has no mapping or its
/// value field is missing
pub fn record_to_endpoint(record: &Record) -> Option<Endpoint> {
    let record_type = RecordType::from(record.record_type.as_str());
    let field = ValueField::for_type(&record_type)?;
    let value = field.get(&record.r_data)?;

    Some(Endpoint::with_ttl(
        record.name.as_str(),
        record_type,
        record.ttl,
        [value],
    ))
}

/// Server records an endpoint stands for, one per target
///
/// The endpoint's TTL is copied as is; these records identify what to delete.
pub fn endpoint_to_records(endpoint: &Endpoint) -> Result<Vec<Record>> {
    let field = value_field(endpoint)?;

    Ok(endpoint
        .targets
        .iter()
        .map(|target| {
            let mut r_data = RData::default();
            field.set(&mut r_data, target.as_str());
            Record {
                name: endpoint.dns_name.clone(),
                record_type: endpoint.record_type.as_str().to_string(),
                ttl: endpoint.record_ttl,
                r_data,
                ..Default::default()
            }
        })
        .collect())
}

/// Add-record requests for an endpoint, one per target
///
/// `ttl` is only sent when the endpoint carries one, leaving the server
/// default in place otherwise.
pub fn endpoint_to_requests(endpoint: &Endpoint) -> Result<Vec<RecordRequest>> {
    let field = value_field(endpoint)?;
    let ttl = (endpoint.record_ttl != 0).then_some(endpoint.record_ttl);

    Ok(endpoint
        .targets
        .iter()
        .map(|target| {
            let mut request =
                RecordRequest::new(endpoint.dns_name.as_str(), endpoint.record_type.as_str());
            request.ttl = ttl;
            field.set_request(&mut request, target.as_str());
            request
        })
        .collect())
}

fn value_field(endpoint: &Endpoint) -> Result<ValueField> {
    ValueField::for_type(&endpoint.record_type)
        .ok_or_else(|| Error::unsupported_record_type(endpoint.record_type.as_str()))
}
