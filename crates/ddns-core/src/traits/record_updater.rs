// # Record Updater Trait
//
// Defines the interface for pushing the discovered IP into a DNS provider.
//
// ## Implementations
//
// - AWS Route 53: `ddns-provider-route53` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::{RecordConfig, RecordUpdater, UpsertRequest};
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let updater = /* RecordUpdater implementation */;
//     let record = RecordConfig::new("Z123", "home.example.com");
//
//     updater.upsert_a_record(&UpsertRequest::a_record(&record, "9.9.9.9")).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;
use std::fmt;

use crate::config::RecordConfig;

/// Time-to-live applied to every record this updater writes (in seconds)
pub const RECORD_TTL_SECS: u32 = 60;

/// Comment attached to every change batch
pub const CHANGE_COMMENT: &str = "Updating the A record via route53-public-ip-updater";

/// Change action for a DNS record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeAction {
    /// Create the record, or replace it if it already exists
    Upsert,
}

impl fmt::Display for ChangeAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeAction::Upsert => f.write_str("UPSERT"),
        }
    }
}

/// DNS record type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    /// A record (IPv4)
    A,
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordType::A => f.write_str("A"),
        }
    }
}

/// A single DNS change, independent of any provider's wire format
///
/// Built fresh each time an update is needed and discarded after the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertRequest {
    /// Hosted zone the record lives in
    pub zone_id: String,
    /// Free-form comment for the change batch
    pub comment: String,
    /// Change action
    pub action: ChangeAction,
    /// Fully-qualified record name
    pub record_name: String,
    /// Record type
    pub record_type: RecordType,
    /// Time-to-live (in seconds)
    pub ttl: u32,
    /// Resource values (exactly one for this updater)
    pub values: Vec<String>,
}

impl UpsertRequest {
    /// Build the UPSERT of one A record pointing at `ip`
    pub fn a_record(record: &RecordConfig, ip: impl Into<String>) -> Self {
        Self {
            zone_id: record.zone_id.clone(),
            comment: CHANGE_COMMENT.to_string(),
            action: ChangeAction::Upsert,
            record_name: record.name.clone(),
            record_type: RecordType::A,
            ttl: RECORD_TTL_SECS,
            values: vec![ip.into()],
        }
    }
}

/// Trait for DNS record updater implementations
///
/// An updater submits exactly one provider API call per invocation. It does
/// not retry, does not decide whether an update is needed and keeps no state
/// between calls. Credentials are resolved by the provider's own SDK.
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
#[async_trait]
pub trait RecordUpdater: Send + Sync {
    /// Submit the change described by `request`
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The provider accepted the change
    /// - `Err(Error::Update)`: Authorization failure, throttling, network
    ///   fault or provider-side validation error
    async fn upsert_a_record(&self, request: &UpsertRequest) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}
