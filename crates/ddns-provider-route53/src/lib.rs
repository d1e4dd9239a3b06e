// # Route 53 Record Updater
//
// This crate submits the updater's single DNS change to AWS Route 53.
//
// ## Behavior
//
// - One `ChangeResourceRecordSets` call per invocation
// - The change batch holds exactly one UPSERT of the configured A record
// - Every SDK failure is returned as `Error::Update`; the engine decides
//   what happens next
// - No retry, backoff or caching here
//
// ## Credentials
//
// Credentials and region come from the AWS SDK default provider chain
// (environment, shared profile, container or instance metadata). Route 53
// is a global service, so a missing region falls back to `us-east-1`.
//
// ## API Reference
//
// - ChangeResourceRecordSets: POST `/2013-04-01/hostedzone/{Id}/rrset`

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_sdk_route53::error::{BuildError, DisplayErrorContext};
use aws_sdk_route53::types::{
    Change, ChangeAction as Route53Action, ChangeBatch, ResourceRecord, ResourceRecordSet, RrType,
};
use ddns_core::traits::{ChangeAction, RecordType, RecordUpdater, UpsertRequest};
use ddns_core::{Error, Result};

/// Region used when the provider chain has none
const FALLBACK_REGION: &str = "us-east-1";

/// Route 53 record updater
///
/// Holds nothing but the SDK client; the zone id and record come with each
/// request.
#[derive(Debug, Clone)]
pub struct Route53Updater {
    client: aws_sdk_route53::Client,
}

impl Route53Updater {
    /// Create an updater around an existing client
    pub fn new(client: aws_sdk_route53::Client) -> Self {
        Self { client }
    }

    /// Create an updater using the AWS default credential and region chains
    pub async fn from_env() -> Self {
        let region = RegionProviderChain::default_provider().or_else(FALLBACK_REGION);
        let shared_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(region)
            .load()
            .await;

        Self::new(aws_sdk_route53::Client::new(&shared_config))
    }
}

/// Translate a provider-agnostic request into a Route 53 change batch
///
/// The batch always carries exactly one change.
pub fn to_change_batch(request: &UpsertRequest) -> Result<ChangeBatch> {
    let action = match request.action {
        ChangeAction::Upsert => Route53Action::Upsert,
    };
    let record_type = match request.record_type {
        RecordType::A => RrType::A,
    };

    let records = request
        .values
        .iter()
        .map(|value| ResourceRecord::builder().value(value).build())
        .collect::<std::result::Result<Vec<_>, BuildError>>()
        .map_err(invalid_request)?;

    let record_set = ResourceRecordSet::builder()
        .name(&request.record_name)
        .r#type(record_type)
        .ttl(i64::from(request.ttl))
        .set_resource_records(Some(records))
        .build()
        .map_err(invalid_request)?;

    let change = Change::builder()
        .action(action)
        .resource_record_set(record_set)
        .build()
        .map_err(invalid_request)?;

    ChangeBatch::builder()
        .comment(&request.comment)
        .changes(change)
        .build()
        .map_err(invalid_request)
}

fn invalid_request(err: BuildError) -> Error {
    Error::update(format!("Invalid change request: {}", err))
}

#[async_trait]
impl RecordUpdater for Route53Updater {
    async fn upsert_a_record(&self, request: &UpsertRequest) -> Result<()> {
        let batch = to_change_batch(request)?;

        tracing::debug!(
            "Submitting {} {} {} -> {:?} to zone {}",
            request.action,
            request.record_type,
            request.record_name,
            request.values,
            request.zone_id
        );

        let output = self
            .client
            .change_resource_record_sets()
            .hosted_zone_id(&request.zone_id)
            .change_batch(batch)
            .send()
            .await
            .map_err(|e| Error::update(format!("{}", DisplayErrorContext(&e))))?;

        tracing::debug!("Route 53 accepted change: {:?}", output.change_info());
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "route53"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_route53::config::retry::RetryConfig;
    use aws_sdk_route53::config::{BehaviorVersion, Credentials, Region};
    use ddns_core::RecordConfig;

    fn request() -> UpsertRequest {
        UpsertRequest::a_record(&RecordConfig::new("Z123", "home.example.com"), "9.9.9.9")
    }

    #[test]
    fn change_batch_holds_single_upsert() {
        let batch = to_change_batch(&request()).unwrap();

        assert_eq!(batch.changes().len(), 1);
        assert_eq!(batch.changes()[0].action(), &Route53Action::Upsert);

        let rendered = format!("{:?}", batch);
        assert!(rendered.contains("name: \"home.example.com\""), "{}", rendered);
        assert!(rendered.contains("ttl: Some(60)"), "{}", rendered);
        assert!(rendered.contains("value: \"9.9.9.9\""), "{}", rendered);
        assert!(rendered.contains("route53-public-ip-updater"), "{}", rendered);
        assert_eq!(rendered.matches("value: ").count(), 1, "{}", rendered);
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_update_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = aws_sdk_route53::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(FALLBACK_REGION))
            .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
            .endpoint_url(format!("http://{}", addr))
            .retry_config(RetryConfig::disabled())
            .build();
        let updater = Route53Updater::new(aws_sdk_route53::Client::from_conf(config));

        let err = updater.upsert_a_record(&request()).await.unwrap_err();
        assert!(matches!(err, Error::Update(_)), "got {:?}", err);
        assert!(!err.is_fatal());
        assert_eq!(updater.provider_name(), "route53");
    }
}
