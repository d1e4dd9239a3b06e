//! Configuration types for the DDNS updater
//!
//! All settings come from a fixed set of environment variables. They are
//! read and validated once, at startup, into a [`DdnsConfig`] that is then
//! passed by value into the engine and its collaborators.

use serde::Serialize;
use std::time::Duration;

use crate::error::{Error, Result};

/// URL returning the caller's public IP as a plain response body
pub const PUBLIC_IP_GET_URL: &str = "PUBLIC_IP_GET_URL";

/// Route 53 hosted zone that owns the record
pub const ROUTE53_HOSTED_ZONE_ID: &str = "ROUTE53_HOSTED_ZONE_ID";

/// Fully-qualified name of the A record to maintain
pub const ROUTE53_DOMAIN_NAME: &str = "ROUTE53_DOMAIN_NAME";

/// Wait between check cycles, in milliseconds
pub const REFRESH_RATE_MS: &str = "REFRESH_RATE_MS";

/// Main DDNS configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DdnsConfig {
    /// Where the public IP is discovered
    pub ip_source: IpSourceConfig,

    /// The record kept in sync with the public IP
    pub record: RecordConfig,

    /// Wait between check cycles (in milliseconds)
    pub refresh_interval_ms: u64,

    /// Optional engine settings
    pub engine: EngineConfig,
}

impl DdnsConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary lookup function
    ///
    /// `from_env` is a thin wrapper over this; tests pass a map lookup
    /// instead of mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let refresh_interval_ms =
            parse_refresh_interval(&required_value(&lookup, REFRESH_RATE_MS)?)?;

        Ok(Self {
            ip_source: IpSourceConfig {
                url: required_value(&lookup, PUBLIC_IP_GET_URL)?,
            },
            record: RecordConfig {
                zone_id: required_value(&lookup, ROUTE53_HOSTED_ZONE_ID)?,
                name: required_value(&lookup, ROUTE53_DOMAIN_NAME)?,
            },
            refresh_interval_ms,
            engine: EngineConfig::default(),
        })
    }

    /// Wait between check cycles
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    /// Validate the configuration
    ///
    /// `from_lookup` already enforces these rules; this catches configs
    /// assembled in code.
    pub fn validate(&self) -> Result<()> {
        if self.ip_source.url.is_empty() {
            return Err(Error::missing_config(PUBLIC_IP_GET_URL));
        }
        if self.record.zone_id.is_empty() {
            return Err(Error::missing_config(ROUTE53_HOSTED_ZONE_ID));
        }
        if self.record.name.is_empty() {
            return Err(Error::missing_config(ROUTE53_DOMAIN_NAME));
        }
        self.engine.validate()
    }
}

/// Public IP discovery configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpSourceConfig {
    /// URL to fetch the IP from
    pub url: String,
}

/// DNS record configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordConfig {
    /// Hosted zone id (e.g., "Z0123456789ABC")
    pub zone_id: String,

    /// DNS record name (e.g., "home.example.com")
    pub name: String,
}

impl RecordConfig {
    /// Create a new record configuration
    pub fn new(zone_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            zone_id: zone_id.into(),
            name: name.into(),
        }
    }
}

/// Engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EngineConfig {
    /// Capacity of the monitoring event channel
    ///
    /// When full, new events are dropped with a warning log. A dropped
    /// receiver closes the channel and events are discarded silently.
    pub event_channel_capacity: usize,
}

impl EngineConfig {
    fn validate(&self) -> Result<()> {
        if self.event_channel_capacity == 0 {
            return Err(Error::invalid_config(
                "event_channel_capacity",
                "must be greater than zero",
            ));
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            event_channel_capacity: 100,
        }
    }
}

/// Read a setting that must be present and non-empty
pub fn required_value<F>(lookup: &F, name: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(Error::missing_config(name)),
    }
}

fn parse_refresh_interval(raw: &str) -> Result<u64> {
    let raw = raw.trim();

    if let Ok(value) = raw.parse::<u64>() {
        return Ok(value);
    }

    let reason = match raw.parse::<i128>() {
        Ok(value) if value < 0 => "should be a non-negative integer".to_string(),
        Ok(_) => "is out of range".to_string(),
        Err(e) => format!("should be a valid integer ({})", e),
    };
    Err(Error::invalid_config(REFRESH_RATE_MS, reason))
}
