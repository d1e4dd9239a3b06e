//! Core traits for the DDNS updater
//!
//! The engine talks to the outside world only through these two seams.
//!
//! - [`IpResolver`]: Discover the current public IP
//! - [`RecordUpdater`]: Upsert the A record via a DNS provider API

pub mod ip_resolver;
pub mod record_updater;

pub use ip_resolver::IpResolver;
pub use record_updater::{
    CHANGE_COMMENT, ChangeAction, RECORD_TTL_SECS, RecordType, RecordUpdater, UpsertRequest,
};
