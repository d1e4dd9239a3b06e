// # ddns-core
//
// Core library for the Route 53 public IP updater.
//
// ## Architecture Overview
//
// This library provides the core functionality for dynamic DNS updates:
// - **IpResolver**: Trait for discovering the current public IP
// - **RecordUpdater**: Trait for upserting the A record via a provider API
// - **DdnsEngine**: Control loop that orchestrates wait → discover → update
// - **DdnsConfig**: Settings read once from the environment at startup
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Core logic is separate from implementations
// 2. **Fail Fast**: Configuration errors stop the process, nothing else does
// 3. **Library-First**: All core functionality can be used as a library
// 4. **Idempotency**: An unchanged IP never reaches the provider

pub mod traits;
pub mod engine;
pub mod config;
pub mod error;

// Re-export core types for convenience
pub use traits::{IpResolver, RecordUpdater, UpsertRequest};
pub use engine::{CycleOutcome, DdnsEngine, EngineEvent, wait_for_signal};
pub use config::{DdnsConfig, EngineConfig, IpSourceConfig, RecordConfig};
pub use error::{Error, Result};
