//! Core DDNS engine
//!
//! The DdnsEngine is the control loop of the updater. It is responsible for:
//! - Waiting a fixed interval between checks
//! - Discovering the public IP via IpResolver
//! - Skipping the update when the IP matches the last applied one
//! - Upserting the A record via RecordUpdater when it does not
//!
//! ## Architecture
//!
//! ```text
//!              ┌──────────────┐
//!   tick ─────▶│ DdnsEngine   │─────▶ EngineEvent (notify)
//!              └──────────────┘
//!                 │        │
//!                 ▼        ▼
//!       ┌────────────┐  ┌───────────────┐
//!       │ IpResolver │  │ RecordUpdater │
//!       │ (discover) │  │ (upsert)      │
//!       └────────────┘  └───────────────┘
//! ```
//!
//! ## Cycle Flow
//!
//! 1. Sleep for the refresh interval (shutdown is observed only here)
//! 2. Fetch the public IP
//! 3. If equal to the last applied IP, skip
//! 4. Otherwise upsert the record and remember the IP on success
//!
//! Failures in steps 2-4 abort the cycle and leave the last applied IP
//! untouched, so the next cycle retries the same target. Fatal errors end
//! the loop.

use crate::config::{DdnsConfig, RecordConfig};
use crate::error::{Error, Result};
use crate::traits::{IpResolver, RecordUpdater, UpsertRequest};
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, trace, warn};

/// Events emitted by the DdnsEngine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Engine started
    Started {
        record_name: String,
    },

    /// DNS update skipped (IP unchanged)
    UpdateSkipped {
        record_name: String,
        current_ip: String,
    },

    /// DNS update succeeded
    UpdateSucceeded {
        record_name: String,
        new_ip: String,
        previous_ip: Option<String>,
    },

    /// Check cycle failed, will retry on the next tick
    UpdateFailed {
        record_name: String,
        error: String,
    },

    /// Engine stopped
    Stopped {
        reason: String,
    },
}

/// Result of a single check cycle
#[derive(Debug)]
pub enum CycleOutcome {
    /// Discovered IP matched the last applied IP; nothing was sent
    Unchanged { ip: String },

    /// The record now points at `ip`
    Updated { ip: String },

    /// The cycle failed; the loop keeps running
    Recoverable(Error),

    /// The cycle hit an error that must terminate the process
    Fatal(Error),
}

impl CycleOutcome {
    /// Whether this outcome must stop the loop
    pub fn is_fatal(&self) -> bool {
        matches!(self, CycleOutcome::Fatal(_))
    }
}

/// Wait until `signal` fires
///
/// A signal that cannot be listened for never resolves: the engine keeps
/// running and the process keeps the platform's default signal handling.
pub async fn wait_for_signal<F, E>(signal: F)
where
    F: Future<Output = std::result::Result<(), E>>,
    E: Display,
{
    if let Err(e) = signal.await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

/// Core DDNS engine
///
/// ## Lifecycle
///
/// 1. Create with [`DdnsEngine::new()`]
/// 2. Start with [`DdnsEngine::run()`] or [`DdnsEngine::run_until()`]
/// 3. Engine runs until a shutdown signal or a fatal error
///
/// ## Threading
///
/// Everything runs on the caller's task. The last applied IP is owned by
/// the engine and only touched through `&mut self`.
pub struct DdnsEngine {
    /// Public IP discovery
    resolver: Box<dyn IpResolver>,

    /// DNS record updates
    updater: Box<dyn RecordUpdater>,

    /// The record being maintained
    record: RecordConfig,

    /// Wait between check cycles
    refresh_interval: Duration,

    /// IP most recently written to the record; empty means unknown
    last_applied_ip: String,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<EngineEvent>,
}

impl DdnsEngine {
    /// Create a new DDNS engine
    ///
    /// # Parameters
    ///
    /// - `resolver`: IP resolver implementation
    /// - `updater`: Record updater implementation
    /// - `config`: DDNS configuration, validated here
    ///
    /// # Returns
    ///
    /// A tuple of (engine, event_receiver) where event_receiver yields engine events
    pub fn new(
        resolver: Box<dyn IpResolver>,
        updater: Box<dyn RecordUpdater>,
        config: DdnsConfig,
    ) -> Result<(Self, mpsc::Receiver<EngineEvent>)> {
        config.validate()?;

        let (tx, rx) = mpsc::channel(config.engine.event_channel_capacity);
        let refresh_interval = config.refresh_interval();

        let engine = Self {
            resolver,
            updater,
            record: config.record,
            refresh_interval,
            last_applied_ip: String::new(),
            event_tx: tx,
        };

        Ok((engine, rx))
    }

    /// IP most recently applied to the record (empty until the first update)
    pub fn last_applied_ip(&self) -> &str {
        &self.last_applied_ip
    }

    /// Run the engine until Ctrl-C
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Clean shutdown
    /// - `Err(Error)`: Fatal error
    pub async fn run(&mut self) -> Result<()> {
        self.run_until(wait_for_signal(tokio::signal::ctrl_c())).await
    }

    /// Run the engine with a controlled shutdown signal
    ///
    /// `None` falls back to [`DdnsEngine::run()`]. A dropped sender counts
    /// as a shutdown request.
    pub async fn run_with_shutdown(
        &mut self,
        shutdown_rx: Option<tokio::sync::oneshot::Receiver<()>>,
    ) -> Result<()> {
        match shutdown_rx {
            Some(rx) => {
                self.run_until(async {
                    let _ = rx.await;
                })
                .await
            }
            None => self.run().await,
        }
    }

    /// Run the wait/check loop until `shutdown` completes
    ///
    /// Shutdown is only observed while waiting between cycles. A cycle in
    /// progress always runs to completion first.
    pub async fn run_until<F>(&mut self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        info!(
            "Started route53 public ip updater (record={}, interval={:?})",
            self.record.name, self.refresh_interval
        );
        self.emit_event(EngineEvent::Started {
            record_name: self.record.name.clone(),
        });

        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    info!("Shutdown signal received");
                    self.emit_event(EngineEvent::Stopped {
                        reason: "Shutdown signal".to_string(),
                    });
                    break;
                }

                _ = tokio::time::sleep(self.refresh_interval) => {}
            }

            if let CycleOutcome::Fatal(e) = self.run_cycle().await {
                error!("Fatal error, stopping: {}", e);
                self.emit_event(EngineEvent::Stopped {
                    reason: e.to_string(),
                });
                return Err(e);
            }
        }

        Ok(())
    }

    /// Perform one check cycle
    ///
    /// This is the loop's only error boundary: recoverable errors are logged
    /// and reported as [`CycleOutcome::Recoverable`], fatal ones are handed
    /// back untouched.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        match self.check_and_update().await {
            Ok(outcome) => outcome,
            Err(e) if e.is_fatal() => CycleOutcome::Fatal(e),
            Err(e) => {
                warn!("Could not update record this time: {}", e);
                self.emit_event(EngineEvent::UpdateFailed {
                    record_name: self.record.name.clone(),
                    error: e.to_string(),
                });
                CycleOutcome::Recoverable(e)
            }
        }
    }

    async fn check_and_update(&mut self) -> Result<CycleOutcome> {
        let ip = self.resolver.fetch_public_ip().await?;
        debug!("{} reported public IP {}", self.resolver.source_name(), ip);

        if ip == self.last_applied_ip {
            info!("Same ip as before, record update skipped");
            self.emit_event(EngineEvent::UpdateSkipped {
                record_name: self.record.name.clone(),
                current_ip: ip.clone(),
            });
            return Ok(CycleOutcome::Unchanged { ip });
        }

        let request = UpsertRequest::a_record(&self.record, ip.clone());
        self.updater.upsert_a_record(&request).await?;

        let previous = std::mem::replace(&mut self.last_applied_ip, ip.clone());
        info!(
            "Successfully updated record with new ip ({} -> {} via {})",
            self.record.name,
            ip,
            self.updater.provider_name()
        );
        self.emit_event(EngineEvent::UpdateSucceeded {
            record_name: self.record.name.clone(),
            new_ip: ip.clone(),
            previous_ip: (!previous.is_empty()).then_some(previous),
        });

        Ok(CycleOutcome::Updated { ip })
    }

    /// Emit an engine event
    ///
    /// Never blocks: a full channel drops the event with a warning and a
    /// closed one is ignored.
    fn emit_event(&self, event: EngineEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!("Event channel full, dropping event. Consider increasing event_channel_capacity.");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                trace!("No event receiver, dropping event");
            }
        }
    }
}
