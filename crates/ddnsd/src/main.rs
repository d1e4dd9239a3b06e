// # ddnsd - Route 53 public IP updater daemon
//
// The daemon is a thin integration layer. It is responsible for:
// 1. Loading `.env` and reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Wiring the HTTP IP resolver and the Route 53 updater into the engine
// 4. Running the engine until SIGINT/SIGTERM or a fatal error
//
// All check/update logic lives in ddns-core.
//
// ## Configuration
//
// - `PUBLIC_IP_GET_URL`: URL returning the public IP as a plain body
// - `ROUTE53_HOSTED_ZONE_ID`: Hosted zone that owns the record
// - `ROUTE53_DOMAIN_NAME`: Fully-qualified name of the A record
// - `REFRESH_RATE_MS`: Wait between checks, in milliseconds
// - `DDNS_LOG_LEVEL`: Optional, one of trace/debug/info/warn/error (default info)
//
// AWS credentials and region are resolved by the AWS SDK (`AWS_PROFILE`,
// `AWS_ACCESS_KEY_ID`, instance roles, ...).
//
// ## Example
//
// ```bash
// export PUBLIC_IP_GET_URL=https://checkip.amazonaws.com
// export ROUTE53_HOSTED_ZONE_ID=Z0123456789ABCDEFGHIJ
// export ROUTE53_DOMAIN_NAME=home.example.com
// export REFRESH_RATE_MS=60000
//
// ddnsd
// ```

use anyhow::Result;
use ddns_core::{DdnsConfig, DdnsEngine, IpResolver, RecordUpdater, wait_for_signal};
use ddns_ip_http::HttpIpResolver;
use ddns_provider_route53::Route53Updater;
use std::process::ExitCode;
use std::str::FromStr;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Optional log level setting
const DDNS_LOG_LEVEL: &str = "DDNS_LOG_LEVEL";

/// Exit codes for different termination scenarios
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DdnsExitCode {
    /// Clean shutdown (signal received)
    CleanShutdown = 0,
    /// Configuration error, startup failure or fatal runtime error
    Fatal = 1,
}

impl From<DdnsExitCode> for ExitCode {
    fn from(code: DdnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

fn main() -> ExitCode {
    // Variables already present in the environment take precedence
    if let Err(e) = dotenv::dotenv()
        && !e.not_found()
    {
        eprintln!("Failed to load .env file: {}", e);
        return DdnsExitCode::Fatal.into();
    }

    let log_level = match parse_log_level(std::env::var(DDNS_LOG_LEVEL).ok().as_deref()) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DdnsExitCode::Fatal.into();
        }
    };

    // Load and validate configuration before anything touches the network
    let config = match load_config(|name| std::env::var(name).ok()) {
        Ok(cfg) => cfg,
        Err(code) => return code.into(),
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DdnsExitCode::Fatal.into();
    }

    match serde_json::to_string(&config) {
        Ok(json) => debug!("Configuration loaded: {}", json),
        Err(e) => debug!("Configuration loaded (not printable: {})", e),
    }

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DdnsExitCode::Fatal.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_daemon(config).await {
            error!("Daemon error: {:#}", e);
            DdnsExitCode::Fatal
        } else {
            DdnsExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Wire the collaborators and run the engine
async fn run_daemon(config: DdnsConfig) -> Result<()> {
    let resolver = HttpIpResolver::from_config(&config.ip_source);
    info!("Discovering public IP via {}", resolver.url());

    let updater = Route53Updater::from_env().await;
    info!(
        "Maintaining A record {} in hosted zone {}",
        config.record.name, config.record.zone_id
    );

    let mut engine = build_engine(Box::new(resolver), Box::new(updater), config)?;

    engine.run_until(wait_for_shutdown()).await?;

    info!("Shutting down daemon");
    Ok(())
}

/// Read the configuration, reporting any error on stderr
///
/// Runs before logging is set up, so failures go straight to stderr.
fn load_config<F>(lookup: F) -> std::result::Result<DdnsConfig, DdnsExitCode>
where
    F: Fn(&str) -> Option<String>,
{
    DdnsConfig::from_lookup(lookup).map_err(|e| {
        eprintln!("Configuration error: {}", e);
        DdnsExitCode::Fatal
    })
}

/// Build the engine without an event consumer
///
/// Events are for embedders; the daemon relies on the engine's own logs.
/// The receiver is dropped so the channel is closed rather than left to
/// fill up.
fn build_engine(
    resolver: Box<dyn IpResolver>,
    updater: Box<dyn RecordUpdater>,
    config: DdnsConfig,
) -> ddns_core::Result<DdnsEngine> {
    let (engine, event_rx) = DdnsEngine::new(resolver, updater, config)?;
    drop(event_rx);
    Ok(engine)
}

/// Parse `DDNS_LOG_LEVEL`, defaulting to info when unset
fn parse_log_level(raw: Option<&str>) -> Result<Level> {
    match raw {
        None | Some("") => Ok(Level::INFO),
        Some(value) => Level::from_str(value).map_err(|_| {
            anyhow::anyhow!(
                "{} '{}' is not valid. Valid levels: trace, debug, info, warn, error",
                DDNS_LOG_LEVEL,
                value
            )
        }),
    }
}

/// Wait for shutdown signals (SIGTERM, SIGINT)
#[cfg(unix)]
async fn wait_for_shutdown() {
    let (mut sigterm, mut sigint) =
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(term), Ok(int)) => (term, int),
            (Err(e), _) | (_, Err(e)) => {
                error!("Failed to set up signal handlers: {}", e);
                wait_for_ctrl_c().await;
                return;
            }
        };

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    info!("Received {}", name);
}

/// Wait for shutdown signals (SIGINT only)
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
async fn wait_for_shutdown() {
    wait_for_ctrl_c().await;
}

/// Never returns if the handler cannot be installed
async fn wait_for_ctrl_c() {
    wait_for_signal(tokio::signal::ctrl_c()).await;
    info!("Received SIGINT");
}
