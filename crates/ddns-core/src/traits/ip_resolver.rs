// # IP Resolver Trait
//
// Defines the interface for discovering the host's current public IP.
//
// ## Implementations
//
// - HTTP GET against a discovery URL: `ddns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use ddns_core::IpResolver;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let resolver = /* IpResolver implementation */;
//
//     let ip = resolver.fetch_public_ip().await?;
//     println!("Public IP: {}", ip);
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

/// Trait for public IP resolver implementations
///
/// A resolver performs exactly one lookup per call. It must not retry,
/// sleep or cache: the engine owns scheduling and decides what happens
/// after a failure.
///
/// The returned value is compared for equality only. It is not required to
/// be valid IP syntax, but a transport failure must surface as an error and
/// never as an empty string.
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Fetch the current public IP
    ///
    /// # Returns
    ///
    /// - `Ok(String)`: The trimmed IP value
    /// - `Err(Error::IpDiscovery)`: Network error, non-2xx status or unreadable body
    async fn fetch_public_ip(&self) -> Result<String, crate::Error>;

    /// Get the resolver name (for logging/debugging)
    fn source_name(&self) -> &'static str;
}
