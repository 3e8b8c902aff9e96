use std::time::Duration;

use clap::Parser;

/// Runtime configuration for a ledger node.
///
/// Every flag can also be set through the environment (or a `.env` file).
#[derive(Debug, Clone, Parser)]
#[command(name = "pow_ledger", about = "Proof-of-work ledger node")]
pub struct Config {
    /// Interface to bind the HTTP API to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Seconds to wait for a peer's chain during conflict resolution
    #[arg(long, env = "PEER_TIMEOUT_SECS", default_value_t = 5)]
    pub peer_timeout_secs: u64,
}

impl Config {
    pub fn peer_timeout(&self) -> Duration {
        Duration::from_secs(self.peer_timeout_secs)
    }
}
