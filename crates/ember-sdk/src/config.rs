use serde::{Deserialize, Serialize};

use ember_types::EpochCount;

use crate::retry::RetryPolicy;

/// Deployment configuration for an Ember client.
///
/// The endpoint fields parameterize network-backed boundary implementations;
/// the in-memory backends ignore them. Defaults point at the public testnet,
/// with the package and registry ids left for the deployment to fill in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Ledger full-node RPC endpoint.
    pub rpc_url: String,
    /// Storage network write-path endpoint.
    pub publisher_url: String,
    /// Storage network read-path endpoint.
    pub aggregator_url: String,
    /// Ledger package exposing the publish/upvote entry points.
    pub package_id: String,
    /// Requested retention for new posts, clamped to the network maximum at
    /// registration time.
    pub default_epochs: EpochCount,
    /// Upper bound on concurrent content fetches during feed hydration.
    pub hydration_concurrency: usize,
    /// Backoff schedule for retryable storage calls.
    pub retry: RetryPolicy,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://fullnode.testnet.sui.io:443".into(),
            publisher_url: "https://publisher.walrus-testnet.walrus.space".into(),
            aggregator_url: "https://aggregator.walrus-testnet.walrus.space".into(),
            package_id: String::new(),
            default_epochs: EpochCount::new(53),
            hydration_concurrency: 8,
            retry: RetryPolicy::default(),
        }
    }
}
