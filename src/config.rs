use clap::Args;
use std::time::Duration;

/// Topic the order service publishes debit events to.
pub const DEBIT_TOPIC: &str = "transaction_created";
pub const CONSUMER_GROUP: &str = "wallet-service-group";

const DEFAULT_CATALOG_TIMEOUT: Duration = Duration::from_secs(5);
const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(10);

/// Runtime settings shared by the order side and the wallet side.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub topic: String,
    pub consumer_group: String,
    /// Upper bound for a single catalog lookup.
    pub catalog_timeout: Duration,
    /// Upper bound for publishing one debit event.
    pub publish_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            topic: DEBIT_TOPIC.to_string(),
            consumer_group: CONSUMER_GROUP.to_string(),
            catalog_timeout: DEFAULT_CATALOG_TIMEOUT,
            publish_timeout: DEFAULT_PUBLISH_TIMEOUT,
        }
    }
}

impl PipelineConfig {
    pub fn with_catalog_timeout(mut self, timeout: Duration) -> Self {
        self.catalog_timeout = timeout;
        self
    }

    pub fn with_publish_timeout(mut self, timeout: Duration) -> Self {
        self.publish_timeout = timeout;
        self
    }
}

/// Command-line and environment overrides for [`PipelineConfig`].
#[derive(Args, Debug, Clone)]
pub struct PipelineArgs {
    /// Topic carrying debit events
    #[arg(long, env = "BOOKPAY_TOPIC", default_value = DEBIT_TOPIC)]
    pub topic: String,

    /// Consumer group of the wallet worker
    #[arg(long, env = "BOOKPAY_CONSUMER_GROUP", default_value = CONSUMER_GROUP)]
    pub consumer_group: String,

    /// Catalog lookup timeout in milliseconds
    #[arg(long, default_value_t = 5_000)]
    pub catalog_timeout_ms: u64,

    /// Event publish timeout in milliseconds
    #[arg(long, default_value_t = 10_000)]
    pub publish_timeout_ms: u64,
}

impl From<&PipelineArgs> for PipelineConfig {
    fn from(args: &PipelineArgs) -> Self {
        Self {
            topic: args.topic.clone(),
            consumer_group: args.consumer_group.clone(),
            catalog_timeout: Duration::from_millis(args.catalog_timeout_ms),
            publish_timeout: Duration::from_millis(args.publish_timeout_ms),
        }
    }
}
