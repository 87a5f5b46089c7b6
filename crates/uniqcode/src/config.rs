//! Service configuration.

use serde::{Deserialize, Serialize};

/// Identity allowed to issue and list batches unless configured otherwise.
pub const DEFAULT_ADMIN_IDENTITY: &str = "Admin@org1.chains.cloudchain.cn";

/// Private data collection holding batch secrets.
pub const DEFAULT_SECRET_COLLECTION: &str = "UNIQUE_CODE_SECRET";

/// Largest accepted distance between request and server time (~2.3 days).
pub const DEFAULT_MAX_CLOCK_SKEW_MS: u64 = 200_000_000;

/// Configuration for the code services.
///
/// Missing fields fall back to their defaults when loaded from JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChaincodeConfig {
    /// Logical user id of the administrator.
    pub admin_identity: String,
    /// Private collection name for batch secrets.
    pub secret_collection: String,
    /// Maximum `|server_now - request_timestamp|` in milliseconds.
    pub max_clock_skew_ms: u64,
}

impl ChaincodeConfig {
    /// Load a configuration from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Same configuration with a different administrator.
    pub fn with_admin(mut self, admin_identity: impl Into<String>) -> Self {
        self.admin_identity = admin_identity.into();
        self
    }
}

impl Default for ChaincodeConfig {
    fn default() -> Self {
        Self {
            admin_identity: DEFAULT_ADMIN_IDENTITY.to_string(),
            secret_collection: DEFAULT_SECRET_COLLECTION.to_string(),
            max_clock_skew_ms: DEFAULT_MAX_CLOCK_SKEW_MS,
        }
    }
}
