use std::time::Duration;

use serde::{Deserialize, Deserializer, de};

use workforce_core::config::Config;

/// Directory configuration loaded from environment variables.
///
/// AWS credentials are not part of it; they come from the standard provider chain.
#[derive(Debug, Deserialize)]
pub struct DirectoryConfig {
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Bucket holding pictures and documents.
    pub s3_bucket: String,
    pub s3_region: String,
    /// Upper bound for each blob store call (default 10).
    #[serde(default = "default_blob_timeout_secs")]
    pub blob_timeout_secs: u64,
    /// Lifetime of presigned URLs (default 3600).
    #[serde(default = "default_presign_ttl_secs")]
    pub presign_ttl_secs: u64,
    /// Minimum age of an unreferenced blob before the sweep deletes it (default 86400).
    #[serde(
        default = "default_orphan_grace_secs",
        deserialize_with = "deserialize_orphan_grace_secs"
    )]
    pub orphan_grace_secs: u64,
}

fn default_blob_timeout_secs() -> u64 {
    10
}

fn default_presign_ttl_secs() -> u64 {
    3600
}

fn default_orphan_grace_secs() -> u64 {
    86_400
}

/// Roughly a century. Anything longer would not fit a `TimeDelta`.
const MAX_ORPHAN_GRACE_SECS: u64 = 100 * 365 * 86_400;

fn deserialize_orphan_grace_secs<'de, D: Deserializer<'de>>(d: D) -> Result<u64, D::Error> {
    let secs = u64::deserialize(d)?;
    if secs > MAX_ORPHAN_GRACE_SECS {
        return Err(de::Error::custom(format!(
            "orphan_grace_secs must be at most {MAX_ORPHAN_GRACE_SECS}, got {secs}"
        )));
    }
    Ok(secs)
}

impl Config for DirectoryConfig {}

impl DirectoryConfig {
    pub fn blob_timeout(&self) -> Duration {
        Duration::from_secs(self.blob_timeout_secs)
    }

    pub fn presign_ttl(&self) -> Duration {
        Duration::from_secs(self.presign_ttl_secs)
    }

    /// Saturates at `TimeDelta::MAX`, which makes the sweep keep everything.
    pub fn orphan_grace(&self) -> chrono::TimeDelta {
        i64::try_from(self.orphan_grace_secs)
            .ok()
            .and_then(chrono::TimeDelta::try_seconds)
            .unwrap_or(chrono::TimeDelta::MAX)
    }
}
