//! Run configuration: size limits, commit identity, push behaviour.
//!
//! Components never read globals; every threshold is carried in one of these
//! structs and passed in at construction.

use std::time::Duration;

use serde::{Deserialize, Serialize};

const MIB: u64 = 1024 * 1024;

/// Size thresholds driving classification, chunking and batching.
///
/// Defaults mirror the hosting limits gitvault works around: ~100 MiB per
/// tracked file (we stop at 90), ~2 GiB per push transaction (we batch at
/// 300 MiB to stay far under), and an absolute per-file cap of 360 MiB
/// beyond which a file is rejected instead of chunked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Limits {
    /// Largest file committed whole.
    pub max_file_bytes: u64,
    /// Largest file accepted at all; above this the file is invalid.
    pub max_total_bytes: u64,
    /// Byte budget for one add-batch (one commit).
    pub max_batch_bytes: u64,
    /// Size of each chunk part produced for oversized files.
    pub chunk_part_bytes: u64,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_file_bytes: 90 * MIB,
            max_total_bytes: 360 * MIB,
            max_batch_bytes: 300 * MIB,
            chunk_part_bytes: 90 * MIB,
        }
    }
}

/// Fixed author/committer identity for repeated, idempotent automation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            name: "Gitvault Bot".to_string(),
            email: "bot@gitvault.local".to_string(),
        }
    }
}

/// Push pipeline knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushOptions {
    /// Name of the long-lived (token-free) remote definition.
    pub remote_name: String,
    /// Cooldown slept between pushes — never after the last one.
    pub cooldown: Duration,
}

impl Default for PushOptions {
    fn default() -> Self {
        Self {
            remote_name: "origin".to_string(),
            cooldown: Duration::from_secs(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_limits_match_hosting_caps() {
        let limits = Limits::default();
        assert_eq!(limits.max_file_bytes, 90 * MIB);
        assert_eq!(limits.max_total_bytes, 360 * MIB);
        assert_eq!(limits.max_batch_bytes, 300 * MIB);
        assert_eq!(limits.chunk_part_bytes, 90 * MIB);
        assert!(limits.max_file_bytes <= limits.max_batch_bytes);
        assert!(limits.max_file_bytes <= limits.max_total_bytes);
    }

    #[test]
    fn limits_serde_roundtrip() {
        let limits = Limits::default();
        let json = serde_json::to_string(&limits).unwrap();
        let back: Limits = serde_json::from_str(&json).unwrap();
        assert_eq!(limits, back);
    }

    #[test]
    fn default_identity_is_the_bot() {
        let id = Identity::default();
        assert_eq!(id.name, "Gitvault Bot");
        assert_eq!(id.email, "bot@gitvault.local");
    }
}
