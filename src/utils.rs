//! Common utilities shared across modules.

use chrono::Utc;
use sha2::{Digest, Sha256};

/// Get current UTC timestamp in seconds since UNIX_EPOCH.
pub fn get_utc_timestamp() -> u64 {
    Utc::now().timestamp() as u64
}

/// Hex-encoded SHA-256 of `content`, used to detect regenerated indexes.
pub fn calculate_hash(content: &[u8]) -> String {
    format!("{:x}", Sha256::digest(content))
}

/// Render a unix timestamp as `YYYY-MM-DD HH:MM:SS UTC`.
pub fn format_timestamp(timestamp: u64) -> String {
    chrono::DateTime::from_timestamp(timestamp as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| timestamp.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_utc_timestamp() {
        let ts = get_utc_timestamp();
        // Should be a reasonable Unix timestamp (after 2020)
        assert!(ts > 1577836800, "Timestamp should be after 2020-01-01");
    }

    #[test]
    fn test_calculate_hash() {
        assert_eq!(
            calculate_hash(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_ne!(calculate_hash(b"abc"), calculate_hash(b"abd"));
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
    }
}
