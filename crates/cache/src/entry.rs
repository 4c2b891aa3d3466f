use std::time::Duration;

use chrono::{DateTime, Utc};

/// A cached value stamped with its write time and lifetime.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: DateTime<Utc>,
    pub ttl: Duration,
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, timestamp: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            data,
            timestamp,
            ttl,
        }
    }

    /// Valid iff `now - timestamp < ttl`.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        is_fresh(self.timestamp, self.ttl, now)
    }
}

/// Expiry rule shared by both tiers.
///
/// A timestamp in the future (clock skew) counts as fresh.
pub(crate) fn is_fresh(timestamp: DateTime<Utc>, ttl: Duration, now: DateTime<Utc>) -> bool {
    let age = now.signed_duration_since(timestamp);
    match chrono::Duration::from_std(ttl) {
        Ok(ttl) => age < ttl,
        // A ttl too large for chrono never expires.
        Err(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_entry_valid_just_before_ttl() {
        let entry = CacheEntry::new(1, t0(), Duration::from_millis(1000));
        assert!(entry.is_valid_at(t0() + chrono::Duration::milliseconds(999)));
    }

    #[test]
    fn test_entry_expired_at_and_after_ttl() {
        let entry = CacheEntry::new(1, t0(), Duration::from_millis(1000));
        assert!(!entry.is_valid_at(t0() + chrono::Duration::milliseconds(1000)));
        assert!(!entry.is_valid_at(t0() + chrono::Duration::milliseconds(1001)));
    }

    #[test]
    fn test_zero_ttl_is_never_valid() {
        let entry = CacheEntry::new(1, t0(), Duration::ZERO);
        assert!(!entry.is_valid_at(t0()));
    }
}
