//! Store Entry
//!
//! A value paired with its optional expiration deadline.

use std::time::{Duration, Instant};

/// Entry in the store with value and expiration
#[derive(Debug, Clone)]
pub(crate) struct Entry<V> {
    pub(crate) value: V,
    pub(crate) expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    /// Create an entry whose deadline is `ttl` from `now` (zero = never)
    pub(crate) fn new(value: V, ttl: Duration, now: Instant) -> Self {
        Self {
            value,
            expires_at: deadline(ttl, now),
        }
    }

    /// Create an entry that never expires
    pub(crate) fn permanent(value: V) -> Self {
        Self {
            value,
            expires_at: None,
        }
    }

    /// An entry is gone once `now` reaches its deadline
    #[inline]
    pub(crate) fn is_expired_at(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|t| now >= t)
    }

    /// Remaining lifetime, `None` for permanent entries
    pub(crate) fn remaining(&self, now: Instant) -> Option<Duration> {
        self.expires_at.map(|t| t.saturating_duration_since(now))
    }
}

/// Absolute deadline for a relative TTL.
///
/// A zero TTL and a deadline past what `Instant` can represent both mean
/// the entry never expires.
pub(crate) fn deadline(ttl: Duration, now: Instant) -> Option<Instant> {
    if ttl.is_zero() {
        return None;
    }
    now.checked_add(ttl)
}

/// Map a signed millisecond TTL onto a `Duration`; non-positive means no expiry.
pub fn ttl_from_millis(ms: i64) -> Duration {
    if ms <= 0 {
        Duration::ZERO
    } else {
        Duration::from_millis(ms as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_ttl_never_expires() {
        let now = Instant::now();
        let entry = Entry::new("v", Duration::ZERO, now);
        assert!(entry.expires_at.is_none());
        assert!(!entry.is_expired_at(now + Duration::from_secs(3600)));
        assert_eq!(entry.remaining(now), None);
    }

    #[test]
    fn test_expired_at_deadline() {
        let now = Instant::now();
        let entry = Entry::new("v", Duration::from_millis(10), now);

        assert!(!entry.is_expired_at(now));
        assert!(!entry.is_expired_at(now + Duration::from_millis(9)));
        // Exactly at the deadline counts as expired
        assert!(entry.is_expired_at(now + Duration::from_millis(10)));
        assert!(entry.is_expired_at(now + Duration::from_millis(11)));
    }

    #[test]
    fn test_remaining_saturates() {
        let now = Instant::now();
        let entry = Entry::new(1u8, Duration::from_millis(50), now);
        assert_eq!(entry.remaining(now), Some(Duration::from_millis(50)));
        assert_eq!(
            entry.remaining(now + Duration::from_secs(1)),
            Some(Duration::ZERO)
        );
    }

    #[test]
    fn test_overflowing_deadline_is_permanent() {
        let now = Instant::now();
        assert_eq!(deadline(Duration::MAX, now), None);
        assert!(Entry::permanent(()).expires_at.is_none());
    }

    #[test]
    fn test_ttl_from_millis() {
        assert_eq!(ttl_from_millis(-5), Duration::ZERO);
        assert_eq!(ttl_from_millis(0), Duration::ZERO);
        assert_eq!(ttl_from_millis(250), Duration::from_millis(250));
    }
}
