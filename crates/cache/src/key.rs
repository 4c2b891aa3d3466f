//! Cache key construction and per-class lifetimes.

/// Builds a namespaced, case-normalized cache key.
///
/// ```
/// use marketlens_cache::cache_key;
///
/// assert_eq!(cache_key("quote", &["AAPL"]), "quote_aapl");
/// assert_eq!(cache_key("test", &["param1", "param2"]), "test_param1_param2");
/// ```
pub fn cache_key(prefix: &str, parts: &[&str]) -> String {
    let mut key = String::with_capacity(prefix.len() + parts.iter().map(|p| p.len() + 1).sum::<usize>());
    key.push_str(prefix);
    for part in parts {
        key.push('_');
        key.push_str(part);
    }
    key.to_lowercase()
}

/// Time-to-live for each class of upstream data.
pub mod ttl {
    use std::time::Duration;

    pub const QUOTE: Duration = Duration::from_secs(60);
    /// Combined quote, profile, statistics and news snapshot.
    pub const STOCK: Duration = Duration::from_secs(5 * 60);
    pub const MARKET: Duration = Duration::from_secs(5 * 60);
    pub const NEWS: Duration = Duration::from_secs(60 * 60);
    pub const FUNDAMENTAL: Duration = Duration::from_secs(24 * 60 * 60);
}
