/// Classification for retry policy.
///
/// Used by [`with_retry`](crate::retry::with_retry) to decide whether a failed
/// attempt is worth repeating.
///
/// # Behavior Summary
///
/// | Class | Retry? | Typical cause |
/// |-------|--------|---------------|
/// | `Never` | No | bad symbol, HTTP 404, malformed request |
/// | `WithBackoff` | Yes, after an exponential delay | timeout, 5xx, 429, transport failure |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Never retry. The request is fundamentally invalid or the upstream
    /// state is permanent, so another attempt cannot succeed.
    Never,

    /// Retry after waiting `min(initial * factor^(n-1), max)`.
    WithBackoff,
}
