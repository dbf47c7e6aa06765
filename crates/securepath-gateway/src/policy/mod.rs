//! Traffic policy: per-IP rate limiting and suspicious-request heuristics.
//!
//! Both run in the HTTP layer. The monitoring core only receives their
//! verdicts (a 429 status, a suspicious-request event).

pub mod classify;
pub mod rate_limit;

pub use classify::{classify, is_high_risk, RequestFlag};
pub use rate_limit::{RateLimitPolicy, RateLimiter};
