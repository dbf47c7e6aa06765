//! Security events reported by the HTTP layer.
//!
//! The aggregator does not decide what is suspicious; the caller classifies the
//! request and hands over one of these.

/// Hits from one IP at which an auto-block signal is raised.
pub const AUTO_BLOCK_THRESHOLD: u64 = 5;

/// Security event label with its details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecurityEvent {
    /// A login was attempted; `success` tells whether it went through.
    LoginAttempt { success: bool },
    /// A request matched a suspicious-pattern heuristic.
    SuspiciousRequest { ip: Option<String> },
}

impl SecurityEvent {
    pub fn kind(&self) -> SecurityEventKind {
        match self {
            SecurityEvent::LoginAttempt { .. } => SecurityEventKind::LoginAttempt,
            SecurityEvent::SuspiciousRequest { .. } => SecurityEventKind::SuspiciousRequest,
        }
    }
}

/// Event label without details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityEventKind {
    LoginAttempt,
    SuspiciousRequest,
}

impl SecurityEventKind {
    /// String representation used in structured log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            SecurityEventKind::LoginAttempt => "LOGIN_ATTEMPT",
            SecurityEventKind::SuspiciousRequest => "SUSPICIOUS_REQUEST",
        }
    }
}

/// Signal that an IP crossed [`AUTO_BLOCK_THRESHOLD`].
///
/// Log-only: there is no enforcement mechanism behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutoBlock {
    pub ip: String,
    pub hits: u64,
}
