//! Request-target heuristics for suspicious traffic.
//!
//! Cheap substring checks on the path and query, evaluated in order; the first
//! match wins. They flag probes, not attacks: `/api/admin` trips `Scan` too.

/// Why a request was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestFlag {
    /// Path traversal or doubled slashes.
    Suspicious,
    /// Asking for server-side script extensions this service never serves.
    Probe,
    /// Admin or WordPress scanner paths.
    Scan,
}

impl RequestFlag {
    pub fn as_str(self) -> &'static str {
        match self {
            RequestFlag::Suspicious => "SUSPICIOUS",
            RequestFlag::Probe => "PROBE",
            RequestFlag::Scan => "SCAN",
        }
    }
}

pub fn classify(target: &str) -> Option<RequestFlag> {
    if target.contains("..") || target.contains("//") {
        return Some(RequestFlag::Suspicious);
    }
    if target.contains(".php") || target.contains(".asp") {
        return Some(RequestFlag::Probe);
    }
    if target.contains("admin") || target.contains("wp-") {
        return Some(RequestFlag::Scan);
    }
    None
}

/// Prefixes whose access is logged as a data-access security event.
const HIGH_RISK_PREFIXES: [&str; 3] = ["/api/auth", "/api/admin", "/api/config"];

pub fn is_high_risk(path: &str) -> bool {
    HIGH_RISK_PREFIXES.iter().any(|p| path.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_each_heuristic() {
        assert_eq!(classify("/static/../../etc/passwd"), Some(RequestFlag::Suspicious));
        assert_eq!(classify("/files//secret"), Some(RequestFlag::Suspicious));
        assert_eq!(classify("/index.php?x=1"), Some(RequestFlag::Probe));
        assert_eq!(classify("/default.aspx"), Some(RequestFlag::Probe));
        assert_eq!(classify("/wp-login"), Some(RequestFlag::Scan));
        assert_eq!(classify("/admin/panel"), Some(RequestFlag::Scan));
    }

    #[test]
    fn first_match_wins() {
        assert_eq!(classify("/admin/../x.php"), Some(RequestFlag::Suspicious));
        assert_eq!(classify("/wp-admin/setup.php"), Some(RequestFlag::Probe));
    }

    #[test]
    fn clean_targets_pass() {
        assert_eq!(classify("/"), None);
        assert_eq!(classify("/health"), None);
        assert_eq!(classify("/api/security-report?format=json"), None);
    }

    #[test]
    fn high_risk_prefixes() {
        assert!(is_high_risk("/api/auth/login"));
        assert!(is_high_risk("/api/config"));
        assert!(!is_high_risk("/api/security-report"));
    }
}
