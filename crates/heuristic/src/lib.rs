//! Lightweight request-integrity heuristics.
//!
//! A case-insensitive substring scan of the User-Agent and Referer headers
//! against a fixed denylist. Purely advisory: it neither stores state nor
//! inspects bodies, and false positives are an accepted trade-off for
//! catching the noisiest scanner traffic cheaply.

/// Scanner and attack-tool User-Agent substrings.
const SCANNER_SIGNATURES: &[&str] = &[
    "sqlmap",
    "nikto",
    "nessus",
    "nmap",
    "masscan",
    "dirbuster",
    "wpscan",
    "acunetix",
];

/// Inline injection markers that have no business in a UA or Referer.
const INJECTION_MARKERS: &[&str] = &[
    "<script",
    "javascript:",
    "onerror=",
    "onload=",
    "../..",
];

/// Scan the User-Agent and Referer values for denylisted substrings.
///
/// `extra_patterns` come from configuration and are matched the same way as
/// the built-in set. Missing or empty headers match nothing.
pub fn looks_suspicious(
    user_agent: Option<&str>,
    referer: Option<&str>,
    extra_patterns: &[String],
) -> bool {
    matches_denylist(user_agent, extra_patterns) || matches_denylist(referer, extra_patterns)
}

fn matches_denylist(value: Option<&str>, extra_patterns: &[String]) -> bool {
    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ => return false,
    };

    let lower = value.to_lowercase();

    for pattern in SCANNER_SIGNATURES {
        if lower.contains(pattern) {
            return true;
        }
    }

    for pattern in INJECTION_MARKERS {
        if lower.contains(pattern) {
            return true;
        }
    }

    for pattern in extra_patterns {
        if !pattern.is_empty() && lower.contains(&pattern.to_lowercase()) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scanner_in_user_agent() {
        assert!(looks_suspicious(Some("Mozilla sqlmap/1.0"), None, &[]));
        assert!(looks_suspicious(Some("Nikto/2.5.0"), None, &[]));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(looks_suspicious(Some("SQLMap/1.7"), None, &[]));
        assert!(looks_suspicious(None, Some("JAVASCRIPT:alert(1)"), &[]));
    }

    #[test]
    fn test_clean_browser_passes() {
        assert!(!looks_suspicious(
            Some("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"),
            Some("https://example.com/dashboard"),
            &[],
        ));
        assert!(!looks_suspicious(Some("Mozilla/5.0"), None, &[]));
    }

    #[test]
    fn test_injection_marker_in_referer() {
        assert!(looks_suspicious(
            Some("Mozilla/5.0"),
            Some("http://evil.test/<script>alert(1)</script>"),
            &[],
        ));
    }

    #[test]
    fn test_path_traversal_marker() {
        assert!(looks_suspicious(
            None,
            Some("http://example.com/../../etc/passwd"),
            &[],
        ));
    }

    #[test]
    fn test_missing_headers_pass() {
        assert!(!looks_suspicious(None, None, &[]));
        assert!(!looks_suspicious(Some(""), Some(""), &[]));
    }

    #[test]
    fn test_extra_patterns() {
        let extra = vec!["badclient".to_string()];
        assert!(looks_suspicious(Some("BadClient/2.0"), None, &extra));
        assert!(!looks_suspicious(Some("GoodClient/2.0"), None, &extra));
    }
}
