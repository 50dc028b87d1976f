//! # Report Model — Structured results from the MCP scanner service
//!
//! Plain data deserialized from the service's JSON responses. ScanView never
//! mutates or persists a report; each successful request replaces the previous
//! report of the same kind wholesale.

use serde::{Deserialize, Serialize};

// ── Risk levels ──────────────────────────────────────────────────────────────

/// Severity label used for summary counts, badges, and color coding.
///
/// The service sends upper-case labels. Anything outside the five known
/// values lands on `Unknown` instead of failing the whole report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Critical,
    High,
    Medium,
    Low,
    Safe,
    #[serde(other)]
    Unknown,
}

impl Default for RiskLevel {
    fn default() -> Self {
        RiskLevel::Unknown
    }
}

impl RiskLevel {
    /// Fixed display color per level; `Unknown` gets one neutral fallback.
    /// Total over the enumeration — never panics, never returns an empty value.
    pub fn color(self) -> &'static str {
        match self {
            RiskLevel::Critical => "#ef4444",
            RiskLevel::High => "#f59e0b",
            RiskLevel::Medium => "#3b82f6",
            RiskLevel::Low => "#64748b",
            RiskLevel::Safe => "#10b981",
            RiskLevel::Unknown => "#94a3b8",
        }
    }

    /// Upper-case label as shown on badges.
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::Critical => "CRITICAL",
            RiskLevel::High => "HIGH",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::Low => "LOW",
            RiskLevel::Safe => "SAFE",
            RiskLevel::Unknown => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ── Scan report ──────────────────────────────────────────────────────────────

/// Aggregate counters reported by the service. ScanView trusts these values
/// and does not re-bucket `results` to verify them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeverityCounts {
    #[serde(default)]
    pub total_servers: u64,
    #[serde(default)]
    pub total_tools: u64,
    #[serde(default)]
    pub critical: u64,
    #[serde(default)]
    pub high: u64,
    #[serde(default)]
    pub medium: u64,
    #[serde(default)]
    pub low: u64,
    #[serde(default)]
    pub safe: u64,
}

/// One detected issue on a tool.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Vulnerability {
    /// Detection rule name; arrives on the wire as `"type"`.
    #[serde(rename = "type", default)]
    pub rule: String,
    #[serde(default)]
    pub severity: RiskLevel,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub recommendation: String,
}

/// One reported finding: a server/tool pair with its risk level and zero or
/// more vulnerabilities.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanFinding {
    #[serde(default)]
    pub server: String,
    #[serde(default)]
    pub tool: String,
    #[serde(default)]
    pub risk_level: RiskLevel,
    #[serde(default)]
    pub risk_score: f64,
    #[serde(default)]
    pub vulnerabilities: Vec<Vulnerability>,
}

/// Full response of `POST /api/scan`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScanReport {
    #[serde(default)]
    pub status: String,
    /// Config identifier the scan ran against, echoed back by the service.
    #[serde(default)]
    pub config: String,
    #[serde(default)]
    pub summary: SeverityCounts,
    #[serde(default)]
    pub results: Vec<ScanFinding>,
    /// Error detail when `status` is not `"success"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// ── Attack demo report ───────────────────────────────────────────────────────

/// One entry of the attack timeline. The sequence is causal: steps are
/// rendered in the exact order received, never re-sorted by `step`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttackStep {
    #[serde(default)]
    pub step: u32,
    #[serde(default)]
    pub event: String,
    #[serde(default)]
    pub description: String,
}

/// Full response of `POST /api/demo/attack`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttackReport {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub attack_type: String,
    #[serde(default)]
    pub timeline: Vec<AttackStep>,
    /// What the victim perceives happened.
    #[serde(default)]
    pub victim_sees: String,
    /// Ground truth of what actually happened.
    #[serde(default)]
    pub reality: String,
    #[serde(default)]
    pub attacker_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn risk_colors_are_distinct_and_stable() {
        let named = [
            RiskLevel::Critical,
            RiskLevel::High,
            RiskLevel::Medium,
            RiskLevel::Low,
            RiskLevel::Safe,
        ];
        let colors: HashSet<&str> = named.iter().map(|l| l.color()).collect();
        assert_eq!(colors.len(), named.len(), "each named level has its own color");
        assert!(!colors.contains(RiskLevel::Unknown.color()), "fallback color is reserved for unknowns");
        // Stable across calls.
        assert_eq!(RiskLevel::Critical.color(), RiskLevel::Critical.color());
    }

    #[test]
    fn unknown_labels_fall_back() {
        let level: RiskLevel = serde_json::from_str("\"EXTREME\"").unwrap();
        assert_eq!(level, RiskLevel::Unknown);
        assert_eq!(level.color(), "#94a3b8");

        // Case matters: labels are matched by value as received.
        let lower: RiskLevel = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(lower, RiskLevel::Unknown);
    }

    #[test]
    fn parses_scan_response_wire_shape() {
        let body = serde_json::json!({
            "status": "success",
            "config": "configs/poisoned_config.json",
            "summary": {
                "total_servers": 1, "total_tools": 2,
                "critical": 2, "high": 1, "medium": 0, "low": 0, "safe": 0
            },
            "results": [
                {
                    "server": "gmail-helper",
                    "tool": "send_email",
                    "risk_level": "CRITICAL",
                    "risk_score": 9.5,
                    "vulnerabilities": [
                        {
                            "type": "hidden_instructions",
                            "severity": "CRITICAL",
                            "description": "Tool description contains hidden system instructions",
                            "recommendation": "Remove this server immediately"
                        }
                    ]
                },
                {
                    "server": "gmail-helper",
                    "tool": "read_email",
                    "risk_level": "SAFE",
                    "risk_score": 0.0,
                    "vulnerabilities": []
                }
            ]
        });

        let report: ScanReport = serde_json::from_value(body).unwrap();
        assert_eq!(report.status, "success");
        assert_eq!(report.summary.critical, 2);
        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].risk_level, RiskLevel::Critical);
        assert_eq!(report.results[0].vulnerabilities[0].rule, "hidden_instructions");
        assert!(report.results[1].vulnerabilities.is_empty());
    }

    #[test]
    fn parses_attack_response_wire_shape() {
        let body = serde_json::json!({
            "status": "success",
            "attack_type": "email_hijacking",
            "timeline": [
                {"step": 1, "event": "User sends email", "description": "Email to bob@example.com"},
                {"step": 2, "event": "MCP tool activated", "description": "Malicious send_email tool invoked"}
            ],
            "victim_sees": "Email sent to bob@example.com",
            "reality": "Email also sent to attacker@evil.com",
            "attacker_email": "attacker@evil.com"
        });

        let report: AttackReport = serde_json::from_value(body).unwrap();
        assert_eq!(report.timeline.len(), 2);
        assert_eq!(report.timeline[0].event, "User sends email");
        assert_eq!(report.attacker_email, "attacker@evil.com");
    }

    #[test]
    fn parses_service_error_body() {
        let report: AttackReport =
            serde_json::from_str(r#"{"status": "error", "message": "Attack failed"}"#).unwrap();
        assert_eq!(report.status, "error");
        assert_eq!(report.message.as_deref(), Some("Attack failed"));
        assert!(report.timeline.is_empty());
    }
}
