//! # Views — server-side rendering of report data
//!
//! Pure functions from report data to HTML fragment strings. The page shell
//! injects the fragments verbatim, so everything that originated from the
//! scanner service is HTML-escaped here. Rendering depends on nothing but the
//! report passed in; an absent report simply renders nothing.

use crate::report::{AttackReport, ScanReport, SeverityCounts};

/// Minimal HTML escape for service-supplied text.
fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// The four aggregate counters, read directly from the summary.
pub fn render_summary(summary: &SeverityCounts) -> String {
    let mut html = String::from("<div class=\"summary-grid\">");
    for (label, count) in [
        ("critical", summary.critical),
        ("high", summary.high),
        ("medium", summary.medium),
        ("safe", summary.safe),
    ] {
        html.push_str(&format!(
            "<div class=\"stat sev-{label}\"><div class=\"val\" data-sev=\"{label}\">{count}</div>\
             <div class=\"label\">{label}</div></div>"
        ));
    }
    html.push_str("</div>");
    html
}

/// One card per finding, left-bordered in the finding's severity color.
pub fn render_scan_results(report: &ScanReport) -> String {
    let mut html = String::new();
    for finding in &report.results {
        let color = finding.risk_level.color();
        html.push_str(&format!(
            "<div class=\"finding-card\" style=\"border-left-color:{color}\">\
             <div class=\"finding-head\">\
             <span class=\"finding-server\">{server}</span>\
             <span class=\"finding-tool\">{tool}</span>\
             <span class=\"sev-badge\" style=\"color:{color};border-color:{color}\">{badge}</span>\
             </div>",
            server = escape(&finding.server),
            tool = escape(&finding.tool),
            badge = finding.risk_level.label(),
        ));

        if finding.vulnerabilities.is_empty() {
            html.push_str("<div class=\"no-vulns\">No vulnerabilities detected</div>");
        } else {
            for vuln in &finding.vulnerabilities {
                html.push_str(&format!(
                    "<div class=\"vuln-row\">\
                     <span class=\"vuln-dot\" style=\"background:{color}\"></span>\
                     <div class=\"vuln-body\">\
                     <div class=\"vuln-desc\">{desc}</div>\
                     <div class=\"vuln-rec\">{rec}</div>\
                     </div></div>",
                    color = vuln.severity.color(),
                    desc = escape(&vuln.description),
                    rec = escape(&vuln.recommendation),
                ));
            }
        }
        html.push_str("</div>");
    }
    html
}

/// Numbered attack steps in exactly the order received, followed by the
/// perception-vs-reality comparison. Reports whose status is not `"success"`
/// render nothing; the request path has already surfaced the failure notice.
pub fn render_attack_timeline(report: &AttackReport) -> String {
    if report.status != "success" {
        return String::new();
    }

    let mut html = String::from("<div class=\"timeline\">");
    for step in &report.timeline {
        html.push_str(&format!(
            "<div class=\"timeline-step\">\
             <div class=\"step-num\">{num}</div>\
             <div class=\"step-body\">\
             <div class=\"step-event\">{event}</div>\
             <div class=\"step-desc\">{desc}</div>\
             </div></div>",
            num = step.step,
            event = escape(&step.event),
            desc = escape(&step.description),
        ));
    }
    html.push_str("</div>");

    html.push_str(&format!(
        "<div class=\"compare-grid\">\
         <div class=\"compare-panel victim\">\
         <div class=\"panel-title\">What the user sees</div>\
         <div class=\"panel-text\">{victim}</div></div>\
         <div class=\"compare-panel reality\">\
         <div class=\"panel-title\">Reality</div>\
         <div class=\"panel-text\">{reality}</div>\
         <div class=\"attacker-line\">Attacker: <span class=\"attacker-email\">{email}</span></div>\
         </div></div>",
        victim = escape(&report.victim_sees),
        reality = escape(&report.reality),
        email = escape(&report.attacker_email),
    ));
    html
}
