use colored::Colorize;

use cohesia_core::IndexReport;

/// Format a full analysis report for terminal output.
pub fn format_report(report: &IndexReport) -> String {
    let mut out = String::new();

    out.push_str(&format!("\n{}\n", "Cohesia - Cohesion Analysis".bold()));
    out.push_str(&format!("{}\n\n", "=".repeat(40)));

    let overall_str = format!("{:.1}", report.score);
    let overall_color = if report.score >= 80.0 {
        overall_str.green()
    } else if report.score >= 50.0 {
        overall_str.yellow()
    } else {
        overall_str.red()
    };
    out.push_str(&format!("{}: {}/100\n", "Overall Score".bold(), overall_color));

    for index in &report.metrics {
        let defects: Vec<_> = index.entries.iter().filter(|e| e.defect).collect();
        out.push_str(&format!(
            "\n{} {:.1}/100 ({} classes, {} defects)\n{}\n",
            index.metric.bold(),
            index.score,
            index.entries.len(),
            defects.len(),
            "-".repeat(40),
        ));
        for entry in defects {
            out.push_str(&format!(
                "  {} {}  value {}  diff {:+.1}%\n",
                "DEFECT".red().bold(),
                entry.class,
                entry.value,
                entry.diff,
            ));
        }
    }

    if report.metrics.iter().all(|i| i.entries.iter().all(|e| !e.defect)) {
        out.push_str(&format!("\n{}\n", "No defects found!".green().bold()));
    }

    out.push('\n');
    out
}

/// Format a check result for CI use. Returns (text, passed); a run
/// passes when no class is flagged as a defect.
pub fn format_check(report: &IndexReport) -> (String, bool) {
    let defect_count: usize = report
        .metrics
        .iter()
        .map(|i| i.entries.iter().filter(|e| e.defect).count())
        .sum();

    let passed = defect_count == 0;

    let mut out = format_report(report);
    if passed {
        out.push_str(&format!("{}\n", "CHECK PASSED".green().bold()));
    } else {
        out.push_str(&format!(
            "{}: {} class(es) flagged as defects\n",
            "CHECK FAILED".red().bold(),
            defect_count,
        ));
    }

    (out, passed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cohesia_core::{Index, IndexEntry, RawValue};

    fn report(with_defect: bool) -> IndexReport {
        IndexReport {
            score: if with_defect { 50.0 } else { 100.0 },
            metrics: vec![Index {
                metric: "LCOM".to_string(),
                score: if with_defect { 50.0 } else { 100.0 },
                entries: vec![
                    IndexEntry {
                        class: "Ledger".to_string(),
                        value: RawValue::Applicable(0.0),
                        diff: 0.0,
                        defect: false,
                    },
                    IndexEntry {
                        class: "Mailer".to_string(),
                        value: RawValue::Applicable(3.0),
                        diff: 120.0,
                        defect: with_defect,
                    },
                ],
            }],
        }
    }

    #[test]
    fn test_report_shows_score_and_defects() {
        let out = format_report(&report(true));
        assert!(out.contains("Overall Score"));
        assert!(out.contains("Mailer"));
        assert!(out.contains("+120.0%"));
        assert!(!out.contains("Ledger"), "clean classes are not listed");
    }

    #[test]
    fn test_report_without_defects() {
        let out = format_report(&report(false));
        assert!(out.contains("No defects found!"));
    }

    #[test]
    fn test_check_passes_without_defects() {
        let (out, passed) = format_check(&report(false));
        assert!(passed);
        assert!(out.contains("CHECK PASSED"));
    }

    #[test]
    fn test_check_fails_with_defects() {
        let (out, passed) = format_check(&report(true));
        assert!(!passed);
        assert!(out.contains("CHECK FAILED"));
        assert!(out.contains("1 class(es)"));
    }
}
