//! Plain-text rendering of verification reports and skill summaries.

use std::fmt::Write;

use vericast_skill::SkillSummary;
use vericast_verify::VerificationReport;

const RULE_WIDTH: usize = 70;

/// Message printed when a skill summary is requested but none can be built.
pub const NO_SKILL_DATA: &str = "No historical skill data available";

pub fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Header, pair count and the per-variable statistical block.
pub fn verification(report: &VerificationReport) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(out, "VERIFICATION RESULTS - {}", report.model);
    let _ = writeln!(out, "{}", rule());
    let _ = writeln!(
        out,
        "\nVerified {} forecast-observation pairs",
        report.pairs_verified
    );
    let _ = writeln!(
        out,
        "({} considered, {} rejected by QC, {} without a forecast)",
        report.observations_considered, report.qc_rejected, report.unmatched
    );

    if !report.statistical_summary.is_empty() {
        let _ = writeln!(out, "\n=== STATISTICAL METRICS (Model Accuracy) ===");
        for (variable, s) in &report.statistical_summary {
            let _ = writeln!(out, "\n{variable}:");
            let _ = writeln!(out, "  MAE:        {:.3}", s.mae);
            let _ = writeln!(out, "  RMSE:       {:.3}", s.rmse);
            let _ = writeln!(out, "  Bias:       {:.3}", s.bias);
            let _ = writeln!(out, "  Pairs:      {}", s.pairs);
        }
    }
    out
}

/// Decision scores and the contingency table for every threshold.
pub fn decision_metrics(report: &VerificationReport) -> String {
    let mut out = String::new();
    if report.decision_summary.is_empty() {
        return out;
    }
    let _ = writeln!(out, "\n=== DECISION METRICS (Operational Value) ===");
    let _ = writeln!(out, "These metrics show forecast value for decision-making");
    for d in &report.decision_summary {
        let s = &d.scores;
        let c = &d.counts;
        let _ = writeln!(out, "\n{}_threshold_{} ({}):", d.variable, d.threshold, d.operator);
        let _ = writeln!(out, "  Hit Rate (POD):       {:.3}  (want HIGH)", s.hit_rate);
        let _ = writeln!(out, "  False Alarm Rate:     {:.3}  (want LOW)", s.false_alarm_rate);
        let _ = writeln!(out, "  False Alarm Ratio:    {:.3}  (want LOW)", s.false_alarm_ratio);
        let _ = writeln!(out, "  CSI:                  {:.3}  (key metric)", s.csi);
        let _ = writeln!(out, "  Accuracy:             {:.3}", s.accuracy);
        let _ = writeln!(out, "  Bias Score:           {:.3}  (1.0 = unbiased)", s.bias_score);
        let _ = writeln!(out, "\n  Contingency Table:");
        let _ = writeln!(out, "    Hits:              {}", c.hits);
        let _ = writeln!(out, "    Misses:            {}  (didn't warn)", c.misses);
        let _ = writeln!(
            out,
            "    False Alarms:      {}  (warned unnecessarily)",
            c.false_alarms
        );
        let _ = writeln!(out, "    Correct Negatives: {}", c.correct_negatives);
    }
    out
}

/// Fixed-width table of skill summaries; empty input gives [`NO_SKILL_DATA`].
pub fn skill_table(rows: &[SkillSummary]) -> String {
    if rows.is_empty() {
        return format!("{NO_SKILL_DATA}\n");
    }
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:<16} {:>5} {:>10} {:>9} {:>9} {:>6} {:>8} {:>6}",
        "date", "variable", "lead", "threshold", "mae", "rmse", "csi", "hit_rate", "pairs"
    );
    for r in rows {
        let threshold = r.threshold.map_or_else(|| "-".to_string(), |t| format!("{t}"));
        let (csi, hit_rate) = r.decision.map_or_else(
            || ("-".to_string(), "-".to_string()),
            |d| (format!("{:.3}", d.csi), format!("{:.3}", d.hit_rate)),
        );
        let _ = writeln!(
            out,
            "{:<10} {:<16} {:>5} {:>10} {:>9.3} {:>9.3} {:>6} {:>8} {:>6}",
            r.window_date.format("%Y-%m-%d"),
            r.variable,
            r.lead_time_hours,
            threshold,
            r.stats.mae,
            r.stats.rmse,
            csi,
            hit_rate,
            r.stats.pairs
        );
    }
    out
}
