use std::fmt::{self, Write};

use kpi_audit_core::{AuditReport, AuditRow, Crosstab};

/// Plain-text report for terminals.
pub fn render_text(report: &AuditReport) -> String {
    let mut out = String::new();
    // Writing into a `String` cannot fail.
    if write_report(&mut out, report).is_err() {
        out.clear();
    }
    out
}

fn write_report(out: &mut String, report: &AuditReport) -> fmt::Result {
    let s = &report.summary;
    writeln!(out, "KPI audit")?;
    writeln!(out, "  metrics:              {}", s.total_metrics)?;
    writeln!(out, "  departments:          {}", s.departments)?;
    writeln!(out, "  in dashboards:        {}", s.visible_in_dashboard)?;
    writeln!(out, "  decision-driving:     {}", s.used_in_decisions)?;
    writeln!(
        out,
        "  vanity:               {} ({:.1}%)",
        s.vanity,
        s.vanity_share * 100.0
    )?;
    writeln!(
        out,
        "  high-value:           {} ({:.1}%)",
        s.high_value,
        s.high_value_share * 100.0
    )?;
    writeln!(
        out,
        "  dashboard reduction:  {:.1}%",
        s.dashboard_reduction_pct
    )?;
    for (department, breakdown) in &s.by_department {
        writeln!(
            out,
            "    {department:<30} {:.1}%",
            breakdown.dashboard_reduction_pct
        )?;
    }

    writeln!(out, "\nDashboard visibility vs decision use")?;
    write_crosstab(out, &s.visibility_vs_decisions)?;
    writeln!(out, "\nExecutive requested vs decision use")?;
    write_crosstab(out, &s.executive_vs_decisions)?;

    writeln!(out, "\nTop metrics by department")?;
    for (department, rows) in &report.top_metrics {
        writeln!(out, "  {department}")?;
        for row in rows {
            writeln!(
                out,
                "    {:<32} value {:>2}  {}",
                row.record.metric_name,
                row.value_score,
                reasons_or_dash(&row.value_reasons)
            )?;
        }
    }

    writeln!(out, "\nRecommended for removal")?;
    if report.removal_candidates.is_empty() {
        writeln!(out, "  none")?;
    }
    for row in &report.removal_candidates {
        writeln!(out, "  {}", line(row))?;
    }
    Ok(())
}

fn write_crosstab(out: &mut String, table: &Crosstab) -> fmt::Result {
    write!(out, "  {:<12}", "")?;
    for column in &table.columns {
        write!(out, " {column:>8}")?;
    }
    writeln!(out, " {:>8}", "Total")?;
    for ((label, counts), total) in table.rows.iter().zip(&table.counts).zip(&table.row_totals) {
        write!(out, "  {label:<12}")?;
        for count in counts {
            write!(out, " {count:>8}")?;
        }
        writeln!(out, " {total:>8}")?;
    }
    write!(out, "  {:<12}", "Total")?;
    for total in &table.column_totals {
        write!(out, " {total:>8}")?;
    }
    writeln!(out, " {:>8}", table.total)
}

fn line(row: &AuditRow) -> String {
    format!(
        "{} / {}: vanity {} ({})",
        row.record.department,
        row.record.metric_name,
        row.vanity_score,
        reasons_or_dash(&row.vanity_reasons)
    )
}

fn reasons_or_dash(reasons: &str) -> &str {
    if reasons.is_empty() {
        "-"
    } else {
        reasons
    }
}
