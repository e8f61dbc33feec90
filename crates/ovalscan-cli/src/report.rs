//! Report rendering for host verdicts

use ovalscan_catalog::{HostReport, Outcome};
use std::fmt::Write;

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Pretty,
    /// JSON array of host reports
    Json,
}

/// Render reports in the requested format
pub fn render(reports: &[HostReport], format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(reports)?),
        OutputFormat::Pretty => Ok(render_table(reports)),
    }
}

fn render_table(reports: &[HostReport]) -> String {
    let id_width = reports
        .iter()
        .flat_map(|r| r.verdicts.iter())
        .map(|v| v.test_id.len())
        .max()
        .unwrap_or(0)
        .max("TEST".len());

    let mut out = String::new();
    for report in reports {
        let _ = writeln!(out, "Host: {}", report.host);
        let _ = writeln!(out, "  {:<width$}  RESULT", "TEST", width = id_width);
        for verdict in &report.verdicts {
            let result = match &verdict.outcome {
                Outcome::Matched => String::from("matched"),
                Outcome::NotMatched => String::from("not matched"),
                Outcome::Error { code, message } => format!("error [{}] {}", code, message),
            };
            let _ = writeln!(
                out,
                "  {:<width$}  {}",
                verdict.test_id,
                result,
                width = id_width
            );
        }

        let matched = report.matched().count();
        let errors = report.errors().count();
        let _ = writeln!(
            out,
            "  {} tests, {} matched, {} errors",
            report.verdicts.len(),
            matched,
            errors
        );
        out.push('\n');
    }
    out
}
