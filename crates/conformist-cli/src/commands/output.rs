//! Shared output formatting for conformance reports.

use anyhow::Result;
use conformist_core::{Analysis, Severity};

use crate::OutputFormat;

/// Print a conformance report in the specified format.
pub fn print(analysis: &Analysis, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(analysis),
        OutputFormat::Json => return print_json(analysis),
        OutputFormat::Compact => print!("{}", compact(analysis)),
    }
    Ok(())
}

fn print_text(analysis: &Analysis) {
    let report = &analysis.report;
    let (high, medium, low) = report.count_by_severity();

    for violation in &report.violations {
        let severity_indicator = match violation.severity {
            Severity::High => "\x1b[31mhigh\x1b[0m",
            Severity::Medium => "\x1b[33mmedium\x1b[0m",
            Severity::Low => "\x1b[34mlow\x1b[0m",
        };

        println!("{} {} {}", severity_indicator, violation.scope, violation.kind);
        println!("  {}", violation.render_members());
        println!();
    }

    if !analysis.exemptions.is_empty() {
        let hits: Vec<String> = analysis
            .exemptions
            .iter()
            .map(|(name, count)| format!("{name} ({count})"))
            .collect();
        println!(
            "Exempted {} finding(s): {}",
            analysis.exempted(),
            hits.join(", ")
        );
    }

    let summary_color = if high > 0 {
        "\x1b[31m"
    } else if medium > 0 || low > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!("{}{}\x1b[0m", summary_color, report.summary());
}

fn print_json(analysis: &Analysis) -> Result<()> {
    let json = serde_json::to_string_pretty(&analysis.report)?;
    println!("{json}");
    Ok(())
}

fn compact(analysis: &Analysis) -> String {
    analysis
        .report
        .violations
        .iter()
        .map(|violation| format!("{violation}\n"))
        .collect()
}
