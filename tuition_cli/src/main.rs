//! # Tuition CLI
//!
//! Terminal front end for the tuition projection engine. Reads a scenario
//! JSON file (or uses a two-grade demo), applies flag overrides, and prints a
//! summary or the raw projection JSON.

mod config;
mod logger;

use std::io::{self, Write};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tuition_core::calculations::compare_adjustments;
use tuition_core::units::Dollars;
use tuition_core::{Scenario, TuitionProjection};

use crate::config::CliConfig;

fn main() -> ExitCode {
    let config = CliConfig::parse();
    logger::init_cli_logger(config.verbose);

    tracing::debug!("CLI config: {:?}", config);

    let stdout = io::stdout();
    match run(&config, &mut stdout.lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("tuition projection failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(config: &CliConfig, out: &mut impl Write) -> Result<()> {
    config.validate()?;

    let scenario = config.build_scenario()?;
    scenario.validate()?;
    tracing::info!(
        grades = scenario.grades.len(),
        strategic_items = scenario.strategic_items.len(),
        overrides = scenario.overrides.len(),
        "running projection for '{}'",
        scenario.meta.report_title
    );

    let projection = scenario.calculate()?;

    if config.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&projection)?)?;
    } else {
        let baseline = scenario.calculate_baseline()?;
        print_summary(out, &scenario, &baseline, &projection)?;
    }
    Ok(())
}

fn print_summary(
    out: &mut impl Write,
    scenario: &Scenario,
    baseline: &TuitionProjection,
    projection: &TuitionProjection,
) -> io::Result<()> {
    writeln!(out, "═══════════════════════════════════════")?;
    writeln!(out, "  {}", title_or(&scenario.meta.report_title, "TUITION PROJECTION"))?;
    if !scenario.meta.school.is_empty() {
        writeln!(out, "  {}", scenario.meta.school)?;
    }
    writeln!(out, "═══════════════════════════════════════")?;
    writeln!(out)?;
    writeln!(out, "Increase:")?;
    writeln!(out, "  Average tuition:   {}", format_currency(baseline.average_tuition))?;
    writeln!(out, "  Operations (OTI):  {:.2}%", baseline.operations_increase_pct.0)?;
    writeln!(out, "  Strategic (SI):    {:.2}%", baseline.strategic_items_pct.0)?;
    writeln!(out, "  Final increase:    {:.2}%", baseline.final_increase_pct.0)?;
    writeln!(out)?;
    writeln!(out, "By grade:")?;
    for row in &projection.per_grade {
        writeln!(
            out,
            "  {:<10} {:>4} x {:>12} -> {:>12} = {:>14}{}",
            row.name,
            row.student_count,
            format_currency(row.current_tuition),
            format_currency(row.new_tuition),
            format_currency(row.total_for_grade),
            if row.overridden { "  (adjusted)" } else { "" }
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Totals:")?;
    writeln!(out, "  Current tuition:   {}", format_currency(projection.total_current_tuition))?;
    writeln!(out, "  New tuition:       {}", format_currency(projection.total_new_tuition))?;
    writeln!(out, "  Revenue change:    {}", format_signed(projection.revenue_change()))?;
    writeln!(out, "  Effective increase: {:.2}%", projection.effective_increase_pct.0)?;
    writeln!(out, "  Financial aid:     {}", format_currency(projection.financial_aid))?;
    writeln!(out, "  Assistance ratio:  {:.2}%", projection.tuition_assistance_ratio_pct.0)?;

    if projection.has_overrides() {
        writeln!(out)?;
        writeln!(out, "Adjustments vs calculated:")?;
        for row in compare_adjustments(baseline, projection) {
            if row.change != Dollars::ZERO {
                writeln!(
                    out,
                    "  {:<10} {:>12} -> {:>12} ({})",
                    row.name,
                    format_currency(row.calculated_tuition),
                    format_currency(row.adjusted_tuition),
                    format_signed(row.change)
                )?;
            }
        }
    }
    Ok(())
}

fn title_or<'a>(title: &'a str, fallback: &'a str) -> &'a str {
    if title.is_empty() { fallback } else { title }
}

/// `$1,234.56` with thousands separators.
fn format_currency(amount: Dollars) -> String {
    let cents = (amount.0.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if amount.0 < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, cents % 100)
}

fn format_signed(amount: Dollars) -> String {
    if amount.0 > 0.0 {
        format!("+{}", format_currency(amount))
    } else {
        format_currency(amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_with(args: &[&str]) -> Result<String> {
        let mut argv = vec!["tuition_cli"];
        argv.extend_from_slice(args);
        let config = CliConfig::try_parse_from(argv)?;
        let mut out = Vec::new();
        run(&config, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_summary_for_demo_scenario() {
        let text = run_with(&[]).unwrap();
        assert!(text.contains("Demo Tuition Proposal"));
        assert!(text.contains("Final increase:    5.40%"));
        assert!(text.contains("New tuition:       $221,340.00"));
        assert!(text.contains("Revenue change:    +$11,340.00"));
        assert!(text.contains("Assistance ratio:  2.26%"));
        assert!(!text.contains("(adjusted)"));
        assert!(!text.contains("Adjustments vs calculated"));
    }

    #[test]
    fn test_summary_marks_adjusted_grades() {
        let text = run_with(&["--adjust", "1=12000"]).unwrap();
        let adjusted_lines: Vec<_> = text.lines().filter(|l| l.contains("(adjusted)")).collect();
        assert_eq!(adjusted_lines.len(), 1);
        assert!(adjusted_lines[0].trim_start().starts_with("1st"));
        assert!(text.contains("Adjustments vs calculated:"));
        assert!(text.contains("$12,000.00"));
    }

    #[test]
    fn test_json_output() {
        let text = run_with(&["--json", "--financial-aid", "0"]).unwrap();
        let projection: TuitionProjection = serde_json::from_str(&text).unwrap();
        assert_eq!(projection.per_grade.len(), 2);
        assert!((projection.total_new_tuition.0 - 221_340.0).abs() < 1e-6);
        assert_eq!(projection.financial_aid, Dollars::ZERO);
    }

    #[test]
    fn test_run_fails_on_bad_input() {
        assert!(run_with(&["--adjust", "9=100"]).is_err());
        assert!(run_with(&["--inflation=-2"]).is_err());
        assert!(run_with(&["--scenario", "/no/such/scenario.json"]).is_err());
    }

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(Dollars(0.0)), "$0.00");
        assert_eq!(format_currency(Dollars(999.5)), "$999.50");
        assert_eq!(format_currency(Dollars(1_000.0)), "$1,000.00");
        assert_eq!(format_currency(Dollars(221_340.0)), "$221,340.00");
        assert_eq!(format_currency(Dollars(1_234_567.891)), "$1,234,567.89");
        assert_eq!(format_currency(Dollars(-540.0)), "-$540.00");
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(Dollars(406.0)), "+$406.00");
        assert_eq!(format_signed(Dollars(-12.5)), "-$12.50");
    }

    #[test]
    fn test_title_or() {
        assert_eq!(title_or("", "TUITION PROJECTION"), "TUITION PROJECTION");
        assert_eq!(title_or("FY27", "TUITION PROJECTION"), "FY27");
    }
}
