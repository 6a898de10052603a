//! Command-line configuration and scenario loading.

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tuition_core::calculations::GradeLevel;
use tuition_core::units::{Dollars, Percent};
use tuition_core::Scenario;

#[derive(Parser, Debug, Clone)]
#[command(name = "tuition_cli")]
#[command(about = "Project next year's tuition from enrollment, rates, strategic items and financial aid")]
#[command(version)]
pub struct CliConfig {
    /// Scenario JSON file (uses the built-in demo scenario when omitted)
    #[arg(short, long)]
    pub scenario: Option<PathBuf>,

    /// Rate of inflation in percent (overrides the scenario)
    #[arg(long)]
    pub inflation: Option<f64>,

    /// Rate of productivity increase in percent (overrides the scenario)
    #[arg(long)]
    pub productivity: Option<f64>,

    /// Total financial aid in dollars (overrides the scenario)
    #[arg(long)]
    pub financial_aid: Option<f64>,

    /// Manual tuition for one grade, as INDEX=AMOUNT (repeatable)
    #[arg(long = "adjust", value_name = "INDEX=AMOUNT", value_parser = parse_adjustment)]
    pub adjustments: Vec<(usize, f64)>,

    /// Print the projection as JSON instead of a summary
    #[arg(long)]
    pub json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl CliConfig {
    /// Reject flag values the calculator would refuse anyway, with a flag-level message.
    pub fn validate(&self) -> Result<()> {
        let checks = [
            ("--inflation", self.inflation),
            ("--productivity", self.productivity),
            ("--financial-aid", self.financial_aid),
        ];
        for (flag, value) in checks {
            if let Some(v) = value {
                if !v.is_finite() || v < 0.0 {
                    bail!("{} must be a non-negative number, got {}", flag, v);
                }
            }
        }
        for (index, amount) in &self.adjustments {
            if !amount.is_finite() || *amount < 0.0 {
                bail!("--adjust {}={} must use a non-negative amount", index, amount);
            }
        }
        if let Some(path) = &self.scenario {
            if !path.exists() {
                bail!("scenario file not found: {}", path.display());
            }
        }
        Ok(())
    }

    /// Load the scenario and layer the command-line values on top.
    pub fn build_scenario(&self) -> Result<Scenario> {
        let mut scenario = match &self.scenario {
            Some(path) => {
                let json = fs::read_to_string(path)
                    .with_context(|| format!("reading scenario {}", path.display()))?;
                Scenario::from_json(&json)
                    .with_context(|| format!("decoding scenario {}", path.display()))?
            }
            None => demo_scenario(),
        };

        if let Some(rate) = self.inflation {
            scenario.rates.inflation_rate = Percent(rate);
        }
        if let Some(rate) = self.productivity {
            scenario.rates.productivity_rate = Percent(rate);
        }
        if let Some(aid) = self.financial_aid {
            scenario.financial_aid = Dollars(aid);
        }
        for &(index, amount) in &self.adjustments {
            scenario
                .set_override(index, Dollars(amount))
                .with_context(|| format!("applying --adjust {}={}", index, amount))?;
        }
        Ok(scenario)
    }
}

/// Parse an `INDEX=AMOUNT` pair.
pub fn parse_adjustment(s: &str) -> Result<(usize, f64), String> {
    let (index, amount) = s
        .split_once('=')
        .ok_or_else(|| format!("expected INDEX=AMOUNT, got '{}'", s))?;
    let index = index
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("invalid grade index '{}'", index.trim()))?;
    let amount = amount
        .trim()
        .parse::<f64>()
        .map_err(|_| format!("invalid amount '{}'", amount.trim()))?;
    Ok((index, amount))
}

/// Two-grade scenario used when no file is given.
pub fn demo_scenario() -> Scenario {
    let mut scenario = Scenario::new("Demo Tuition Proposal", "Demo School", "tuition_cli");
    scenario.add_grade(GradeLevel::new("K", 10, Dollars(10_000.0)));
    scenario.add_grade(GradeLevel::new("1st", 10, Dollars(11_000.0)));
    scenario.financial_aid = Dollars(5_000.0);
    scenario
}
