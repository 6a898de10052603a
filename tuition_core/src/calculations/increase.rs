//! # Tuition Increase Percentage
//!
//! Derives the proposed tuition increase from two parts:
//!
//! - **OTI** (operations tuition increase): inflation rate + productivity rate
//! - **SI** (strategic items percentage): the cost of strategic initiatives as
//!   a share of current tuition revenue (`total students * average tuition`)
//!
//! The final increase is simply `OTI + SI`.
//!
//! ## Example
//!
//! ```rust
//! use tuition_core::calculations::increase::{final_increase_pct, RateInputs, StrategicItem};
//! use tuition_core::calculations::projection::GradeLevel;
//! use tuition_core::units::{Dollars, Percent};
//!
//! let grades = vec![GradeLevel::new("A", 100, Dollars(10_000.0))];
//! let items = vec![StrategicItem::new("STEM Lab", Dollars(50_000.0), "New science wing")];
//! let rates = RateInputs::new(Percent(0.0), Percent(0.0));
//!
//! let pct = final_increase_pct(&rates, &items, &grades);
//! assert!((pct.0 - 5.0).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use super::projection::GradeLevel;
use crate::errors::{ensure_non_negative, CalcResult};
use crate::units::{Dollars, Percent};

/// Default inflation rate pre-filled on the form (%)
pub const DEFAULT_INFLATION_RATE: f64 = 3.32;

/// Default productivity rate pre-filled on the form (%)
pub const DEFAULT_PRODUCTIVITY_RATE: f64 = 2.08;

/// Inflation and productivity rates that make up the operations increase.
///
/// ## JSON Example
///
/// ```json
/// { "inflation_rate": 3.32, "productivity_rate": 2.08 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateInputs {
    /// Rate of inflation (ROI), in percent
    pub inflation_rate: Percent,

    /// Rate of productivity increase (RPI), in percent
    pub productivity_rate: Percent,
}

impl RateInputs {
    pub fn new(inflation_rate: Percent, productivity_rate: Percent) -> Self {
        RateInputs {
            inflation_rate,
            productivity_rate,
        }
    }

    /// Validate input parameters.
    pub fn validate(&self) -> CalcResult<()> {
        ensure_non_negative("inflation_rate", self.inflation_rate.0, "Inflation rate")?;
        ensure_non_negative("productivity_rate", self.productivity_rate.0, "Productivity rate")?;
        Ok(())
    }
}

impl Default for RateInputs {
    fn default() -> Self {
        RateInputs::new(
            Percent(DEFAULT_INFLATION_RATE),
            Percent(DEFAULT_PRODUCTIVITY_RATE),
        )
    }
}

/// A strategic initiative whose cost is funded through tuition.
///
/// ## JSON Example
///
/// ```json
/// { "name": "STEM Lab", "cost": 50000.0, "description": "New science wing" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategicItem {
    /// Short name shown in tables (e.g., "Teacher Salaries")
    pub name: String,

    /// One-time or annual cost to be recovered through tuition
    pub cost: Dollars,

    /// Free-text justification
    #[serde(default)]
    pub description: String,
}

impl StrategicItem {
    pub fn new(name: impl Into<String>, cost: Dollars, description: impl Into<String>) -> Self {
        StrategicItem {
            name: name.into(),
            cost,
            description: description.into(),
        }
    }

    /// Validate input parameters.
    ///
    /// `index` is only used to name the field in the error.
    pub fn validate(&self, index: usize) -> CalcResult<()> {
        ensure_non_negative(
            format!("strategic_items[{}].cost", index),
            self.cost.0,
            "Strategic item cost",
        )
    }
}

/// Sum of all strategic item costs.
pub fn total_strategic_cost(items: &[StrategicItem]) -> Dollars {
    items.iter().map(|item| item.cost).sum()
}

/// Enrollment-weighted mean tuition.
///
/// `sum(count_i * tuition_i) / sum(count_i)`. Returns 0 when there are no
/// students at all; callers must read 0 as "unavailable", not as a real
/// average.
pub fn average_tuition(grades: &[GradeLevel]) -> Dollars {
    let students = total_students(grades);
    if students == 0 {
        return Dollars::ZERO;
    }
    let revenue: Dollars = grades.iter().map(GradeLevel::current_revenue).sum();
    revenue / students as f64
}

/// Total enrollment across all grades.
pub fn total_students(grades: &[GradeLevel]) -> u64 {
    grades.iter().map(|g| u64::from(g.student_count)).sum()
}

/// OTI: inflation rate + productivity rate.
pub fn operations_increase_pct(rates: &RateInputs) -> Percent {
    rates.inflation_rate + rates.productivity_rate
}

/// SI: strategic item costs as a percentage of `total students * average tuition`.
///
/// Returns 0 when that denominator is 0.
pub fn strategic_items_pct(items: &[StrategicItem], grades: &[GradeLevel]) -> Percent {
    let denominator = average_tuition(grades) * total_students(grades) as f64;
    total_strategic_cost(items).percent_of(denominator)
}

/// Final proposed increase: OTI + SI.
pub fn final_increase_pct(rates: &RateInputs, items: &[StrategicItem], grades: &[GradeLevel]) -> Percent {
    operations_increase_pct(rates) + strategic_items_pct(items, grades)
}
