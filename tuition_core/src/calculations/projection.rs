//! # Tuition Projection
//!
//! Applies a proposed increase to every grade level and rolls the result up
//! into revenue totals and the tuition assistance ratio.
//!
//! ## Example (LLM-friendly)
//!
//! ```rust
//! use tuition_core::calculations::projection::{calculate, GradeLevel, TuitionInput};
//! use tuition_core::calculations::increase::RateInputs;
//! use tuition_core::units::{Dollars, Percent};
//!
//! let input = TuitionInput {
//!     grades: vec![
//!         GradeLevel::new("K", 10, Dollars(10_000.0)),
//!         GradeLevel::new("1st", 10, Dollars(11_000.0)),
//!     ],
//!     strategic_items: vec![],
//!     rates: RateInputs::new(Percent(3.32), Percent(2.08)),
//!     financial_aid: Dollars(5_000.0),
//! };
//!
//! let result = calculate(&input).unwrap();
//!
//! println!("Final increase: {:.2}%", result.final_increase_pct.0);
//! println!("New revenue: ${:.2}", result.total_new_tuition.0);
//! println!("Assistance ratio: {:.2}%", result.tuition_assistance_ratio_pct.0);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::increase::{
    average_tuition, final_increase_pct, operations_increase_pct, strategic_items_pct, RateInputs,
    StrategicItem,
};
use crate::errors::{ensure_non_negative, CalcError, CalcResult};
use crate::units::{Dollars, Percent};

/// Upper limit on strategic items, as offered by the entry form
pub const MAX_STRATEGIC_ITEMS: usize = 10;

/// One grade level with its enrollment and current per-student tuition.
///
/// ## JSON Example
///
/// ```json
/// { "name": "K", "student_count": 10, "current_tuition": 10000.0 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeLevel {
    /// Grade label (e.g., "K", "1st", "Upper School")
    pub name: String,

    /// Number of enrolled students
    pub student_count: u32,

    /// Current tuition per student
    pub current_tuition: Dollars,
}

impl GradeLevel {
    pub fn new(name: impl Into<String>, student_count: u32, current_tuition: Dollars) -> Self {
        GradeLevel {
            name: name.into(),
            student_count,
            current_tuition,
        }
    }

    /// Current revenue from this grade: count * tuition
    pub fn current_revenue(&self) -> Dollars {
        self.current_tuition * f64::from(self.student_count)
    }

    /// Validate input parameters.
    pub fn validate(&self, index: usize) -> CalcResult<()> {
        if self.name.trim().is_empty() {
            return Err(CalcError::missing_field(format!("grades[{}].name", index)));
        }
        ensure_non_negative(
            format!("grades[{}].current_tuition", index),
            self.current_tuition.0,
            "Tuition",
        )
    }
}

/// A projected row for one grade level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeProjection {
    pub name: String,
    pub student_count: u32,
    pub current_tuition: Dollars,

    /// Proposed tuition per student
    pub new_tuition: Dollars,

    /// student_count * new_tuition
    pub total_for_grade: Dollars,

    /// new_tuition - current_tuition
    pub difference: Dollars,

    /// True when `new_tuition` was set by a manual override
    #[serde(default)]
    pub overridden: bool,
}

impl GradeProjection {
    /// Build a row from a grade and the new per-student tuition.
    pub(crate) fn from_parts(
        name: String,
        student_count: u32,
        current_tuition: Dollars,
        new_tuition: Dollars,
        overridden: bool,
    ) -> Self {
        GradeProjection {
            name,
            student_count,
            current_tuition,
            new_tuition,
            total_for_grade: new_tuition * f64::from(student_count),
            difference: new_tuition - current_tuition,
            overridden,
        }
    }

    /// Current revenue from this grade: count * current tuition
    pub fn current_revenue(&self) -> Dollars {
        self.current_tuition * f64::from(self.student_count)
    }
}

/// Output of [`project_tuition`]: per-grade rows and both revenue totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuitionTable {
    pub per_grade: Vec<GradeProjection>,

    /// sum(student_count * current_tuition)
    pub total_current_tuition: Dollars,

    /// sum(total_for_grade)
    pub total_new_tuition: Dollars,
}

impl TuitionTable {
    /// Re-total a set of rows.
    pub(crate) fn from_rows(per_grade: Vec<GradeProjection>) -> Self {
        let total_current_tuition = per_grade.iter().map(GradeProjection::current_revenue).sum();
        let total_new_tuition = per_grade.iter().map(|row| row.total_for_grade).sum();
        TuitionTable {
            per_grade,
            total_current_tuition,
            total_new_tuition,
        }
    }
}

/// Apply `increase_pct` to every grade, preserving grade order.
pub fn project_tuition(grades: &[GradeLevel], increase_pct: Percent) -> TuitionTable {
    let factor = increase_pct.growth_factor();
    let rows = grades
        .iter()
        .map(|grade| {
            GradeProjection::from_parts(
                grade.name.clone(),
                grade.student_count,
                grade.current_tuition,
                grade.current_tuition * factor,
                false,
            )
        })
        .collect();
    TuitionTable::from_rows(rows)
}

/// Financial aid as a percentage of new tuition revenue.
///
/// Returns 0 when `total_new_tuition` is 0.
pub fn tuition_assistance_ratio(financial_aid: Dollars, total_new_tuition: Dollars) -> Percent {
    financial_aid.percent_of(total_new_tuition)
}

/// Revenue change between two totals, as a percentage of the first.
///
/// Returns 0 when `total_current` is 0.
pub fn effective_increase_pct(total_current: Dollars, total_new: Dollars) -> Percent {
    (total_new - total_current).percent_of(total_current)
}

/// Everything the calculator needs for one run.
///
/// ## JSON Example
///
/// ```json
/// {
///   "grades": [
///     { "name": "K", "student_count": 10, "current_tuition": 10000.0 },
///     { "name": "1st", "student_count": 10, "current_tuition": 11000.0 }
///   ],
///   "strategic_items": [],
///   "rates": { "inflation_rate": 3.32, "productivity_rate": 2.08 },
///   "financial_aid": 5000.0
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuitionInput {
    pub grades: Vec<GradeLevel>,

    #[serde(default)]
    pub strategic_items: Vec<StrategicItem>,

    #[serde(default)]
    pub rates: RateInputs,

    /// Total financial aid to be distributed
    #[serde(default)]
    pub financial_aid: Dollars,
}

impl TuitionInput {
    /// Validate input parameters.
    ///
    /// This is the gate between user entry and the arithmetic: once it
    /// passes, nothing downstream can fail.
    pub fn validate(&self) -> CalcResult<()> {
        for (i, grade) in self.grades.iter().enumerate() {
            grade.validate(i)?;
        }
        if self.strategic_items.len() > MAX_STRATEGIC_ITEMS {
            return Err(CalcError::invalid_input(
                "strategic_items",
                self.strategic_items.len().to_string(),
                format!("At most {} strategic items are supported", MAX_STRATEGIC_ITEMS),
            ));
        }
        for (i, item) in self.strategic_items.iter().enumerate() {
            item.validate(i)?;
        }
        self.rates.validate()?;
        ensure_non_negative("financial_aid", self.financial_aid.0, "Financial aid")?;
        Ok(())
    }
}

/// Results of a tuition projection.
///
/// ## JSON Example
///
/// ```json
/// {
///   "average_tuition": 10500.0,
///   "operations_increase_pct": 5.4,
///   "strategic_items_pct": 0.0,
///   "final_increase_pct": 5.4,
///   "total_current_tuition": 210000.0,
///   "total_new_tuition": 221340.0,
///   "financial_aid": 5000.0,
///   "tuition_assistance_ratio_pct": 2.259,
///   "effective_increase_pct": 5.4,
///   "per_grade": [ ... ]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TuitionProjection {
    /// Enrollment-weighted mean of current tuition (0 if no students)
    pub average_tuition: Dollars,

    /// OTI: inflation + productivity
    pub operations_increase_pct: Percent,

    /// SI: strategic costs over current tuition revenue
    pub strategic_items_pct: Percent,

    /// OTI + SI
    pub final_increase_pct: Percent,

    pub total_current_tuition: Dollars,
    pub total_new_tuition: Dollars,

    /// Aid amount the ratio was computed from
    pub financial_aid: Dollars,

    /// financial_aid / total_new_tuition * 100
    pub tuition_assistance_ratio_pct: Percent,

    /// Revenue growth actually realised by `per_grade`.
    ///
    /// Equal to `final_increase_pct` until manual overrides are applied.
    pub effective_increase_pct: Percent,

    pub per_grade: Vec<GradeProjection>,
}

impl TuitionProjection {
    /// True if any row carries a manual override
    pub fn has_overrides(&self) -> bool {
        self.per_grade.iter().any(|row| row.overridden)
    }

    /// Revenue added by the increase: total_new - total_current
    pub fn revenue_change(&self) -> Dollars {
        self.total_new_tuition - self.total_current_tuition
    }
}

/// Run a full projection.
///
/// # Arguments
///
/// * `input` - Grades, strategic items, rates and financial aid
///
/// # Returns
///
/// * `Ok(TuitionProjection)` - Calculation results
/// * `Err(CalcError)` - If inputs are invalid
pub fn calculate(input: &TuitionInput) -> CalcResult<TuitionProjection> {
    input.validate()?;

    let operations = operations_increase_pct(&input.rates);
    let strategic = strategic_items_pct(&input.strategic_items, &input.grades);
    let final_pct = final_increase_pct(&input.rates, &input.strategic_items, &input.grades);

    let table = project_tuition(&input.grades, final_pct);
    let ratio = tuition_assistance_ratio(input.financial_aid, table.total_new_tuition);

    debug!(
        grades = input.grades.len(),
        strategic_items = input.strategic_items.len(),
        final_increase_pct = final_pct.0,
        total_new_tuition = table.total_new_tuition.0,
        "tuition projection calculated"
    );

    Ok(TuitionProjection {
        average_tuition: average_tuition(&input.grades),
        operations_increase_pct: operations,
        strategic_items_pct: strategic,
        final_increase_pct: final_pct,
        total_current_tuition: table.total_current_tuition,
        total_new_tuition: table.total_new_tuition,
        financial_aid: input.financial_aid,
        tuition_assistance_ratio_pct: ratio,
        effective_increase_pct: effective_increase_pct(table.total_current_tuition, table.total_new_tuition),
        per_grade: table.per_grade,
    })
}
