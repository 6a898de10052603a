//! # Manual Tuition Adjustment
//!
//! After the baseline projection, a user may set any grade's new tuition by
//! hand ("adjust tuition by grade level"). This is a pure transform:
//! `(baseline, overrides) -> adjusted`. Totals, the assistance ratio and the
//! effective increase are recomputed from whatever per-grade values are set;
//! the rate-derived percentages are carried over unchanged.
//!
//! ## Example
//!
//! ```rust
//! use tuition_core::calculations::adjustment::{apply_manual_override, TuitionOverrides};
//! use tuition_core::calculations::projection::{calculate, GradeLevel, TuitionInput};
//! use tuition_core::calculations::increase::RateInputs;
//! use tuition_core::units::Dollars;
//!
//! let input = TuitionInput {
//!     grades: vec![GradeLevel::new("K", 10, Dollars(10_000.0))],
//!     strategic_items: vec![],
//!     rates: RateInputs::default(),
//!     financial_aid: Dollars(5_000.0),
//! };
//! let baseline = calculate(&input).unwrap();
//!
//! let overrides = TuitionOverrides::new().with(0, Dollars(10_500.0));
//! let adjusted = apply_manual_override(&baseline, &overrides).unwrap();
//! assert_eq!(adjusted.total_new_tuition, Dollars(105_000.0));
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::projection::{
    effective_increase_pct, tuition_assistance_ratio, GradeProjection, TuitionProjection, TuitionTable,
};
use crate::errors::{ensure_non_negative, CalcError, CalcResult};
use crate::units::Dollars;

/// User-chosen new tuition per student, keyed by grade position.
///
/// Serializes as a JSON object: `{ "0": 10500.0, "2": 12000.0 }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TuitionOverrides(pub BTreeMap<usize, Dollars>);

impl TuitionOverrides {
    pub fn new() -> Self {
        TuitionOverrides(BTreeMap::new())
    }

    /// Builder-style insert
    pub fn with(mut self, grade_index: usize, new_tuition: Dollars) -> Self {
        self.set(grade_index, new_tuition);
        self
    }

    /// Set (or replace) the override for one grade
    pub fn set(&mut self, grade_index: usize, new_tuition: Dollars) {
        self.0.insert(grade_index, new_tuition);
    }

    /// Remove the override for one grade, returning it if present
    pub fn remove(&mut self, grade_index: usize) -> Option<Dollars> {
        self.0.remove(&grade_index)
    }

    pub fn get(&self, grade_index: usize) -> Option<Dollars> {
        self.0.get(&grade_index).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Keep overrides attached to the same grades after the grade at
    /// `removed` is deleted: its entry is dropped, later indices shift down.
    pub fn shift_after_removal(&mut self, removed: usize) {
        self.0 = std::mem::take(&mut self.0)
            .into_iter()
            .filter(|(index, _)| *index != removed)
            .map(|(index, value)| if index > removed { (index - 1, value) } else { (index, value) })
            .collect();
    }

    /// Validate against a grade list of `grade_count` entries.
    pub fn validate(&self, grade_count: usize) -> CalcResult<()> {
        for (&index, amount) in &self.0 {
            if index >= grade_count {
                return Err(CalcError::unknown_grade(index, grade_count));
            }
            ensure_non_negative(format!("overrides[{}]", index), amount.0, "Adjusted tuition")?;
        }
        Ok(())
    }
}

/// Replace per-grade new tuition values and recompute derived totals.
///
/// Grades without an override keep the value they already have in
/// `projection`, so overrides can be layered.
///
/// # Returns
///
/// * `Ok(TuitionProjection)` - The adjusted projection
/// * `Err(CalcError::UnknownGrade)` - An override names a grade that does not exist
/// * `Err(CalcError::InvalidInput)` - An override amount is negative or not finite
pub fn apply_manual_override(
    projection: &TuitionProjection,
    overrides: &TuitionOverrides,
) -> CalcResult<TuitionProjection> {
    overrides.validate(projection.per_grade.len())?;

    let rows = projection
        .per_grade
        .iter()
        .enumerate()
        .map(|(i, row)| match overrides.get(i) {
            Some(new_tuition) => GradeProjection::from_parts(
                row.name.clone(),
                row.student_count,
                row.current_tuition,
                new_tuition,
                true,
            ),
            None => row.clone(),
        })
        .collect();
    let table = TuitionTable::from_rows(rows);

    debug!(
        overrides = overrides.len(),
        total_new_tuition = table.total_new_tuition.0,
        "manual tuition overrides applied"
    );

    Ok(TuitionProjection {
        total_current_tuition: table.total_current_tuition,
        total_new_tuition: table.total_new_tuition,
        tuition_assistance_ratio_pct: tuition_assistance_ratio(projection.financial_aid, table.total_new_tuition),
        effective_increase_pct: effective_increase_pct(table.total_current_tuition, table.total_new_tuition),
        per_grade: table.per_grade,
        ..projection.clone()
    })
}

/// One row of the before/after comparison of a manual adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeAdjustment {
    pub name: String,
    pub student_count: u32,

    /// New tuition as computed from the rates
    pub calculated_tuition: Dollars,

    /// New tuition after manual overrides
    pub adjusted_tuition: Dollars,

    /// adjusted - calculated
    pub change: Dollars,
}

/// Pair up the rows of a baseline and an adjusted projection.
///
/// Rows are matched by position; extra rows on either side are ignored.
pub fn compare_adjustments(baseline: &TuitionProjection, adjusted: &TuitionProjection) -> Vec<GradeAdjustment> {
    baseline
        .per_grade
        .iter()
        .zip(&adjusted.per_grade)
        .map(|(before, after)| GradeAdjustment {
            name: before.name.clone(),
            student_count: before.student_count,
            calculated_tuition: before.new_tuition,
            adjusted_tuition: after.new_tuition,
            change: after.new_tuition - before.new_tuition,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::increase::{RateInputs, StrategicItem};
    use crate::calculations::projection::{calculate, GradeLevel, TuitionInput, MAX_STRATEGIC_ITEMS};
    use crate::units::Percent;
    use proptest::prelude::*;

    fn baseline() -> TuitionProjection {
        let input = TuitionInput {
            grades: vec![
                GradeLevel::new("K", 10, Dollars(10_000.0)),
                GradeLevel::new("1st", 10, Dollars(11_000.0)),
                GradeLevel::new("2nd", 5, Dollars(12_000.0)),
            ],
            strategic_items: vec![],
            rates: RateInputs::new(Percent(3.32), Percent(2.08)),
            financial_aid: Dollars(5_000.0),
        };
        calculate(&input).unwrap()
    }

    #[test]
    fn test_override_recomputes_totals() {
        let base = baseline();
        let overrides = TuitionOverrides::new().with(1, Dollars(12_000.0));
        let adjusted = apply_manual_override(&base, &overrides).unwrap();

        let row = &adjusted.per_grade[1];
        assert!(row.overridden);
        assert_eq!(row.new_tuition, Dollars(12_000.0));
        assert_eq!(row.total_for_grade, Dollars(120_000.0));
        assert_eq!(row.difference, Dollars(1_000.0));

        // Untouched rows are carried over as-is
        assert_eq!(adjusted.per_grade[0], base.per_grade[0]);
        assert_eq!(adjusted.per_grade[2], base.per_grade[2]);

        let expected_total = base.per_grade[0].total_for_grade + Dollars(120_000.0) + base.per_grade[2].total_for_grade;
        assert!((adjusted.total_new_tuition.0 - expected_total.0).abs() < 1e-6);
        assert_eq!(adjusted.total_current_tuition, base.total_current_tuition);

        let expected_ratio = 5_000.0 / adjusted.total_new_tuition.0 * 100.0;
        assert!((adjusted.tuition_assistance_ratio_pct.0 - expected_ratio).abs() < 1e-9);

        // Rate-derived percentages are not touched
        assert_eq!(adjusted.final_increase_pct, base.final_increase_pct);
        assert_eq!(adjusted.operations_increase_pct, base.operations_increase_pct);
        assert!(adjusted.has_overrides());
    }

    #[test]
    fn test_effective_increase_after_override() {
        let base = baseline();
        // Freeze every grade at its current tuition
        let overrides = TuitionOverrides::new()
            .with(0, Dollars(10_000.0))
            .with(1, Dollars(11_000.0))
            .with(2, Dollars(12_000.0));
        let adjusted = apply_manual_override(&base, &overrides).unwrap();

        assert_eq!(adjusted.total_new_tuition, adjusted.total_current_tuition);
        assert_eq!(adjusted.effective_increase_pct, Percent::ZERO);
    }

    #[test]
    fn test_baseline_overrides_are_idempotent() {
        let base = baseline();
        let mut overrides = TuitionOverrides::new();
        for (i, row) in base.per_grade.iter().enumerate() {
            overrides.set(i, row.new_tuition);
        }
        let adjusted = apply_manual_override(&base, &overrides).unwrap();

        assert_eq!(adjusted.total_new_tuition, base.total_new_tuition);
        assert_eq!(adjusted.total_current_tuition, base.total_current_tuition);
        assert_eq!(adjusted.tuition_assistance_ratio_pct, base.tuition_assistance_ratio_pct);
        for (a, b) in adjusted.per_grade.iter().zip(&base.per_grade) {
            assert_eq!(a.total_for_grade, b.total_for_grade);
        }
    }

    #[test]
    fn test_empty_overrides_change_nothing() {
        let base = baseline();
        let adjusted = apply_manual_override(&base, &TuitionOverrides::new()).unwrap();
        assert_eq!(adjusted, base);
    }

    #[test]
    fn test_overrides_layer() {
        let base = baseline();
        let first = apply_manual_override(&base, &TuitionOverrides::new().with(0, Dollars(10_100.0))).unwrap();
        let second = apply_manual_override(&first, &TuitionOverrides::new().with(2, Dollars(12_100.0))).unwrap();

        assert_eq!(second.per_grade[0].new_tuition, Dollars(10_100.0));
        assert!(second.per_grade[0].overridden);
        assert_eq!(second.per_grade[2].new_tuition, Dollars(12_100.0));
        assert!(!second.per_grade[1].overridden);
    }

    #[test]
    fn test_override_unknown_grade() {
        let base = baseline();
        let err = apply_manual_override(&base, &TuitionOverrides::new().with(3, Dollars(1.0))).unwrap_err();
        assert_eq!(err, CalcError::unknown_grade(3, 3));
    }

    #[test]
    fn test_override_negative_amount() {
        let base = baseline();
        let err = apply_manual_override(&base, &TuitionOverrides::new().with(0, Dollars(-1.0))).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_zero_override_guards_ratio() {
        let base = baseline();
        let overrides = TuitionOverrides::new()
            .with(0, Dollars::ZERO)
            .with(1, Dollars::ZERO)
            .with(2, Dollars::ZERO);
        let adjusted = apply_manual_override(&base, &overrides).unwrap();
        assert_eq!(adjusted.total_new_tuition, Dollars::ZERO);
        assert_eq!(adjusted.tuition_assistance_ratio_pct, Percent::ZERO);
    }

    #[test]
    fn test_shift_after_removal() {
        let mut overrides = TuitionOverrides::new()
            .with(0, Dollars(1.0))
            .with(1, Dollars(2.0))
            .with(3, Dollars(4.0));
        overrides.shift_after_removal(1);

        assert_eq!(overrides.get(0), Some(Dollars(1.0)));
        assert_eq!(overrides.get(1), None);
        assert_eq!(overrides.get(2), Some(Dollars(4.0)));
        assert_eq!(overrides.len(), 2);
    }

    #[test]
    fn test_compare_adjustments() {
        let base = baseline();
        let adjusted = apply_manual_override(&base, &TuitionOverrides::new().with(1, Dollars(12_000.0))).unwrap();
        let rows = compare_adjustments(&base, &adjusted);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].change, Dollars::ZERO);
        assert_eq!(rows[1].adjusted_tuition, Dollars(12_000.0));
        assert!((rows[1].change.0 - (12_000.0 - base.per_grade[1].new_tuition.0)).abs() < 1e-9);
    }

    #[test]
    fn test_overrides_json_shape() {
        let overrides = TuitionOverrides::new().with(2, Dollars(12_500.0));
        let json = serde_json::to_string(&overrides).unwrap();
        assert_eq!(json, r#"{"2":12500.0}"#);

        let roundtrip: TuitionOverrides = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, overrides);
    }

    proptest! {
        #[test]
        fn overriding_with_baseline_values_changes_no_totals(
            grades in prop::collection::vec((1u32..400, 0.0f64..40_000.0), 0..12),
            inflation in 0.0f64..15.0,
            productivity in 0.0f64..15.0,
            costs in prop::collection::vec(0.0f64..500_000.0, 0..=MAX_STRATEGIC_ITEMS),
            aid in 0.0f64..2_000_000.0,
        ) {
            let input = TuitionInput {
                grades: grades
                    .iter()
                    .enumerate()
                    .map(|(i, (count, tuition))| GradeLevel::new(format!("G{}", i), *count, Dollars(*tuition)))
                    .collect(),
                strategic_items: costs
                    .iter()
                    .enumerate()
                    .map(|(i, cost)| StrategicItem::new(format!("Item {}", i + 1), Dollars(*cost), ""))
                    .collect(),
                rates: RateInputs::new(Percent(inflation), Percent(productivity)),
                financial_aid: Dollars(aid),
            };
            let base = calculate(&input).unwrap();

            let mut overrides = TuitionOverrides::new();
            for (i, row) in base.per_grade.iter().enumerate() {
                overrides.set(i, row.new_tuition);
            }
            let adjusted = apply_manual_override(&base, &overrides).unwrap();

            prop_assert_eq!(adjusted.total_new_tuition, base.total_new_tuition);
            prop_assert_eq!(adjusted.total_current_tuition, base.total_current_tuition);
            prop_assert_eq!(adjusted.tuition_assistance_ratio_pct, base.tuition_assistance_ratio_pct);
            prop_assert_eq!(adjusted.effective_increase_pct, base.effective_increase_pct);
        }
    }
}
