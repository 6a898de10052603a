//! # Scenario
//!
//! A `Scenario` is the caller-owned container for everything a user enters:
//! grade levels, strategic items, rates, financial aid and any manual
//! per-grade overrides. It holds no derived values; call
//! [`Scenario::calculate`] to get a fresh [`TuitionProjection`].
//!
//! ## Structure
//!
//! ```text
//! Scenario
//! ├── meta: ScenarioMetadata (version, report title, school, timestamps)
//! ├── grades: Vec<GradeLevel> (ordered, as entered)
//! ├── strategic_items: Vec<StrategicItem>
//! ├── rates: RateInputs
//! ├── financial_aid: Dollars
//! └── overrides: TuitionOverrides (grade index -> adjusted tuition)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use tuition_core::scenario::Scenario;
//! use tuition_core::calculations::GradeLevel;
//! use tuition_core::units::Dollars;
//!
//! let mut scenario = Scenario::new("FY27 Tuition Proposal", "Hillside Academy", "Business Office");
//! scenario.add_grade(GradeLevel::new("K", 10, Dollars(10_000.0)));
//! scenario.add_grade(GradeLevel::new("1st", 10, Dollars(11_000.0)));
//! scenario.financial_aid = Dollars(5_000.0);
//!
//! let projection = scenario.calculate().unwrap();
//! assert!((projection.total_current_tuition.0 - 210_000.0).abs() < 1e-6);
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::adjustment::{apply_manual_override, TuitionOverrides};
use crate::calculations::increase::{RateInputs, StrategicItem};
use crate::calculations::projection::{calculate, GradeLevel, TuitionInput, TuitionProjection, MAX_STRATEGIC_ITEMS};
use crate::errors::{ensure_non_negative, CalcError, CalcResult};
use crate::units::Dollars;

/// Current schema version for scenario JSON
pub const SCHEMA_VERSION: &str = "0.1.0";

/// All user-entered inputs for one tuition proposal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub meta: ScenarioMetadata,

    #[serde(default)]
    pub grades: Vec<GradeLevel>,

    #[serde(default)]
    pub strategic_items: Vec<StrategicItem>,

    #[serde(default)]
    pub rates: RateInputs,

    /// Total financial aid (tuition assistance) budget
    #[serde(default)]
    pub financial_aid: Dollars,

    /// Manual per-grade new tuition, applied after the baseline projection
    #[serde(default)]
    pub overrides: TuitionOverrides,
}

impl Scenario {
    /// Create a new empty scenario with default rates and no aid.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tuition_core::scenario::Scenario;
    ///
    /// let scenario = Scenario::new("FY27 Proposal", "Hillside Academy", "J. Rivera");
    /// assert_eq!(scenario.meta.school, "Hillside Academy");
    /// assert!(scenario.grades.is_empty());
    /// ```
    pub fn new(report_title: impl Into<String>, school: impl Into<String>, prepared_by: impl Into<String>) -> Self {
        let now = Utc::now();
        Scenario {
            meta: ScenarioMetadata {
                version: SCHEMA_VERSION.to_string(),
                report_title: report_title.into(),
                school: school.into(),
                prepared_by: prepared_by.into(),
                created: now,
                modified: now,
            },
            grades: Vec::new(),
            strategic_items: Vec::new(),
            rates: RateInputs::default(),
            financial_aid: Dollars::ZERO,
            overrides: TuitionOverrides::new(),
        }
    }

    /// Append a grade level. Returns its index.
    pub fn add_grade(&mut self, grade: GradeLevel) -> usize {
        self.grades.push(grade);
        self.touch();
        self.grades.len() - 1
    }

    /// Remove a grade level by index.
    ///
    /// Overrides for later grades are shifted so they stay attached to the
    /// same grade.
    pub fn remove_grade(&mut self, index: usize) -> Option<GradeLevel> {
        if index >= self.grades.len() {
            return None;
        }
        let grade = self.grades.remove(index);
        self.overrides.shift_after_removal(index);
        self.touch();
        Some(grade)
    }

    /// Append a strategic item. Fails once [`MAX_STRATEGIC_ITEMS`] is reached.
    pub fn add_strategic_item(&mut self, item: StrategicItem) -> CalcResult<usize> {
        if self.strategic_items.len() >= MAX_STRATEGIC_ITEMS {
            return Err(CalcError::invalid_input(
                "strategic_items",
                (self.strategic_items.len() + 1).to_string(),
                format!("At most {} strategic items are supported", MAX_STRATEGIC_ITEMS),
            ));
        }
        self.strategic_items.push(item);
        self.touch();
        Ok(self.strategic_items.len() - 1)
    }

    /// Remove a strategic item by index.
    pub fn remove_strategic_item(&mut self, index: usize) -> Option<StrategicItem> {
        if index >= self.strategic_items.len() {
            return None;
        }
        let item = self.strategic_items.remove(index);
        self.touch();
        Some(item)
    }

    /// Grow or shrink the strategic item list to `count` entries.
    ///
    /// New entries are named "Item N" with zero cost. `count` is capped at
    /// [`MAX_STRATEGIC_ITEMS`]. Returns the resulting length.
    pub fn resize_strategic_items(&mut self, count: usize) -> usize {
        let count = count.min(MAX_STRATEGIC_ITEMS);
        while self.strategic_items.len() < count {
            let n = self.strategic_items.len() + 1;
            self.strategic_items
                .push(StrategicItem::new(format!("Item {}", n), Dollars::ZERO, ""));
        }
        self.strategic_items.truncate(count);
        self.touch();
        count
    }

    /// Set the adjusted new tuition for one grade.
    pub fn set_override(&mut self, grade_index: usize, new_tuition: Dollars) -> CalcResult<()> {
        if grade_index >= self.grades.len() {
            return Err(CalcError::unknown_grade(grade_index, self.grades.len()));
        }
        ensure_non_negative(format!("overrides[{}]", grade_index), new_tuition.0, "Adjusted tuition")?;
        self.overrides.set(grade_index, new_tuition);
        self.touch();
        Ok(())
    }

    /// Drop every manual override.
    pub fn clear_overrides(&mut self) {
        if !self.overrides.is_empty() {
            self.overrides.clear();
            self.touch();
        }
    }

    /// Calculator input for the current state.
    pub fn input(&self) -> TuitionInput {
        TuitionInput {
            grades: self.grades.clone(),
            strategic_items: self.strategic_items.clone(),
            rates: self.rates,
            financial_aid: self.financial_aid,
        }
    }

    /// Validate all inputs, including override indices.
    pub fn validate(&self) -> CalcResult<()> {
        self.input().validate()?;
        self.overrides.validate(self.grades.len())
    }

    /// Baseline projection from the rates, ignoring overrides.
    pub fn calculate_baseline(&self) -> CalcResult<TuitionProjection> {
        calculate(&self.input())
    }

    /// Projection with manual overrides applied (if any).
    pub fn calculate(&self) -> CalcResult<TuitionProjection> {
        self.overrides.validate(self.grades.len())?;
        let baseline = self.calculate_baseline()?;
        if self.overrides.is_empty() {
            return Ok(baseline);
        }
        debug!(overrides = self.overrides.len(), "applying scenario overrides");
        apply_manual_override(&baseline, &self.overrides)
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    /// Encode as pretty JSON.
    pub fn to_json(&self) -> CalcResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Decode from JSON, checking the schema version.
    ///
    /// # Returns
    ///
    /// * `Ok(Scenario)` - Decoded successfully
    /// * `Err(CalcError::VersionMismatch)` - Version is incompatible
    /// * `Err(CalcError::SerializationError)` - Invalid JSON
    pub fn from_json(json: &str) -> CalcResult<Self> {
        let scenario: Scenario = serde_json::from_str(json)?;
        validate_version(&scenario.meta.version)?;
        Ok(scenario)
    }
}

impl Default for Scenario {
    fn default() -> Self {
        Scenario::new("", "", "")
    }
}

/// Descriptive metadata for a scenario.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Title shown on the report (e.g., "FY27 Tuition Proposal")
    #[serde(default)]
    pub report_title: String,

    /// School name
    #[serde(default)]
    pub school: String,

    /// Person or office preparing the proposal
    #[serde(default)]
    pub prepared_by: String,

    /// When the scenario was created
    pub created: DateTime<Utc>,

    /// When the scenario was last modified
    pub modified: DateTime<Utc>,
}

/// Validate that a scenario version is compatible with the current schema.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    let file_parts: Vec<u32> = file_version
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();
    let current_parts: Vec<u32> = SCHEMA_VERSION
        .split('.')
        .filter_map(|p| p.parse().ok())
        .collect();

    if file_parts.is_empty() || current_parts.is_empty() {
        return Err(mismatch());
    }

    // Major version must match
    if file_parts[0] != current_parts[0] {
        return Err(mismatch());
    }

    // 0.x: reject files from a newer minor version
    if current_parts[0] == 0
        && file_parts.len() > 1
        && current_parts.len() > 1
        && file_parts[1] > current_parts[1]
    {
        return Err(mismatch());
    }

    Ok(())
}
