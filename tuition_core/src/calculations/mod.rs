//! # Tuition Calculations
//!
//! Every calculation follows the pattern:
//!
//! - `*Input` - Input parameters (JSON-serializable)
//! - `*Projection` / `*Table` - Results (JSON-serializable)
//! - Pure functions with no I/O and no hidden state
//!
//! Divisions never fail: a zero denominator yields 0. Only the `validate()`
//! methods return errors.
//!
//! ## Available Calculations
//!
//! - [`increase`] - Average tuition, OTI, strategic items percentage, final increase
//! - [`projection`] - Per-grade new tuition, revenue totals, assistance ratio
//! - [`adjustment`] - Manual per-grade overrides and before/after comparison

pub mod adjustment;
pub mod increase;
pub mod projection;

// Re-export commonly used types
pub use adjustment::{apply_manual_override, compare_adjustments, GradeAdjustment, TuitionOverrides};
pub use increase::{
    average_tuition, final_increase_pct, operations_increase_pct, strategic_items_pct, RateInputs,
    StrategicItem,
};
pub use projection::{
    calculate, project_tuition, tuition_assistance_ratio, GradeLevel, GradeProjection, TuitionInput,
    TuitionProjection, TuitionTable, MAX_STRATEGIC_ITEMS,
};
