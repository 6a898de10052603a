//! # tuition_core - Tuition Projection Engine
//!
//! `tuition_core` turns a school's enrollment, current tuition, inflation and
//! productivity rates, strategic-initiative costs and financial aid budget
//! into a proposed tuition increase, per-grade new tuition, revenue totals and
//! the tuition assistance ratio. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Stateless**: Pure functions that take input and return results
//! - **Never divides by zero**: A zero denominator yields 0, not an error
//! - **Validate at the edge**: `validate()` rejects negative amounts before
//!   they reach the arithmetic
//! - **JSON-First**: All types implement Serialize/Deserialize
//!
//! ## Quick Start
//!
//! ```rust
//! use tuition_core::calculations::{calculate, GradeLevel, RateInputs, TuitionInput};
//! use tuition_core::units::{Dollars, Percent};
//!
//! let input = TuitionInput {
//!     grades: vec![GradeLevel::new("K", 10, Dollars(10_000.0))],
//!     strategic_items: vec![],
//!     rates: RateInputs::new(Percent(3.0), Percent(2.0)),
//!     financial_aid: Dollars(5_000.0),
//! };
//!
//! let projection = calculate(&input).unwrap();
//! let json = serde_json::to_string_pretty(&projection).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Increase percentages, projection, manual adjustment
//! - [`scenario`] - Caller-owned container for user-entered inputs
//! - [`units`] - `Dollars` and `Percent` wrappers
//! - [`errors`] - Structured error types

pub mod calculations;
pub mod errors;
pub mod scenario;
pub mod units;

// Re-export commonly used types at crate root for convenience
pub use calculations::{TuitionInput, TuitionOverrides, TuitionProjection};
pub use errors::{CalcError, CalcResult};
pub use scenario::{Scenario, ScenarioMetadata};
pub use units::{Dollars, Percent};
