//! Core trait definitions for frame-based scoring stages.
//!
//! The ratio and Z-score stages implement [`ScoringStage`], which appends
//! derived columns to the merged period table.

use crate::{Result, ScorecardError};
use polars::prelude::*;

/// A stage that derives new columns from the merged period table.
pub trait ScoringStage: Send + Sync + std::fmt::Debug {
    /// Unique identifier for this stage.
    fn name(&self) -> &str;

    /// Human-readable description of what this stage computes.
    fn description(&self) -> &str;

    /// Columns required in the input frame.
    fn required_columns(&self) -> &[&str];

    /// Columns this stage appends.
    fn output_columns(&self) -> &[&str];

    /// Append the derived columns.
    ///
    /// Rows are never filtered or reordered; a row missing an input simply
    /// gets a null in the derived column.
    fn apply(&self, data: LazyFrame) -> LazyFrame;

    /// Check that every required column exists in `data`.
    fn validate(&self, data: &DataFrame) -> Result<()> {
        let present = data.get_column_names();
        match self
            .required_columns()
            .iter()
            .find(|required| !present.iter().any(|name| name.as_str() == **required))
        {
            Some(missing) => Err(ScorecardError::MissingColumn(format!(
                "{missing} (needed by {})",
                self.name()
            ))),
            None => Ok(()),
        }
    }
}

/// Marker trait for stage configuration types.
pub trait StageConfig: Default + Clone + Send + Sync + std::fmt::Debug {}

/// Blanket implementation for any type that satisfies the trait bounds.
impl<T: Default + Clone + Send + Sync + std::fmt::Debug> StageConfig for T {}

/// A stage that supports runtime configuration.
pub trait ConfigurableStage: ScoringStage {
    /// Configuration type for this stage.
    type Config: StageConfig;

    /// Create a new stage with the given configuration.
    fn with_config(config: Self::Config) -> Self;

    /// Returns the current configuration.
    fn config(&self) -> &Self::Config;
}

/// Divide two expressions, yielding null when the denominator is zero.
///
/// Null operands already propagate to a null quotient.
pub fn checked_div(numerator: Expr, denominator: Expr) -> Expr {
    when(denominator.clone().eq(lit(0.0)))
        .then(lit(NULL).cast(DataType::Float64))
        .otherwise(numerator / denominator)
}
