//! Altman Z-Score stage.
//!
//! Uses the private-firm coefficient set, computed per period from that
//! period's own row. A period with an undefined component gets an undefined
//! score without affecting its neighbours.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::traits::{ConfigurableStage, ScoringStage, checked_div};

/// Coefficients for the Z-score.
///
/// Defaults are Altman's private-firm variant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZScoreConfig {
    /// Weight of working capital / total assets
    pub working_capital_weight: f64,
    /// Weight of retained earnings / total assets
    pub retained_earnings_weight: f64,
    /// Weight of operating income / total assets
    pub operating_income_weight: f64,
    /// Weight of book value equity / total debt
    pub book_equity_weight: f64,
    /// Constant term
    pub constant: f64,
}

impl Default for ZScoreConfig {
    fn default() -> Self {
        Self {
            working_capital_weight: 6.56,
            retained_earnings_weight: 3.26,
            operating_income_weight: 6.72,
            book_equity_weight: 1.05,
            constant: 3.25,
        }
    }
}

/// Altman Z-Score stage.
///
/// ```text
/// X1 = working_capital / total_assets
/// X2 = retained_earnings / total_assets
/// X3 = operating_income / total_assets
/// X4 = book_value_equity / total_debt
/// Z  = 6.56*X1 + 3.26*X2 + 6.72*X3 + 1.05*X4 + 3.25
/// ```
///
/// Expects `book_value_equity` from the ratio stage.
#[derive(Debug, Clone, Default)]
pub struct ZScoreCalculator {
    config: ZScoreConfig,
}

impl ScoringStage for ZScoreCalculator {
    fn name(&self) -> &str {
        "altman_z_score"
    }

    fn description(&self) -> &str {
        "Altman Z-Score (private-firm coefficients) from balance sheet and operating ratios"
    }

    fn required_columns(&self) -> &[&str] {
        &[
            "working_capital",
            "retained_earnings",
            "operating_income",
            "book_value_equity",
            "total_assets",
            "total_debt",
        ]
    }

    fn output_columns(&self) -> &[&str] {
        &[
            "altman_x1",
            "altman_x2",
            "altman_x3",
            "altman_x4",
            "altman_z_score",
        ]
    }

    fn apply(&self, data: LazyFrame) -> LazyFrame {
        let c = &self.config;

        data.with_columns([
            checked_div(col("working_capital"), col("total_assets")).alias("altman_x1"),
            checked_div(col("retained_earnings"), col("total_assets")).alias("altman_x2"),
            checked_div(col("operating_income"), col("total_assets")).alias("altman_x3"),
            checked_div(col("book_value_equity"), col("total_debt")).alias("altman_x4"),
        ])
        .with_column(
            (lit(c.working_capital_weight) * col("altman_x1")
                + lit(c.retained_earnings_weight) * col("altman_x2")
                + lit(c.operating_income_weight) * col("altman_x3")
                + lit(c.book_equity_weight) * col("altman_x4")
                + lit(c.constant))
            .alias("altman_z_score"),
        )
    }
}

impl ConfigurableStage for ZScoreCalculator {
    type Config = ZScoreConfig;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn balance_sheet() -> DataFrame {
        df![
            "total_assets" => [Some(1000.0), Some(1100.0), Some(1000.0)],
            "total_debt" => [Some(400.0), Some(380.0), Some(0.0)],
            "working_capital" => [Some(200.0), Some(210.0), Some(200.0)],
            "retained_earnings" => [Some(150.0), Some(180.0), None],
            "operating_income" => [Some(100.0), Some(120.0), Some(100.0)],
            "book_value_equity" => [Some(600.0), Some(720.0), Some(1000.0)]
        ]
        .unwrap()
    }

    #[test]
    fn test_altman_z_metadata() {
        let stage = ZScoreCalculator::default();
        assert_eq!(stage.name(), "altman_z_score");
        assert_eq!(stage.required_columns().len(), 6);
        assert_eq!(stage.output_columns().len(), 5);
        assert_eq!(stage.config(), &ZScoreConfig::default());
    }

    #[test]
    fn test_altman_z_reference_period() {
        let result = ZScoreCalculator::default()
            .apply(balance_sheet().lazy())
            .collect()
            .unwrap();

        let x = |name: &str| result.column(name).unwrap().f64().unwrap().get(0).unwrap();
        assert_relative_eq!(x("altman_x1"), 0.2);
        assert_relative_eq!(x("altman_x2"), 0.15);
        assert_relative_eq!(x("altman_x3"), 0.1);
        assert_relative_eq!(x("altman_x4"), 1.5);

        // 1.312 + 0.489 + 0.672 + 1.575 + 3.25
        assert_relative_eq!(x("altman_z_score"), 7.298, epsilon = 1e-9);
    }

    #[test]
    fn test_altman_z_undefined_is_isolated() {
        let result = ZScoreCalculator::default()
            .apply(balance_sheet().lazy())
            .collect()
            .unwrap();
        let z = result.column("altman_z_score").unwrap().f64().unwrap();

        assert!(z.get(0).is_some());
        assert!(z.get(1).is_some());
        // Zero debt and missing retained earnings
        assert_eq!(z.get(2), None);
        let x4 = result.column("altman_x4").unwrap().f64().unwrap();
        assert_eq!(x4.get(2), None);
    }

    #[test]
    fn test_altman_z_custom_coefficients() {
        let stage = ZScoreCalculator::with_config(ZScoreConfig {
            working_capital_weight: 1.0,
            retained_earnings_weight: 1.0,
            operating_income_weight: 1.0,
            book_equity_weight: 1.0,
            constant: 0.0,
        });
        let result = stage.apply(balance_sheet().lazy()).collect().unwrap();
        let z = result.column("altman_z_score").unwrap().f64().unwrap();

        assert_relative_eq!(z.get(0).unwrap(), 0.2 + 0.15 + 0.1 + 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_config_deserializes_partial_overrides() {
        let config: ZScoreConfig = serde_json::from_str(r#"{"constant": 0.0}"#).unwrap();
        assert_eq!(config.constant, 0.0);
        assert_eq!(config.working_capital_weight, 6.56);
    }
}
