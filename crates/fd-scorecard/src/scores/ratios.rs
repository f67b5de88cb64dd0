//! Per-period financial ratios.
//!
//! All ratios are computed row by row from the merged period table. A zero
//! or missing denominator yields a null ratio for that period only.

use polars::prelude::*;

use crate::traits::{ScoringStage, checked_div};

/// Financial ratio stage.
///
/// ```text
/// book_value_equity    = total_assets - total_debt
/// roa                  = net_income / total_assets
/// debt_to_equity       = total_debt / book_value_equity
/// quick_ratio          = (current_assets - inventory) / current_liabilities
/// current_ratio        = total_assets / total_debt
/// cf_to_debt_ratio     = operating_cash_flow / total_debt
/// gross_margin         = (total_revenue - cost_of_revenue) / net_income
/// asset_turnover_ratio = total_revenue / total_assets
/// ```
///
/// `current_ratio` is assets over debt, not current assets over current
/// liabilities, and `gross_margin` is scaled by net income rather than
/// revenue. Both feed the F-score trend signals in this form.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatioEngine;

impl ScoringStage for RatioEngine {
    fn name(&self) -> &str {
        "ratios"
    }

    fn description(&self) -> &str {
        "Book value, profitability, leverage, liquidity and efficiency ratios"
    }

    fn required_columns(&self) -> &[&str] {
        &[
            "total_assets",
            "total_debt",
            "net_income",
            "current_assets",
            "inventory",
            "current_liabilities",
            "operating_cash_flow",
            "total_revenue",
            "cost_of_revenue",
        ]
    }

    fn output_columns(&self) -> &[&str] {
        &[
            "book_value_equity",
            "roa",
            "debt_to_equity",
            "quick_ratio",
            "current_ratio",
            "cf_to_debt_ratio",
            "gross_margin",
            "asset_turnover_ratio",
        ]
    }

    fn apply(&self, data: LazyFrame) -> LazyFrame {
        let book_value_equity = || col("total_assets") - col("total_debt");

        data.with_columns([
            book_value_equity().alias("book_value_equity"),
            checked_div(col("net_income"), col("total_assets")).alias("roa"),
            checked_div(col("total_debt"), book_value_equity()).alias("debt_to_equity"),
            checked_div(
                col("current_assets") - col("inventory"),
                col("current_liabilities"),
            )
            .alias("quick_ratio"),
            checked_div(col("total_assets"), col("total_debt")).alias("current_ratio"),
            checked_div(col("operating_cash_flow"), col("total_debt")).alias("cf_to_debt_ratio"),
            checked_div(
                col("total_revenue") - col("cost_of_revenue"),
                col("net_income"),
            )
            .alias("gross_margin"),
            checked_div(col("total_revenue"), col("total_assets")).alias("asset_turnover_ratio"),
        ])
    }
}
