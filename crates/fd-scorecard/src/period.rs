//! Typed period rows.
//!
//! The frame stages work column-wise; once ratios and Z-scores are attached
//! the merged table is materialized into [`PeriodMetrics`], one per period,
//! for the rating and trend stages.

use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;
use std::collections::HashMap;

use crate::{
    Result, ScorecardError,
    scores::{CreditRating, TrendSignals},
    statements::{AS_OF_DATE, align::parse_date},
};

/// One aligned reporting period.
///
/// Fields are `None` where the owning statement did not report the period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergedPeriodRow {
    /// End of the reporting period
    pub as_of_date: NaiveDate,
    /// Total assets
    pub total_assets: Option<f64>,
    /// Total debt
    pub total_debt: Option<f64>,
    /// Current assets
    pub current_assets: Option<f64>,
    /// Current liabilities
    pub current_liabilities: Option<f64>,
    /// Inventory
    pub inventory: Option<f64>,
    /// Working capital
    pub working_capital: Option<f64>,
    /// Retained earnings
    pub retained_earnings: Option<f64>,
    /// Long-term debt
    pub long_term_debt: Option<f64>,
    /// Operating income
    pub operating_income: Option<f64>,
    /// Net income
    pub net_income: Option<f64>,
    /// Total revenue
    pub total_revenue: Option<f64>,
    /// Cost of revenue
    pub cost_of_revenue: Option<f64>,
    /// Operating cash flow
    pub operating_cash_flow: Option<f64>,
}

/// Ratios derived from a single period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Ratios {
    /// Total assets less total debt
    pub book_value_equity: Option<f64>,
    /// Return on assets
    pub roa: Option<f64>,
    /// Debt to book value equity
    pub debt_to_equity: Option<f64>,
    /// Quick ratio
    pub quick_ratio: Option<f64>,
    /// Total assets to total debt
    pub current_ratio: Option<f64>,
    /// Operating cash flow to total debt
    pub cf_to_debt_ratio: Option<f64>,
    /// Gross profit to net income
    pub gross_margin: Option<f64>,
    /// Revenue to total assets
    pub asset_turnover_ratio: Option<f64>,
}

/// The four Altman ratios behind the Z-score.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct AltmanComponents {
    /// Working capital / total assets
    pub x1: Option<f64>,
    /// Retained earnings / total assets
    pub x2: Option<f64>,
    /// Operating income / total assets
    pub x3: Option<f64>,
    /// Book value equity / total debt
    pub x4: Option<f64>,
}

/// A period with its ratios and Z-score attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodMetrics {
    /// Aligned statement fields
    #[serde(flatten)]
    pub period: MergedPeriodRow,
    /// Derived ratios
    #[serde(flatten)]
    pub ratios: Ratios,
    /// Z-score components
    pub altman: AltmanComponents,
    /// Altman Z-score
    pub z_score: Option<f64>,
}

/// A fully scored period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredPeriodRow {
    /// Period fields, ratios and Z-score
    #[serde(flatten)]
    pub metrics: PeriodMetrics,
    /// Rating bucket of the Z-score
    pub credit_rating: Option<CreditRating>,
    /// Changes against the preceding period
    pub trend: Option<TrendSignals>,
    /// Piotroski F-score, after any split adjustment
    pub f_score: Option<u8>,
}

impl ScoredPeriodRow {
    /// Reporting date of this period.
    #[must_use]
    pub const fn as_of_date(&self) -> NaiveDate {
        self.metrics.period.as_of_date
    }
}

const VALUE_COLUMNS: &[&str] = &[
    "total_assets",
    "total_debt",
    "current_assets",
    "current_liabilities",
    "inventory",
    "working_capital",
    "retained_earnings",
    "long_term_debt",
    "operating_income",
    "net_income",
    "total_revenue",
    "cost_of_revenue",
    "operating_cash_flow",
    "book_value_equity",
    "roa",
    "debt_to_equity",
    "quick_ratio",
    "current_ratio",
    "cf_to_debt_ratio",
    "gross_margin",
    "asset_turnover_ratio",
    "altman_x1",
    "altman_x2",
    "altman_x3",
    "altman_x4",
    "altman_z_score",
];

/// Column-wise view of a scored frame.
struct FrameColumns {
    columns: HashMap<&'static str, Vec<Option<f64>>>,
}

impl FrameColumns {
    fn read(frame: &DataFrame) -> Result<Self> {
        let columns = VALUE_COLUMNS
            .iter()
            .map(|&name| {
                let values: Vec<Option<f64>> = frame.column(name)?.f64()?.into_iter().collect();
                Ok((name, values))
            })
            .collect::<Result<_>>()?;
        Ok(Self { columns })
    }

    fn at(&self, name: &str, row: usize) -> Option<f64> {
        self.columns
            .get(name)
            .and_then(|values| values.get(row).copied().flatten())
    }
}

impl PeriodMetrics {
    /// Materialize a frame carrying the merged fields, ratios and Z-score.
    pub fn from_frame(frame: &DataFrame) -> Result<Vec<Self>> {
        let dates = frame
            .column(AS_OF_DATE)?
            .str()?
            .into_iter()
            .map(|value| {
                value
                    .ok_or_else(|| ScorecardError::InvalidDate("null reporting date".to_string()))
                    .and_then(parse_date)
            })
            .collect::<Result<Vec<_>>>()?;
        let c = FrameColumns::read(frame)?;

        Ok(dates
            .into_iter()
            .enumerate()
            .map(|(row, as_of_date)| Self {
                period: MergedPeriodRow {
                    as_of_date,
                    total_assets: c.at("total_assets", row),
                    total_debt: c.at("total_debt", row),
                    current_assets: c.at("current_assets", row),
                    current_liabilities: c.at("current_liabilities", row),
                    inventory: c.at("inventory", row),
                    working_capital: c.at("working_capital", row),
                    retained_earnings: c.at("retained_earnings", row),
                    long_term_debt: c.at("long_term_debt", row),
                    operating_income: c.at("operating_income", row),
                    net_income: c.at("net_income", row),
                    total_revenue: c.at("total_revenue", row),
                    cost_of_revenue: c.at("cost_of_revenue", row),
                    operating_cash_flow: c.at("operating_cash_flow", row),
                },
                ratios: Ratios {
                    book_value_equity: c.at("book_value_equity", row),
                    roa: c.at("roa", row),
                    debt_to_equity: c.at("debt_to_equity", row),
                    quick_ratio: c.at("quick_ratio", row),
                    current_ratio: c.at("current_ratio", row),
                    cf_to_debt_ratio: c.at("cf_to_debt_ratio", row),
                    gross_margin: c.at("gross_margin", row),
                    asset_turnover_ratio: c.at("asset_turnover_ratio", row),
                },
                altman: AltmanComponents {
                    x1: c.at("altman_x1", row),
                    x2: c.at("altman_x2", row),
                    x3: c.at("altman_x3", row),
                    x4: c.at("altman_x4", row),
                },
                z_score: c.at("altman_z_score", row),
            })
            .collect())
    }
}
