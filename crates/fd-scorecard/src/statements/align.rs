//! Period alignment of the three statement series.
//!
//! Each series is cleaned independently (incomplete rows dropped, duplicate
//! dates collapsed to the last observation, sorted by date), then the series
//! are outer-joined on `as_of_date` so that a period reported by any one
//! statement survives into the merged table.

use chrono::NaiveDate;
use polars::prelude::*;
use tracing::{debug, warn};

use super::schema::{AS_OF_DATE, StatementSeries};
use crate::{Result, ScorecardError, types::StatementKind};

const ROW_INDEX: &str = "__row_index";

/// The merged, period-indexed table.
///
/// One row per distinct `as_of_date`, ascending. Fields of a statement that
/// did not report a period are null on that row.
#[derive(Debug, Clone)]
pub struct MergedPeriods {
    frame: DataFrame,
}

impl MergedPeriods {
    /// The underlying frame.
    #[must_use]
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Consume the table, returning the underlying frame.
    #[must_use]
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Number of aligned periods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    /// Whether no statement reported any complete period.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// Reporting dates, ascending.
    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        self.frame
            .column(AS_OF_DATE)?
            .str()?
            .into_iter()
            .map(|value| {
                value
                    .ok_or_else(|| ScorecardError::InvalidDate("null reporting date".to_string()))
                    .and_then(parse_date)
            })
            .collect()
    }
}

/// Parse an ISO reporting date, ignoring any time-of-day suffix.
pub(crate) fn parse_date(value: &str) -> Result<NaiveDate> {
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map_err(|e| ScorecardError::InvalidDate(format!("{value}: {e}")))
}

/// Cleans and merges statement series on their reporting date.
#[derive(Debug, Clone, Copy, Default)]
pub struct PeriodAligner;

impl PeriodAligner {
    /// Drop incomplete rows, keep the last row per date and sort ascending.
    ///
    /// A value is missing when it is null or NaN.
    pub fn clean(&self, series: &StatementSeries) -> Result<StatementSeries> {
        let kind = series.kind();
        let complete = kind
            .fields()
            .iter()
            .map(|f| col(f.canonical).is_not_null().and(col(f.canonical).is_not_nan()))
            .fold(col(AS_OF_DATE).is_not_null(), |acc, e| acc.and(e));

        let complete = series.frame().clone().lazy().filter(complete).collect()?;
        let incomplete = series.len() - complete.height();
        if incomplete > 0 {
            warn!(%kind, rows = incomplete, "Dropping incomplete statement rows");
        }

        let frame = complete
            .lazy()
            .with_row_index(ROW_INDEX, None)
            .filter(col(ROW_INDEX).eq(col(ROW_INDEX).max().over([col(AS_OF_DATE)])))
            .drop([ROW_INDEX])
            .sort([AS_OF_DATE], SortMultipleOptions::default())
            .collect()?;

        debug!(
            %kind,
            rows_in = series.len(),
            rows_out = frame.height(),
            "Cleaned statement series"
        );

        StatementSeries::from_canonical(kind, frame)
    }

    /// Clean each series and outer-join them as
    /// `(income statement ⊕ cash flow) ⊕ balance sheet`.
    pub fn align(
        &self,
        balance_sheet: &StatementSeries,
        income_statement: &StatementSeries,
        cash_flow: &StatementSeries,
    ) -> Result<MergedPeriods> {
        expect_kind(balance_sheet, StatementKind::BalanceSheet)?;
        expect_kind(income_statement, StatementKind::IncomeStatement)?;
        expect_kind(cash_flow, StatementKind::CashFlow)?;

        let balance_sheet = self.clean(balance_sheet)?;
        let income_statement = self.clean(income_statement)?;
        let cash_flow = self.clean(cash_flow)?;

        let frame = income_statement
            .into_frame()
            .lazy()
            .join(
                cash_flow.into_frame().lazy(),
                [col(AS_OF_DATE)],
                [col(AS_OF_DATE)],
                outer_join(),
            )
            .join(
                balance_sheet.into_frame().lazy(),
                [col(AS_OF_DATE)],
                [col(AS_OF_DATE)],
                outer_join(),
            )
            .sort([AS_OF_DATE], SortMultipleOptions::default())
            .collect()?;

        debug!(periods = frame.height(), "Aligned statement periods");

        Ok(MergedPeriods { frame })
    }
}

fn outer_join() -> JoinArgs {
    JoinArgs::new(JoinType::Full).with_coalesce(JoinCoalesce::CoalesceColumns)
}

fn expect_kind(series: &StatementSeries, expected: StatementKind) -> Result<()> {
    if series.kind() == expected {
        Ok(())
    } else {
        Err(ScorecardError::InvalidParameter(format!(
            "expected {expected} series, got {}",
            series.kind()
        )))
    }
}
