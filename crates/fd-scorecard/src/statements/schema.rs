//! Provider schema normalization.
//!
//! Providers name the same fundamental line item differently depending on
//! the company and its industry. The mapping tables below pin every canonical
//! field to a primary provider name and, where providers are known to drift,
//! a fallback name. [`SchemaNormalizer::normalize`] is the only place these
//! tables are read.

use polars::prelude::*;
use tracing::{debug, warn};

use super::align::parse_date;
use crate::{Result, ScorecardError, types::StatementKind};

/// Canonical name of the reporting date column.
pub const AS_OF_DATE: &str = "as_of_date";

/// Maps one canonical field onto its provider field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    /// Canonical column name used throughout the pipeline
    pub canonical: &'static str,
    /// Provider column tried first
    pub primary: &'static str,
    /// Provider column tried when the primary is absent
    pub fallback: Option<&'static str>,
}

impl FieldMapping {
    const fn new(canonical: &'static str, primary: &'static str) -> Self {
        Self {
            canonical,
            primary,
            fallback: None,
        }
    }

    const fn with_fallback(
        canonical: &'static str,
        primary: &'static str,
        fallback: &'static str,
    ) -> Self {
        Self {
            canonical,
            primary,
            fallback: Some(fallback),
        }
    }

    /// Pick the provider column for this field out of `present`.
    pub fn resolve(&self, kind: StatementKind, present: &[&str]) -> Result<&'static str> {
        if present.contains(&self.primary) {
            return Ok(self.primary);
        }
        match self.fallback {
            Some(fallback) if present.contains(&fallback) => {
                warn!(
                    %kind,
                    canonical = self.canonical,
                    primary = self.primary,
                    fallback,
                    "Primary field absent, using fallback"
                );
                Ok(fallback)
            }
            _ => Err(ScorecardError::SchemaMismatch {
                kind,
                canonical: self.canonical,
                primary: self.primary,
                fallback: self.fallback,
            }),
        }
    }
}

/// Reporting date, shared by all three statements.
pub const DATE_FIELD: FieldMapping = FieldMapping::new(AS_OF_DATE, "asOfDate");

/// Balance sheet value fields.
pub const BALANCE_SHEET_FIELDS: &[FieldMapping] = &[
    FieldMapping::new("total_assets", "TotalAssets"),
    FieldMapping::new("total_debt", "TotalDebt"),
    FieldMapping::new("current_assets", "CurrentAssets"),
    FieldMapping::new("current_liabilities", "CurrentLiabilities"),
    FieldMapping::new("inventory", "Inventory"),
    FieldMapping::new("working_capital", "WorkingCapital"),
    FieldMapping::new("retained_earnings", "RetainedEarnings"),
    FieldMapping::with_fallback(
        "long_term_debt",
        "LongTermDebt",
        "LongTermDebtAndCapitalLeaseObligation",
    ),
];

/// Income statement value fields.
pub const INCOME_STATEMENT_FIELDS: &[FieldMapping] = &[
    FieldMapping::new("operating_income", "OperatingIncome"),
    FieldMapping::new("net_income", "NetIncome"),
    FieldMapping::new("total_revenue", "TotalRevenue"),
    FieldMapping::new("cost_of_revenue", "CostOfRevenue"),
];

/// Cash flow statement value fields.
pub const CASH_FLOW_FIELDS: &[FieldMapping] = &[FieldMapping::with_fallback(
    "operating_cash_flow",
    "OperatingCashFlow",
    "CashFlowsfromusedinOperatingActivitiesDirect",
)];

impl StatementKind {
    /// Value fields carried by this statement, excluding the date.
    #[must_use]
    pub const fn fields(self) -> &'static [FieldMapping] {
        match self {
            Self::BalanceSheet => BALANCE_SHEET_FIELDS,
            Self::IncomeStatement => INCOME_STATEMENT_FIELDS,
            Self::CashFlow => CASH_FLOW_FIELDS,
        }
    }

    /// Canonical column names of this statement, date first.
    pub fn canonical_columns(self) -> impl Iterator<Item = &'static str> {
        std::iter::once(AS_OF_DATE).chain(self.fields().iter().map(|f| f.canonical))
    }
}

/// One statement's rows under canonical column names.
///
/// The frame holds `as_of_date` as an ISO `YYYY-MM-DD` string followed by
/// the statement's value fields as `f64`.
#[derive(Debug, Clone)]
pub struct StatementSeries {
    kind: StatementKind,
    frame: DataFrame,
}

impl StatementSeries {
    /// Wrap a frame that already uses canonical column names.
    pub fn from_canonical(kind: StatementKind, frame: DataFrame) -> Result<Self> {
        let present = frame.get_column_names();
        if let Some(missing) = kind
            .canonical_columns()
            .find(|c| !present.iter().any(|name| name.as_str() == *c))
        {
            return Err(ScorecardError::MissingColumn(format!("{missing} ({kind})")));
        }
        Ok(Self { kind, frame })
    }

    /// Statement kind of these rows.
    #[must_use]
    pub const fn kind(&self) -> StatementKind {
        self.kind
    }

    /// The underlying frame.
    #[must_use]
    pub const fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Consume the series, returning the underlying frame.
    #[must_use]
    pub fn into_frame(self) -> DataFrame {
        self.frame
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frame.height()
    }

    /// Whether the series holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }
}

/// Renames provider columns onto the canonical schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaNormalizer;

impl SchemaNormalizer {
    /// Normalize a raw provider frame for the given statement kind.
    ///
    /// Columns not named by the mapping table are dropped. Fails with
    /// [`ScorecardError::SchemaMismatch`] when a field has neither its primary
    /// nor its fallback column.
    pub fn normalize(&self, raw: &DataFrame, kind: StatementKind) -> Result<StatementSeries> {
        let names = raw.get_column_names();
        let present: Vec<&str> = names.iter().map(|name| name.as_str()).collect();

        let date_source = DATE_FIELD.resolve(kind, &present)?;
        let dates = iso_dates(raw, date_source)?;

        let exprs = kind
            .fields()
            .iter()
            .map(|mapping| {
                let source = mapping.resolve(kind, &present)?;
                Ok(col(source)
                    .cast(DataType::Float64)
                    .alias(mapping.canonical))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut frame = raw.clone().lazy().select(exprs).collect()?;
        frame.insert_column(0, dates)?;
        debug!(%kind, rows = frame.height(), "Normalized statement");

        Ok(StatementSeries { kind, frame })
    }
}

/// Render the provider date column as ISO `YYYY-MM-DD` strings.
///
/// Strings carrying a time-of-day suffix collapse onto their calendar date,
/// so every statement keys the same period identically.
fn iso_dates(raw: &DataFrame, source: &str) -> Result<Column> {
    let column = raw.column(source)?;
    let text = match column.dtype() {
        DataType::String => column.clone(),
        DataType::Date => column.cast(&DataType::String)?,
        DataType::Datetime(_, _) => column.cast(&DataType::Date)?.cast(&DataType::String)?,
        other => {
            return Err(ScorecardError::InvalidParameter(format!(
                "date column `{source}` has unsupported type {other}"
            )));
        }
    };

    let dates = text
        .str()?
        .into_iter()
        .map(|value| value.map(|v| parse_date(v).map(|d| d.to_string())).transpose())
        .collect::<Result<Vec<Option<String>>>>()?;

    Ok(Column::new(AS_OF_DATE.into(), dates))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use chrono::NaiveDate;

    #[test]
    fn test_every_kind_has_a_table() {
        assert_eq!(StatementKind::BalanceSheet.fields().len(), 8);
        assert_eq!(StatementKind::IncomeStatement.fields().len(), 4);
        assert_eq!(StatementKind::CashFlow.fields().len(), 1);
    }

    #[test]
    fn test_canonical_names_are_unique_across_statements() {
        let mut names: Vec<&str> = [
            StatementKind::BalanceSheet,
            StatementKind::IncomeStatement,
            StatementKind::CashFlow,
        ]
        .iter()
        .flat_map(|kind| kind.fields().iter().map(|f| f.canonical))
        .collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
    }

    #[test]
    fn test_normalize_balance_sheet_primary_names() {
        let raw = fixtures::balance_sheet_raw();
        let series = SchemaNormalizer
            .normalize(&raw, StatementKind::BalanceSheet)
            .unwrap();

        assert_eq!(series.kind(), StatementKind::BalanceSheet);
        assert_eq!(series.len(), 3);

        let names = series.frame().get_column_names();
        let columns: Vec<&str> = names.iter().map(|name| name.as_str()).collect();
        let expected: Vec<&str> = StatementKind::BalanceSheet.canonical_columns().collect();
        assert_eq!(columns, expected);

        let total_assets = series.frame().column("total_assets").unwrap().f64().unwrap();
        assert_eq!(total_assets.get(0), Some(1000.0));
    }

    #[test]
    fn test_normalize_uses_fallback_long_term_debt() {
        let raw = df![
            "asOfDate" => ["2023-12-31"],
            "TotalAssets" => [1000.0],
            "TotalDebt" => [400.0],
            "CurrentAssets" => [300.0],
            "CurrentLiabilities" => [150.0],
            "Inventory" => [50.0],
            "WorkingCapital" => [200.0],
            "RetainedEarnings" => [150.0],
            "LongTermDebtAndCapitalLeaseObligation" => [320.0]
        ]
        .unwrap();

        let series = SchemaNormalizer
            .normalize(&raw, StatementKind::BalanceSheet)
            .unwrap();
        let ltd = series.frame().column("long_term_debt").unwrap().f64().unwrap();
        assert_eq!(ltd.get(0), Some(320.0));
    }

    #[test]
    fn test_normalize_prefers_primary_when_both_present() {
        let raw = df![
            "asOfDate" => ["2023-12-31"],
            "OperatingCashFlow" => [90.0],
            "CashFlowsfromusedinOperatingActivitiesDirect" => [75.0]
        ]
        .unwrap();

        let series = SchemaNormalizer
            .normalize(&raw, StatementKind::CashFlow)
            .unwrap();
        let ocf = series
            .frame()
            .column("operating_cash_flow")
            .unwrap()
            .f64()
            .unwrap();
        assert_eq!(ocf.get(0), Some(90.0));
    }

    #[test]
    fn test_normalize_cash_flow_fallback() {
        let raw = df![
            "asOfDate" => ["2023-12-31"],
            "CashFlowsfromusedinOperatingActivitiesDirect" => [75.0]
        ]
        .unwrap();

        let series = SchemaNormalizer
            .normalize(&raw, StatementKind::CashFlow)
            .unwrap();
        let ocf = series
            .frame()
            .column("operating_cash_flow")
            .unwrap()
            .f64()
            .unwrap();
        assert_eq!(ocf.get(0), Some(75.0));
    }

    #[test]
    fn test_normalize_schema_mismatch() {
        let raw = df![
            "asOfDate" => ["2023-12-31"],
            "FreeCashFlow" => [75.0]
        ]
        .unwrap();

        let err = SchemaNormalizer
            .normalize(&raw, StatementKind::CashFlow)
            .unwrap_err();
        match err {
            ScorecardError::SchemaMismatch {
                kind,
                canonical,
                fallback,
                ..
            } => {
                assert_eq!(kind, StatementKind::CashFlow);
                assert_eq!(canonical, "operating_cash_flow");
                assert_eq!(
                    fallback,
                    Some("CashFlowsfromusedinOperatingActivitiesDirect")
                );
            }
            other => panic!("expected schema mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_normalize_missing_date_column() {
        let raw = df!["OperatingCashFlow" => [90.0]].unwrap();
        assert!(matches!(
            SchemaNormalizer.normalize(&raw, StatementKind::CashFlow),
            Err(ScorecardError::SchemaMismatch {
                canonical: AS_OF_DATE,
                ..
            })
        ));
    }

    #[test]
    fn test_normalize_casts_integers_and_dates() {
        let raw = df![
            "asOfDate" => [
                NaiveDate::from_ymd_opt(2022, 12, 31).unwrap(),
                NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
            ],
            "OperatingCashFlow" => [90i64, 85i64]
        ]
        .unwrap();

        let series = SchemaNormalizer
            .normalize(&raw, StatementKind::CashFlow)
            .unwrap();
        let dates = series.frame().column(AS_OF_DATE).unwrap().str().unwrap();
        assert_eq!(dates.get(1), Some("2023-12-31"));
        let ocf = series
            .frame()
            .column("operating_cash_flow")
            .unwrap()
            .f64()
            .unwrap();
        assert_eq!(ocf.get(0), Some(90.0));
    }

    #[test]
    fn test_normalize_truncates_time_of_day() {
        let raw = df![
            "asOfDate" => [Some("2023-12-31 00:00:00"), Some("2022-12-31T00:00:00"), None],
            "OperatingCashFlow" => [90.0, 85.0, 80.0]
        ]
        .unwrap();

        let series = SchemaNormalizer
            .normalize(&raw, StatementKind::CashFlow)
            .unwrap();
        let dates = series.frame().column(AS_OF_DATE).unwrap().str().unwrap();
        assert_eq!(dates.get(0), Some("2023-12-31"));
        assert_eq!(dates.get(1), Some("2022-12-31"));
        assert_eq!(dates.get(2), None);
    }

    #[test]
    fn test_normalize_rejects_unparseable_date() {
        let raw = df![
            "asOfDate" => ["Q4 2023"],
            "OperatingCashFlow" => [90.0]
        ]
        .unwrap();

        assert!(matches!(
            SchemaNormalizer.normalize(&raw, StatementKind::CashFlow),
            Err(ScorecardError::InvalidDate(_))
        ));
    }

    #[test]
    fn test_from_canonical_rejects_missing_columns() {
        let frame = df![AS_OF_DATE => ["2023-12-31"]].unwrap();
        assert!(matches!(
            StatementSeries::from_canonical(StatementKind::CashFlow, frame),
            Err(ScorecardError::MissingColumn(_))
        ));
    }
}
