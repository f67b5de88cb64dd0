//! Data source traits and an in-memory implementation.
//!
//! - [`FundamentalDataSource`] - Raw balance sheet, income statement and cash flow frames
//! - [`PriceHistorySource`] - Daily close / adjusted close history
//! - [`InMemorySource`] - Both, backed by preloaded frames
//! - [`StatementBundle`] - JSON file format that loads into an [`InMemorySource`]

use chrono::NaiveDate;
use polars::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fmt::Debug;
use std::path::Path;
use tracing::debug;

use crate::{
    Result, ScorecardError,
    types::{PriceObservation, ReportingFrequency, StatementKind, Symbol},
};

/// Provider of raw fundamental statements.
///
/// Frames are returned under the provider's own column names, one row per
/// reported period, with the period date in `asOfDate`.
pub trait FundamentalDataSource: Send + Sync + Debug {
    /// Returns the name of this source.
    fn name(&self) -> &str;

    /// Fetches the balance sheet.
    fn balance_sheet(&self, symbol: &Symbol, frequency: ReportingFrequency) -> Result<DataFrame>;

    /// Fetches the income statement.
    fn income_statement(
        &self,
        symbol: &Symbol,
        frequency: ReportingFrequency,
    ) -> Result<DataFrame>;

    /// Fetches the cash flow statement.
    fn cash_flow(&self, symbol: &Symbol, frequency: ReportingFrequency) -> Result<DataFrame>;

    /// Fetches a statement by kind.
    fn statement(
        &self,
        symbol: &Symbol,
        frequency: ReportingFrequency,
        kind: StatementKind,
    ) -> Result<DataFrame> {
        match kind {
            StatementKind::BalanceSheet => self.balance_sheet(symbol, frequency),
            StatementKind::IncomeStatement => self.income_statement(symbol, frequency),
            StatementKind::CashFlow => self.cash_flow(symbol, frequency),
        }
    }
}

/// Provider of daily closing prices.
pub trait PriceHistorySource: Send + Sync + Debug {
    /// Returns the name of this source.
    fn name(&self) -> &str;

    /// Fetches observations with `start <= date <= end`, in ascending date order.
    fn price_history(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceObservation>>;
}

/// Fundamental and price source backed by preloaded data.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    statements: HashMap<(Symbol, ReportingFrequency, StatementKind), DataFrame>,
    prices: HashMap<Symbol, Vec<PriceObservation>>,
}

impl InMemorySource {
    /// Creates an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a raw statement frame, replacing any previous one.
    #[must_use]
    pub fn with_statement(
        mut self,
        symbol: impl Into<Symbol>,
        frequency: ReportingFrequency,
        kind: StatementKind,
        frame: DataFrame,
    ) -> Self {
        self.statements
            .insert((symbol.into(), frequency, kind), frame);
        self
    }

    /// Registers a price history, replacing any previous one.
    #[must_use]
    pub fn with_prices(
        mut self,
        symbol: impl Into<Symbol>,
        mut prices: Vec<PriceObservation>,
    ) -> Self {
        prices.sort_by_key(|p| p.date);
        self.prices.insert(symbol.into(), prices);
        self
    }

    fn lookup(
        &self,
        symbol: &Symbol,
        frequency: ReportingFrequency,
        kind: StatementKind,
    ) -> Result<DataFrame> {
        self.statements
            .get(&(symbol.clone(), frequency, kind))
            .cloned()
            .ok_or_else(|| ScorecardError::DataSource {
                provider: FundamentalDataSource::name(self).to_string(),
                message: format!("no {frequency} {kind} for {symbol}"),
            })
    }
}

impl FundamentalDataSource for InMemorySource {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn balance_sheet(&self, symbol: &Symbol, frequency: ReportingFrequency) -> Result<DataFrame> {
        self.lookup(symbol, frequency, StatementKind::BalanceSheet)
    }

    fn income_statement(
        &self,
        symbol: &Symbol,
        frequency: ReportingFrequency,
    ) -> Result<DataFrame> {
        self.lookup(symbol, frequency, StatementKind::IncomeStatement)
    }

    fn cash_flow(&self, symbol: &Symbol, frequency: ReportingFrequency) -> Result<DataFrame> {
        self.lookup(symbol, frequency, StatementKind::CashFlow)
    }
}

impl PriceHistorySource for InMemorySource {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn price_history(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceObservation>> {
        let prices = self
            .prices
            .get(symbol)
            .ok_or_else(|| ScorecardError::DataSource {
                provider: PriceHistorySource::name(self).to_string(),
                message: format!("no price history for {symbol}"),
            })?;

        Ok(prices
            .iter()
            .filter(|p| p.date >= start && p.date <= end)
            .copied()
            .collect())
    }
}

/// One symbol's statements and prices as stored on disk.
///
/// ```json
/// {
///   "frequency": "annual",
///   "balance_sheet": [{"asOfDate": "2023-12-31", "TotalAssets": 1200.0, ...}],
///   "income_statement": [...],
///   "cash_flow": [...],
///   "prices": [{"date": "2024-03-01", "close": 101.0, "adjusted_close": 101.0}]
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct StatementBundle {
    /// Frequency the statements were reported at
    #[serde(default)]
    pub frequency: ReportingFrequency,
    /// Balance sheet records
    pub balance_sheet: Vec<BTreeMap<String, Value>>,
    /// Income statement records
    pub income_statement: Vec<BTreeMap<String, Value>>,
    /// Cash flow records
    pub cash_flow: Vec<BTreeMap<String, Value>>,
    /// Daily prices
    #[serde(default)]
    pub prices: Vec<PriceObservation>,
}

impl StatementBundle {
    /// Reads a bundle from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        let bundle: Self = serde_json::from_str(&raw)?;
        debug!(
            path = %path.as_ref().display(),
            frequency = %bundle.frequency,
            periods = bundle.balance_sheet.len(),
            prices = bundle.prices.len(),
            "Loaded statement bundle"
        );
        Ok(bundle)
    }

    /// Converts the bundle into a source serving `symbol`.
    pub fn into_source(self, symbol: impl Into<Symbol>) -> Result<InMemorySource> {
        let symbol = symbol.into();
        let frequency = self.frequency;

        Ok(InMemorySource::new()
            .with_statement(
                symbol.clone(),
                frequency,
                StatementKind::BalanceSheet,
                records_to_frame(&self.balance_sheet)?,
            )
            .with_statement(
                symbol.clone(),
                frequency,
                StatementKind::IncomeStatement,
                records_to_frame(&self.income_statement)?,
            )
            .with_statement(
                symbol.clone(),
                frequency,
                StatementKind::CashFlow,
                records_to_frame(&self.cash_flow)?,
            )
            .with_prices(symbol, self.prices))
    }
}

/// Builds a frame from row records.
///
/// A column holding any string becomes a string column; every other column
/// is `Float64`. Keys absent from a record and JSON nulls become nulls.
pub fn records_to_frame(records: &[BTreeMap<String, Value>]) -> Result<DataFrame> {
    let names: BTreeSet<&str> = records
        .iter()
        .flat_map(|record| record.keys().map(String::as_str))
        .collect();

    let columns = names
        .into_iter()
        .map(|name| {
            let values: Vec<Option<&Value>> = records
                .iter()
                .map(|record| record.get(name).filter(|v| !v.is_null()))
                .collect();
            record_column(name, &values)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(DataFrame::new(columns)?)
}

fn record_column(name: &str, values: &[Option<&Value>]) -> Result<Column> {
    if values.iter().flatten().any(|v| v.is_string()) {
        let text: Vec<Option<String>> = values
            .iter()
            .map(|value| {
                value.map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
            })
            .collect();
        return Ok(Column::new(name.into(), text));
    }

    let numbers = values
        .iter()
        .map(|value| match value {
            None => Ok(None),
            Some(v) => v.as_f64().map(Some).ok_or_else(|| {
                ScorecardError::InvalidParameter(format!(
                    "column `{name}` holds a non-numeric value: {v}"
                ))
            }),
        })
        .collect::<Result<Vec<Option<f64>>>>()?;
    Ok(Column::new(name.into(), numbers))
}
