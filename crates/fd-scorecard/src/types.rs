//! Core domain types shared across the scoring pipeline.
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`ReportingFrequency`] - Annual or quarterly statements
//! - [`StatementKind`] - Which of the three fundamental statements a frame holds
//! - [`PriceObservation`] - One day of close / adjusted close prices

use chrono::NaiveDate;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScorecardError;

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// Reporting frequency of the fundamental statements.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportingFrequency {
    /// Annual reporting periods
    #[default]
    #[display("annual")]
    Annual,
    /// Quarterly reporting periods
    #[display("quarterly")]
    Quarterly,
}

impl FromStr for ReportingFrequency {
    type Err = ScorecardError;

    /// Accepts `a`/`annual` and `q`/`quarterly`, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "annual" => Ok(Self::Annual),
            "q" | "quarterly" => Ok(Self::Quarterly),
            other => Err(ScorecardError::InvalidParameter(format!(
                "unknown reporting frequency `{other}` (expected a, annual, q or quarterly)"
            ))),
        }
    }
}

/// The three fundamental statements a company reports.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    /// Balance sheet
    #[display("balance sheet")]
    BalanceSheet,
    /// Income statement
    #[display("income statement")]
    IncomeStatement,
    /// Cash flow statement
    #[display("cash flow")]
    CashFlow,
}

/// Closing and adjusted closing price for one trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    /// Trading date
    pub date: NaiveDate,
    /// Raw closing price
    pub close: f64,
    /// Split/dividend adjusted closing price
    pub adjusted_close: f64,
}

impl PriceObservation {
    /// Creates a new price observation.
    #[must_use]
    pub const fn new(date: NaiveDate, close: f64, adjusted_close: f64) -> Self {
        Self {
            date,
            close,
            adjusted_close,
        }
    }

    /// Whether the adjusted close differs from the raw close.
    ///
    /// Two NaN prices compare equal.
    #[must_use]
    pub fn is_adjusted(&self) -> bool {
        let same = self.close == self.adjusted_close
            || (self.close.is_nan() && self.adjusted_close.is_nan());
        !same
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_symbol_uppercases() {
        assert_eq!(Symbol::new("aapl").as_str(), "AAPL");
        assert_eq!(Symbol::from("msft").to_string(), "MSFT");
    }

    #[rstest]
    #[case("a", ReportingFrequency::Annual)]
    #[case("Annual", ReportingFrequency::Annual)]
    #[case("q", ReportingFrequency::Quarterly)]
    #[case(" QUARTERLY ", ReportingFrequency::Quarterly)]
    fn test_frequency_parse(#[case] input: &str, #[case] expected: ReportingFrequency) {
        assert_eq!(input.parse::<ReportingFrequency>().unwrap(), expected);
    }

    #[test]
    fn test_frequency_parse_rejects_unknown() {
        assert!(matches!(
            "monthly".parse::<ReportingFrequency>(),
            Err(ScorecardError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_statement_kind_display() {
        assert_eq!(StatementKind::BalanceSheet.to_string(), "balance sheet");
        assert_eq!(StatementKind::CashFlow.to_string(), "cash flow");
    }

    #[test]
    fn test_price_observation_adjusted() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert!(!PriceObservation::new(date, 10.0, 10.0).is_adjusted());
        assert!(PriceObservation::new(date, 10.0, 9.5).is_adjusted());
    }

    #[rstest]
    #[case(f64::NAN, f64::NAN, false)]
    #[case(10.0, f64::NAN, true)]
    #[case(f64::NAN, 10.0, true)]
    fn test_price_observation_missing_prices(
        #[case] close: f64,
        #[case] adjusted_close: f64,
        #[case] adjusted: bool,
    ) {
        let date = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        assert_eq!(
            PriceObservation::new(date, close, adjusted_close).is_adjusted(),
            adjusted
        );
    }
}
