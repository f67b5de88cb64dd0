//! Statement ingestion - schema normalization and period alignment
//!
//! Raw provider frames enter here and leave as a single period-indexed
//! table under canonical column names.

pub mod align;
pub mod schema;

pub use align::{MergedPeriods, PeriodAligner};
pub use schema::{
    AS_OF_DATE, BALANCE_SHEET_FIELDS, CASH_FLOW_FIELDS, DATE_FIELD, FieldMapping,
    INCOME_STATEMENT_FIELDS, SchemaNormalizer, StatementSeries,
};
