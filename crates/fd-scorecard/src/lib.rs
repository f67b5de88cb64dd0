#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/scorecard/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod engine;
pub mod error;
pub mod period;
pub mod scores;
pub mod source;
pub mod statements;
pub mod traits;
pub mod types;

#[cfg(test)]
mod fixtures;

// Re-export core types
pub use engine::{ScoreEngine, Scorecard, ScorecardConfig, ScoringPipeline};
pub use error::{Result, ScorecardError};
pub use period::{AltmanComponents, MergedPeriodRow, PeriodMetrics, Ratios, ScoredPeriodRow};
pub use scores::{
    CreditRating, PeriodTrend, RATING_BOUNDARIES, RatioEngine, SplitAdjustment,
    TrendFScoreCalculator, TrendSignals, ZScoreCalculator, ZScoreConfig,
};
pub use source::{FundamentalDataSource, InMemorySource, PriceHistorySource, StatementBundle};
pub use statements::{MergedPeriods, PeriodAligner, SchemaNormalizer, StatementSeries};
pub use traits::{ConfigurableStage, ScoringStage, StageConfig};
pub use types::{PriceObservation, ReportingFrequency, StatementKind, Symbol};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
