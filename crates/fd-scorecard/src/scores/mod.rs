//! Scoring stages - ratios, Altman Z-score, credit rating and F-score

pub mod altman_z;
pub mod piotroski;
pub mod rating;
pub mod ratios;

pub use altman_z::{ZScoreCalculator, ZScoreConfig};
pub use piotroski::{PeriodTrend, SplitAdjustment, TrendFScoreCalculator, TrendSignals};
pub use rating::{CreditRating, RATING_BOUNDARIES};
pub use ratios::RatioEngine;
