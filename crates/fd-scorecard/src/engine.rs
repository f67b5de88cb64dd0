//! Scorecard orchestration.
//!
//! [`ScoringPipeline`] turns three raw statement frames into scored periods.
//! [`ScoreEngine`] adds the data sources, the evaluation date and the split
//! check on top of it.

use chrono::{Days, NaiveDate, Utc};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info};

use crate::{
    Result, ScorecardError,
    period::{PeriodMetrics, ScoredPeriodRow},
    scores::{
        CreditRating, RatioEngine, SplitAdjustment, TrendFScoreCalculator, ZScoreCalculator,
        ZScoreConfig,
    },
    source::{FundamentalDataSource, PriceHistorySource},
    statements::{PeriodAligner, SchemaNormalizer},
    traits::{ConfigurableStage, ScoringStage},
    types::{ReportingFrequency, StatementKind, Symbol},
};

/// Periods needed before any trend score exists.
const MIN_TREND_PERIODS: usize = 2;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScorecardConfig {
    /// Z-score coefficients
    pub z_score: ZScoreConfig,
    /// Days of price history inspected for the split check
    pub price_lookback_days: u32,
    /// Whether the split check runs at all
    pub split_adjustment: bool,
    /// Evaluation date; today (UTC) when unset
    pub as_of: Option<NaiveDate>,
}

impl Default for ScorecardConfig {
    fn default() -> Self {
        Self {
            z_score: ZScoreConfig::default(),
            price_lookback_days: 365,
            split_adjustment: true,
            as_of: None,
        }
    }
}

impl ScorecardConfig {
    /// Reads a JSON configuration file; absent fields take their defaults.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects an empty price window and non-finite coefficients.
    pub fn validate(&self) -> Result<()> {
        if self.price_lookback_days == 0 {
            return Err(ScorecardError::InvalidParameter(
                "price_lookback_days must be positive".to_string(),
            ));
        }

        let z = &self.z_score;
        let coefficients = [
            z.working_capital_weight,
            z.retained_earnings_weight,
            z.operating_income_weight,
            z.book_equity_weight,
            z.constant,
        ];
        if coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ScorecardError::InvalidParameter(
                "Z-score coefficients must be finite".to_string(),
            ));
        }

        Ok(())
    }

    /// The configured evaluation date, or today.
    #[must_use]
    pub fn evaluation_date(&self) -> NaiveDate {
        self.as_of.unwrap_or_else(|| Utc::now().date_naive())
    }

    /// The `[start, end]` window of the split check.
    pub fn price_window(&self) -> Result<(NaiveDate, NaiveDate)> {
        let end = self.evaluation_date();
        let start = end
            .checked_sub_days(Days::new(u64::from(self.price_lookback_days)))
            .ok_or_else(|| {
                ScorecardError::InvalidDate(format!(
                    "{} days before {end} is out of range",
                    self.price_lookback_days
                ))
            })?;
        Ok((start, end))
    }
}

/// Scored periods of one symbol.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scorecard {
    /// Scored symbol
    pub symbol: Symbol,
    /// Statement frequency
    pub frequency: ReportingFrequency,
    /// Evaluation date
    pub as_of: NaiveDate,
    /// Outcome of the split check, applied to every F-score
    pub split_adjustment: SplitAdjustment,
    /// All aligned periods, ascending by date
    pub periods: Vec<ScoredPeriodRow>,
}

impl Scorecard {
    /// Periods that carry trend signals, i.e. all but the earliest.
    #[must_use]
    pub fn trend_periods(&self) -> &[ScoredPeriodRow] {
        self.periods.get(1..).unwrap_or_default()
    }

    /// The most recent period.
    #[must_use]
    pub fn latest(&self) -> Option<&ScoredPeriodRow> {
        self.periods.last()
    }
}

/// Source-free scoring: raw statement frames in, scored periods out.
#[derive(Debug, Clone, Default)]
pub struct ScoringPipeline {
    normalizer: SchemaNormalizer,
    aligner: PeriodAligner,
    ratios: RatioEngine,
    z_score: ZScoreCalculator,
    trend: TrendFScoreCalculator,
}

impl ScoringPipeline {
    /// Creates a pipeline with the given Z-score coefficients.
    #[must_use]
    pub fn new(z_score: ZScoreConfig) -> Self {
        Self {
            z_score: ZScoreCalculator::with_config(z_score),
            ..Self::default()
        }
    }

    /// Frame stages in application order.
    fn stages(&self) -> [&dyn ScoringStage; 2] {
        [&self.ratios, &self.z_score]
    }

    /// Normalize, align and score three raw statements.
    pub fn score(
        &self,
        balance_sheet: &DataFrame,
        income_statement: &DataFrame,
        cash_flow: &DataFrame,
        adjustment: SplitAdjustment,
    ) -> Result<Vec<ScoredPeriodRow>> {
        let balance_sheet = self
            .normalizer
            .normalize(balance_sheet, StatementKind::BalanceSheet)?;
        let income_statement = self
            .normalizer
            .normalize(income_statement, StatementKind::IncomeStatement)?;
        let cash_flow = self
            .normalizer
            .normalize(cash_flow, StatementKind::CashFlow)?;

        let mut frame = self
            .aligner
            .align(&balance_sheet, &income_statement, &cash_flow)?
            .into_frame();

        for stage in self.stages() {
            stage.validate(&frame)?;
            frame = stage.apply(frame.lazy()).collect()?;
            debug!(stage = stage.name(), columns = frame.width(), "Applied stage");
        }

        let metrics = PeriodMetrics::from_frame(&frame)?;
        let trends = self.trend.score_periods(&metrics, adjustment);

        Ok(metrics
            .into_iter()
            .zip(trends)
            .map(|(metrics, trend)| ScoredPeriodRow {
                credit_rating: metrics.z_score.and_then(CreditRating::from_z_score),
                trend: trend.signals,
                f_score: trend.f_score,
                metrics,
            })
            .collect())
    }
}

/// Fetches statements and prices for a symbol and scores them.
#[derive(Debug)]
pub struct ScoreEngine<F, P> {
    fundamentals: F,
    prices: P,
    config: ScorecardConfig,
    pipeline: ScoringPipeline,
}

impl<F, P> ScoreEngine<F, P>
where
    F: FundamentalDataSource,
    P: PriceHistorySource,
{
    /// Creates an engine with the default configuration.
    pub fn new(fundamentals: F, prices: P) -> Self {
        Self {
            fundamentals,
            prices,
            config: ScorecardConfig::default(),
            pipeline: ScoringPipeline::default(),
        }
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, config: ScorecardConfig) -> Result<Self> {
        config.validate()?;
        self.pipeline = ScoringPipeline::new(config.z_score);
        self.config = config;
        Ok(self)
    }

    /// Returns the current configuration.
    pub const fn config(&self) -> &ScorecardConfig {
        &self.config
    }

    /// Score every aligned period of `symbol`.
    ///
    /// All statements and the price history are fetched before alignment;
    /// the first source error aborts the run.
    pub fn scorecard(&self, symbol: &Symbol, frequency: ReportingFrequency) -> Result<Scorecard> {
        let balance_sheet = self.fundamentals.balance_sheet(symbol, frequency)?;
        let income_statement = self.fundamentals.income_statement(symbol, frequency)?;
        let cash_flow = self.fundamentals.cash_flow(symbol, frequency)?;

        let as_of = self.config.evaluation_date();
        let split_adjustment = if self.config.split_adjustment {
            let (start, end) = self.config.price_window()?;
            let prices = self.prices.price_history(symbol, start, end)?;
            debug!(%symbol, %start, %end, observations = prices.len(), "Fetched price history");
            SplitAdjustment::detect(&prices)
        } else {
            SplitAdjustment::Skipped
        };

        let periods = self.pipeline.score(
            &balance_sheet,
            &income_statement,
            &cash_flow,
            split_adjustment,
        )?;

        info!(
            %symbol,
            %frequency,
            %as_of,
            periods = periods.len(),
            %split_adjustment,
            source = self.fundamentals.name(),
            "Scored symbol"
        );

        Ok(Scorecard {
            symbol: symbol.clone(),
            frequency,
            as_of,
            split_adjustment,
            periods,
        })
    }

    /// Scored periods excluding the earliest, which has no trend data.
    pub fn run(
        &self,
        symbol: &Symbol,
        frequency: ReportingFrequency,
    ) -> Result<Vec<ScoredPeriodRow>> {
        let scorecard = self.scorecard(symbol, frequency)?;
        let available = scorecard.periods.len();
        if available < MIN_TREND_PERIODS {
            return Err(ScorecardError::InsufficientPeriods {
                required: MIN_TREND_PERIODS,
                available,
            });
        }

        Ok(scorecard.periods.into_iter().skip(1).collect())
    }
}
