//! Piotroski F-Score from period-over-period trends.
//!
//! Each period is compared with the one immediately before it. The first
//! period has no predecessor, so it carries neither trend signals nor a score.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{period::PeriodMetrics, types::PriceObservation};

/// Changes between a period and its predecessor.
///
/// A change is `None` when either side of the difference is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TrendSignals {
    /// Change in net income
    pub net_income_change: Option<f64>,
    /// Change in return on assets
    pub roa_change: Option<f64>,
    /// Change in operating cash flow
    pub operating_cash_flow_change: Option<f64>,
    /// Operating income less net income, in the current period
    pub operating_income_less_net_income: Option<f64>,
    /// Change in long-term debt
    pub long_term_debt_change: Option<f64>,
    /// Change in current ratio
    pub current_ratio_change: Option<f64>,
    /// Change in gross margin
    pub gross_margin_change: Option<f64>,
    /// Change in asset turnover ratio
    pub asset_turnover_change: Option<f64>,
}

fn change(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    Some(current? - previous?)
}

impl TrendSignals {
    /// Signals of `current` measured against `previous`.
    #[must_use]
    pub fn between(previous: &PeriodMetrics, current: &PeriodMetrics) -> Self {
        let (p, c) = (&previous.period, &current.period);
        let (pr, cr) = (&previous.ratios, &current.ratios);

        Self {
            net_income_change: change(c.net_income, p.net_income),
            roa_change: change(cr.roa, pr.roa),
            operating_cash_flow_change: change(c.operating_cash_flow, p.operating_cash_flow),
            operating_income_less_net_income: change(c.operating_income, c.net_income),
            long_term_debt_change: change(c.long_term_debt, p.long_term_debt),
            current_ratio_change: change(cr.current_ratio, pr.current_ratio),
            gross_margin_change: change(cr.gross_margin, pr.gross_margin),
            asset_turnover_change: change(cr.asset_turnover_ratio, pr.asset_turnover_ratio),
        }
    }

    /// The eight scored quantities, each favorable when positive.
    ///
    /// Rising long-term debt, current ratio, gross margin and asset turnover
    /// all score a point here.
    #[must_use]
    pub const fn conditions(&self) -> [Option<f64>; 8] {
        [
            self.net_income_change,
            self.roa_change,
            self.operating_cash_flow_change,
            self.operating_income_less_net_income,
            self.long_term_debt_change,
            self.current_ratio_change,
            self.gross_margin_change,
            self.asset_turnover_change,
        ]
    }

    /// Number of positive conditions, in `[0, 8]`.
    ///
    /// Missing values never score.
    #[must_use]
    pub fn raw_score(&self) -> u8 {
        self.conditions()
            .iter()
            .filter(|value| value.is_some_and(|v| v > 0.0))
            .count() as u8
    }
}

/// Outcome of the split check on the trailing price history.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitAdjustment {
    /// Close equals adjusted close throughout; every F-score gains a point
    #[display("unadjusted")]
    Unadjusted,
    /// Prices carry a split or dividend adjustment; scores stay as computed
    #[display("adjusted")]
    Adjusted,
    /// The check was turned off
    #[display("skipped")]
    Skipped,
}

impl SplitAdjustment {
    /// Inspect a price history.
    ///
    /// An empty history has no adjusted observation and counts as unadjusted.
    #[must_use]
    pub fn detect(prices: &[PriceObservation]) -> Self {
        if prices.iter().any(PriceObservation::is_adjusted) {
            Self::Adjusted
        } else {
            Self::Unadjusted
        }
    }

    /// Points added to every computed F-score.
    #[must_use]
    pub const fn bonus(self) -> u8 {
        match self {
            Self::Unadjusted => 1,
            Self::Adjusted | Self::Skipped => 0,
        }
    }
}

/// Trend signals and score of one period.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeriodTrend {
    /// Signals against the preceding period
    pub signals: Option<TrendSignals>,
    /// F-score including the split bonus
    pub f_score: Option<u8>,
}

/// Piotroski F-Score calculator.
///
/// The score counts these conditions, one point each:
///
/// - Net income increased
/// - ROA increased
/// - Operating cash flow increased
/// - Operating income exceeds net income
/// - Long-term debt increased
/// - Current ratio increased
/// - Gross margin increased
/// - Asset turnover increased
///
/// Textbook Piotroski treats rising leverage as a weakness; this score
/// counts it as a strength, together with the other increases listed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendFScoreCalculator;

impl TrendFScoreCalculator {
    /// Evaluate one period against its optional predecessor.
    #[must_use]
    pub fn evaluate(
        &self,
        previous: Option<&PeriodMetrics>,
        current: &PeriodMetrics,
        adjustment: SplitAdjustment,
    ) -> PeriodTrend {
        previous.map_or_else(PeriodTrend::default, |previous| {
            let signals = TrendSignals::between(previous, current);
            PeriodTrend {
                signals: Some(signals),
                f_score: Some(signals.raw_score() + adjustment.bonus()),
            }
        })
    }

    /// Score every period in ascending date order.
    ///
    /// Returns one entry per input period.
    #[must_use]
    pub fn score_periods(
        &self,
        periods: &[PeriodMetrics],
        adjustment: SplitAdjustment,
    ) -> Vec<PeriodTrend> {
        let previous = std::iter::once(None).chain(periods.iter().map(Some));
        let trends: Vec<PeriodTrend> = previous
            .zip(periods)
            .map(|(previous, current)| self.evaluate(previous, current, adjustment))
            .collect();

        debug!(
            periods = periods.len(),
            scored = trends.iter().filter(|t| t.f_score.is_some()).count(),
            %adjustment,
            "Computed F-scores"
        );

        trends
    }
}
