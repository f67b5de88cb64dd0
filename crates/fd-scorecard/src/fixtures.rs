//! Shared test data: three fiscal years of raw provider statements.
//!
//! | year | assets | debt | wc  | re  | ltd | oi  | ni | rev | cogs | ocf |
//! |------|--------|------|-----|-----|-----|-----|----|-----|------|-----|
//! | 2021 | 1000   | 400  | 200 | 150 | 300 | 100 | 60 | 800 | 500  | 90  |
//! | 2022 | 1100   | 380  | 210 | 180 | 280 | 120 | 70 | 900 | 560  | 85  |
//! | 2023 | 1200   | 420  | 230 | 220 | 310 | 110 | 65 | 950 | 600  | 100 |

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

use crate::types::PriceObservation;

pub(crate) fn balance_sheet_raw() -> DataFrame {
    df![
        "asOfDate" => ["2021-12-31", "2022-12-31", "2023-12-31"],
        "periodType" => ["12M", "12M", "12M"],
        "TotalAssets" => [1000.0, 1100.0, 1200.0],
        "TotalDebt" => [400.0, 380.0, 420.0],
        "CurrentAssets" => [300.0, 320.0, 360.0],
        "CurrentLiabilities" => [150.0, 160.0, 170.0],
        "Inventory" => [50.0, 40.0, 60.0],
        "WorkingCapital" => [200.0, 210.0, 230.0],
        "RetainedEarnings" => [150.0, 180.0, 220.0],
        "LongTermDebt" => [300.0, 280.0, 310.0]
    ]
    .unwrap()
}

pub(crate) fn income_statement_raw() -> DataFrame {
    df![
        "asOfDate" => ["2021-12-31", "2022-12-31", "2023-12-31"],
        "OperatingIncome" => [100.0, 120.0, 110.0],
        "NetIncome" => [60.0, 70.0, 65.0],
        "TotalRevenue" => [800.0, 900.0, 950.0],
        "CostOfRevenue" => [500.0, 560.0, 600.0]
    ]
    .unwrap()
}

pub(crate) fn cash_flow_raw() -> DataFrame {
    df![
        "asOfDate" => ["2021-12-31", "2022-12-31", "2023-12-31"],
        "OperatingCashFlow" => [90.0, 85.0, 100.0]
    ]
    .unwrap()
}

pub(crate) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Daily prices where close always equals adjusted close.
pub(crate) fn unadjusted_prices() -> Vec<PriceObservation> {
    (1..=20)
        .map(|day| {
            let close = 100.0 + f64::from(day);
            PriceObservation::new(date(2024, 3, day), close, close)
        })
        .collect()
}

/// Daily prices carrying a dividend adjustment on the earliest days.
pub(crate) fn adjusted_prices() -> Vec<PriceObservation> {
    unadjusted_prices()
        .into_iter()
        .map(|p| {
            if p.date.day0() < 5 {
                PriceObservation::new(p.date, p.close, p.close * 0.98)
            } else {
                p
            }
        })
        .collect()
}
