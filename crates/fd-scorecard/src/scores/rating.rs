//! Credit rating estimate from the Altman Z-score.
//!
//! Cut-offs follow Altman (2005). The twenty buckets are half-open
//! `[lower, upper)` intervals, so a score sitting exactly on a boundary is
//! assigned to the better rating.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Ascending Z-score boundaries of the rating buckets.
pub const RATING_BOUNDARIES: [f64; 21] = [
    0.0,
    1.75,
    2.5,
    3.2,
    3.75,
    4.15,
    4.5,
    4.75,
    4.95,
    5.25,
    5.65,
    5.85,
    6.25,
    6.4,
    6.65,
    6.85,
    7.0,
    7.3,
    7.6,
    8.15,
    f64::INFINITY,
];

/// Estimated credit rating.
///
/// Variants are declared worst first, so the derived ordering follows credit
/// quality: `D < CCC- < ... < AAA`.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum CreditRating {
    /// Default
    #[display("D")]
    #[serde(rename = "D")]
    D,
    /// CCC-
    #[display("CCC-")]
    #[serde(rename = "CCC-")]
    CccMinus,
    /// CCC
    #[display("CCC")]
    #[serde(rename = "CCC")]
    Ccc,
    /// CCC+
    #[display("CCC+")]
    #[serde(rename = "CCC+")]
    CccPlus,
    /// B-
    #[display("B-")]
    #[serde(rename = "B-")]
    BMinus,
    /// B
    #[display("B")]
    #[serde(rename = "B")]
    B,
    /// B+
    #[display("B+")]
    #[serde(rename = "B+")]
    BPlus,
    /// BB-
    #[display("BB-")]
    #[serde(rename = "BB-")]
    BbMinus,
    /// BB
    #[display("BB")]
    #[serde(rename = "BB")]
    Bb,
    /// BB+
    #[display("BB+")]
    #[serde(rename = "BB+")]
    BbPlus,
    /// BBB-
    #[display("BBB-")]
    #[serde(rename = "BBB-")]
    BbbMinus,
    /// BBB
    #[display("BBB")]
    #[serde(rename = "BBB")]
    Bbb,
    /// BBB+
    #[display("BBB+")]
    #[serde(rename = "BBB+")]
    BbbPlus,
    /// A-
    #[display("A-")]
    #[serde(rename = "A-")]
    AMinus,
    /// A
    #[display("A")]
    #[serde(rename = "A")]
    A,
    /// A+
    #[display("A+")]
    #[serde(rename = "A+")]
    APlus,
    /// AA-
    #[display("AA-")]
    #[serde(rename = "AA-")]
    AaMinus,
    /// AA
    #[display("AA")]
    #[serde(rename = "AA")]
    Aa,
    /// AA+
    #[display("AA+")]
    #[serde(rename = "AA+")]
    AaPlus,
    /// AAA
    #[display("AAA")]
    #[serde(rename = "AAA")]
    Aaa,
}

impl CreditRating {
    /// All ratings, worst first; index `i` is the rating of bucket `i`.
    pub const WORST_FIRST: [Self; 20] = [
        Self::D,
        Self::CccMinus,
        Self::Ccc,
        Self::CccPlus,
        Self::BMinus,
        Self::B,
        Self::BPlus,
        Self::BbMinus,
        Self::Bb,
        Self::BbPlus,
        Self::BbbMinus,
        Self::Bbb,
        Self::BbbPlus,
        Self::AMinus,
        Self::A,
        Self::APlus,
        Self::AaMinus,
        Self::Aa,
        Self::AaPlus,
        Self::Aaa,
    ];

    /// Classify a Z-score.
    ///
    /// Scores below the first boundary rate `D`, `+inf` rates `AAA`, and NaN
    /// has no rating.
    #[must_use]
    pub fn from_z_score(z_score: f64) -> Option<Self> {
        if z_score.is_nan() {
            return None;
        }
        let bucket = RATING_BOUNDARIES
            .partition_point(|boundary| *boundary <= z_score)
            .saturating_sub(1)
            .min(Self::WORST_FIRST.len() - 1);
        Some(Self::WORST_FIRST[bucket])
    }

    /// Bucket position, 0 for `D` through 19 for `AAA`.
    #[must_use]
    pub const fn notch(self) -> usize {
        self as usize
    }

    /// The `[lower, upper)` Z-score interval of this rating.
    #[must_use]
    pub const fn z_range(self) -> (f64, f64) {
        let i = self.notch();
        (RATING_BOUNDARIES[i], RATING_BOUNDARIES[i + 1])
    }

    /// Whether the rating is investment grade (`BBB-` or better).
    #[must_use]
    pub fn is_investment_grade(self) -> bool {
        self >= Self::BbbMinus
    }
}
