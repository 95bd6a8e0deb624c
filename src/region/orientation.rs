//! Comparison direction for peak versus valley detection
//!
//! A valley scan is a peak scan of the negated sequence. Instead of
//! negating values, every comparison is routed through [`Orientation`].

use std::cmp::Ordering;
use std::fmt;

/// Which side of the value axis counts as "extreme"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    /// Extremum is the maximum, cutoff the minimum
    #[default]
    Peak,

    /// Extremum is the minimum, cutoff the maximum
    Valley,
}

impl Orientation {
    /// `a` lies strictly on the extremum side of `b`
    #[inline]
    pub fn exceeds(self, a: f64, b: f64) -> bool {
        match self {
            Orientation::Peak => a > b,
            Orientation::Valley => a < b,
        }
    }

    /// `a` lies on the extremum side of `b` or equals it
    #[inline]
    pub fn reaches(self, a: f64, b: f64) -> bool {
        match self {
            Orientation::Peak => a >= b,
            Orientation::Valley => a <= b,
        }
    }

    /// Ordering that puts the more extreme value first.
    ///
    /// Used to rank sibling regions: for peaks the highest extremum
    /// comes first, for valleys the lowest.
    #[inline]
    pub fn rank(self, a: f64, b: f64) -> Ordering {
        match self {
            Orientation::Peak => b.total_cmp(&a),
            Orientation::Valley => a.total_cmp(&b),
        }
    }

    /// The other orientation
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Peak => Orientation::Valley,
            Orientation::Valley => Orientation::Peak,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Orientation::Peak => write!(f, "peaks"),
            Orientation::Valley => write!(f, "valleys"),
        }
    }
}
