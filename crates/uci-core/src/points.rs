use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use ts_rs::TS;

use crate::error::CoreError;

/// A non-negative score held as a whole number of tenths of a point.
///
/// Every instrument weight in the catalog has at most one decimal place
/// (NAS is the finest, e.g. 4.5 or 12.1), so fixed-point tenths make sums
/// exact and independent of the order items are added in. On the wire a
/// `Points` is a plain JSON number (`10.0`, `85.3`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct Points(u32);

impl Points {
    pub const ZERO: Points = Points(0);
    pub const MAX: Points = Points(u32::MAX);

    pub const fn from_tenths(tenths: u32) -> Self {
        Points(tenths)
    }

    /// Whole points, e.g. `Points::whole(24)` is 24.0.
    pub const fn whole(points: u32) -> Self {
        Points(points.saturating_mul(10))
    }

    pub const fn tenths(self) -> u32 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0) / 10.0
    }

    /// Convert a decimal score, rejecting negatives, non-finite values and
    /// anything finer than one decimal place.
    pub fn from_f64(value: f64) -> Result<Self, CoreError> {
        if !value.is_finite() || value < 0.0 {
            return Err(CoreError::InvalidPoints(value));
        }
        let scaled = value * 10.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-6 || rounded > f64::from(u32::MAX) {
            return Err(CoreError::InvalidPoints(value));
        }
        Ok(Points(rounded as u32))
    }

    pub const fn checked_add(self, rhs: Points) -> Option<Points> {
        match self.0.checked_add(rhs.0) {
            Some(t) => Some(Points(t)),
            None => None,
        }
    }

    pub const fn saturating_add(self, rhs: Points) -> Points {
        Points(self.0.saturating_add(rhs.0))
    }

    /// `self` repeated `n` times, saturating at [`Points::MAX`].
    pub const fn times(self, n: u32) -> Points {
        Points(self.0.saturating_mul(n))
    }

    /// The smallest representable score strictly greater than `self`.
    pub const fn next_up(self) -> Option<Points> {
        match self.0.checked_add(1) {
            Some(t) => Some(Points(t)),
            None => None,
        }
    }
}

impl Add for Points {
    type Output = Points;

    fn add(self, rhs: Points) -> Points {
        self.saturating_add(rhs)
    }
}

impl Sum for Points {
    fn sum<I: Iterator<Item = Points>>(iter: I) -> Points {
        iter.fold(Points::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Points> for Points {
    fn sum<I: Iterator<Item = &'a Points>>(iter: I) -> Points {
        iter.copied().sum()
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0 / 10, self.0 % 10)
    }
}

impl Serialize for Points {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Points {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = f64::deserialize(deserializer)?;
        Points::from_f64(value).map_err(serde::de::Error::custom)
    }
}
