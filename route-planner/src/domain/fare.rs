//! Fare amounts.

use std::cmp::Ordering;
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

use serde::{Deserialize, Serialize};

/// Error returned when a fare is negative or not a finite number.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid fare {0}: must be a finite, non-negative amount")]
pub struct InvalidFare(pub f64);

/// A non-negative, finite price.
///
/// Fares are totally ordered so they can drive sorting directly.
///
/// # Examples
///
/// ```
/// use route_planner::domain::Fare;
///
/// let total: Fare = [Fare::new(10.0).unwrap(), Fare::new(8.5).unwrap()]
///     .into_iter()
///     .sum();
/// assert_eq!(total.amount(), 18.5);
///
/// assert!(Fare::new(-1.0).is_err());
/// assert!(Fare::new(f64::NAN).is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Fare(f64);

impl Fare {
    pub const ZERO: Fare = Fare(0.0);

    pub fn new(amount: f64) -> Result<Self, InvalidFare> {
        if amount.is_finite() && amount >= 0.0 {
            // Normalise -0.0 so equal fares compare equal under total_cmp
            Ok(Self(amount + 0.0))
        } else {
            Err(InvalidFare(amount))
        }
    }

    pub fn amount(&self) -> f64 {
        self.0
    }
}

impl Eq for Fare {}

impl Ord for Fare {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl PartialOrd for Fare {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Add for Fare {
    type Output = Fare;

    /// Saturates at `f64::MAX` so totals stay finite.
    fn add(self, rhs: Fare) -> Fare {
        Fare((self.0 + rhs.0).min(f64::MAX))
    }
}

impl Sum for Fare {
    fn sum<I: Iterator<Item = Fare>>(iter: I) -> Fare {
        iter.fold(Fare::ZERO, Add::add)
    }
}

impl TryFrom<f64> for Fare {
    type Error = InvalidFare;

    fn try_from(amount: f64) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl From<Fare> for f64 {
    fn from(fare: Fare) -> f64 {
        fare.0
    }
}

impl fmt::Debug for Fare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fare({:.2})", self.0)
    }
}

impl fmt::Display for Fare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fare(x: f64) -> Fare {
        Fare::new(x).unwrap()
    }

    #[test]
    fn rejects_negative_and_non_finite() {
        assert_eq!(Fare::new(-0.01), Err(InvalidFare(-0.01)));
        assert!(Fare::new(f64::INFINITY).is_err());
        assert!(Fare::new(f64::NAN).is_err());
        assert!(Fare::new(0.0).is_ok());
    }

    #[test]
    fn negative_zero_equals_zero() {
        assert_eq!(fare(-0.0).cmp(&Fare::ZERO), Ordering::Equal);
    }

    #[test]
    fn ordering_and_sum() {
        assert!(fare(4.0) < fare(5.0));
        let total: Fare = vec![fare(10.0), fare(8.0)].into_iter().sum();
        assert_eq!(total, fare(18.0));
        let empty: Fare = Vec::<Fare>::new().into_iter().sum();
        assert_eq!(empty, Fare::ZERO);
    }

    #[test]
    fn sum_saturates_instead_of_overflowing() {
        let huge = fare(f64::MAX);
        let total: Fare = [huge, huge].into_iter().sum();

        assert!(total.amount().is_finite());
        assert_eq!(total, huge);
        assert_eq!(Fare::try_from(total.amount()), Ok(huge));
    }

    #[test]
    fn display_two_decimals() {
        assert_eq!(fare(9.5).to_string(), "9.50");
    }

    #[test]
    fn serde_validates() {
        let f: Fare = serde_json::from_str("12.5").unwrap();
        assert_eq!(f, fare(12.5));
        assert!(serde_json::from_str::<Fare>("-3").is_err());
        assert_eq!(serde_json::to_string(&fare(4.0)).unwrap(), "4.0");
    }
}
