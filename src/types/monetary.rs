use crate::types::errors::MonetaryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fmt::{Display, Formatter};

/// Two fixed decimal places on percentages, so 10_000 is 100.00%.
const PERCENT_SCALE: i64 = 10_000;

/// A monetary quantity in integer minor units (e.g. cents).
///
/// The direction of a movement is carried by the transaction action, never
/// by the sign of the amount; negative values only show up as rejected
/// inputs or intermediate arithmetic.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Monetary(i64);

impl Monetary {
    pub const ZERO: Monetary = Monetary(0);

    pub const fn from_minor_units(units: i64) -> Self {
        Monetary(units)
    }

    pub const fn minor_units(self) -> i64 {
        self.0
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Monetary) -> Option<Monetary> {
        self.0.checked_add(rhs.0).map(Monetary)
    }

    pub fn checked_sub(self, rhs: Monetary) -> Option<Monetary> {
        self.0.checked_sub(rhs.0).map(Monetary)
    }
}

impl Display for Monetary {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A percentage with two fixed decimal places: `Percent::new(250)` is 2.50%.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(i64);

impl Percent {
    pub const fn new(value: i64) -> Self {
        Percent(value)
    }

    pub const fn value(self) -> i64 {
        self.0
    }
}

/// Service-percent fee records store their percentage in the `amount`
/// column, so the raw minor-unit value reads directly as a percentage.
impl From<Monetary> for Percent {
    fn from(amount: Monetary) -> Self {
        Percent(amount.minor_units())
    }
}

impl Display for Percent {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(formatter, "{}{}.{:02}%", sign, abs / 100, abs % 100)
    }
}

/// Computes `percent` of `base`, rounding half up on the minor unit.
///
/// Pure fixed-point math: the product is taken in `i128` and scaled back
/// down, so `percent_of(10_000, 250)` is exactly `250` on every platform.
///
/// # Errors
/// - [`MonetaryError::InvalidArgument`] when `base` or `percent` is negative.
/// - [`MonetaryError::Overflow`] when the result does not fit a minor-unit value.
pub fn percent_of(base: Monetary, percent: Percent) -> Result<Monetary, MonetaryError> {
    if base.is_negative() {
        return Err(MonetaryError::InvalidArgument("base amount is negative".to_string()));
    }

    if percent.0 < 0 {
        return Err(MonetaryError::InvalidArgument("percent is negative".to_string()));
    }

    let scaled = (base.0 as i128) * (percent.0 as i128) + (PERCENT_SCALE as i128) / 2;
    let result = scaled / PERCENT_SCALE as i128;

    i64::try_from(result).map(Monetary).map_err(|_| MonetaryError::Overflow)
}
