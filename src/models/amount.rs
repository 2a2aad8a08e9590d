use std::fmt::{self, Display};
use std::str::FromStr;

use bigdecimal::BigDecimal;
use failure::Fail;

use models::Currency;

const MAX_FIAT_PRECISION: i64 = 2;

/// Monetary amount in minor units (cents) of a fiat currency.
///
/// Signed on purpose: voucher decreases are stored as non-positive amounts so
/// that adding them always subtracts from a total. As a monetary amount it
/// only implements checked arithmetic; overflow surfaces as `None` and is
/// treated by callers as invalid pricing input.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq, Default, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

#[derive(Debug, Clone, Fail)]
#[fail(display = "failed to parse amount")]
pub struct ParseAmountError;

impl Amount {
    pub fn zero() -> Self {
        Amount(0)
    }

    pub fn new(v: i64) -> Self {
        Amount(v)
    }

    pub fn inner(&self) -> i64 {
        self.0
    }

    /// Make addition, return None on overflow
    pub fn checked_add(&self, other: Amount) -> Option<Self> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Make subtraction, return None on overflow
    pub fn checked_sub(&self, other: Amount) -> Option<Self> {
        self.0.checked_sub(other.0).map(Amount)
    }

    pub fn checked_mul(&self, factor: i64) -> Option<Self> {
        self.0.checked_mul(factor).map(Amount)
    }

    /// Division rounded half-up (towards positive infinity on ties), the
    /// rounding mode mandated for minor-unit price math. `divisor` must be
    /// positive.
    pub fn checked_div_round_half_up(&self, divisor: i64) -> Option<Self> {
        if divisor <= 0 {
            return None;
        }
        self.0.checked_add(divisor / 2).map(|shifted| Amount(shifted.div_euclid(divisor)))
    }

    /// Negates the amount; voucher decreases are stored negated.
    pub fn checked_neg(&self) -> Option<Self> {
        self.0.checked_neg().map(Amount)
    }

    pub fn min(self, other: Amount) -> Amount {
        if self.0 <= other.0 {
            self
        } else {
            other
        }
    }

    pub fn is_non_positive(&self) -> bool {
        self.0 <= 0
    }

    pub fn from_super_unit(currency: Currency, value: BigDecimal) -> Result<Amount, ParseAmountError> {
        let exp = 10i64.pow(currency.minor_unit_digits());
        let decimal = (value * BigDecimal::from(exp)).with_scale(0);
        i64::from_str(&decimal.to_string()).map(Amount).map_err(|_| ParseAmountError)
    }

    pub fn to_super_unit(&self, currency: Currency) -> BigDecimal {
        let exp = 10i64.pow(currency.minor_unit_digits());
        let decimal = BigDecimal::from(self.0) / BigDecimal::from(exp);
        decimal.with_scale(MAX_FIAT_PRECISION)
    }
}

impl From<i64> for Amount {
    fn from(val: i64) -> Self {
        Amount(val)
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        i64::from_str(s).map(Amount::new).map_err(|_| ParseAmountError)
    }
}

impl Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&format!("{}", self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_ops() {
        assert_eq!(Amount(5).checked_add(Amount(8)), Some(Amount(13)));
        assert_eq!(Amount(i64::max_value()).checked_add(Amount(1)), None);
        assert_eq!(Amount(13).checked_sub(Amount(11)), Some(Amount(2)));
        assert_eq!(Amount(8).checked_sub(Amount(11)), Some(Amount(-3)));
        assert_eq!(Amount(-10).checked_neg(), Some(Amount(10)));
        assert_eq!(Amount(300).checked_mul(4), Some(Amount(1200)));
    }

    #[test]
    fn test_div_round_half_up() {
        // exact division
        assert_eq!(Amount(200).checked_div_round_half_up(100), Some(Amount(2)));
        // 0.5 cents rounds up
        assert_eq!(Amount(250).checked_div_round_half_up(100), Some(Amount(3)));
        // just below the tie rounds down
        assert_eq!(Amount(249).checked_div_round_half_up(100), Some(Amount(2)));
        // half-up means towards positive infinity for negative values too
        assert_eq!(Amount(-250).checked_div_round_half_up(100), Some(Amount(-2)));
        assert_eq!(Amount(-251).checked_div_round_half_up(100), Some(Amount(-3)));
        assert_eq!(Amount(100).checked_div_round_half_up(0), None);
    }

    #[test]
    fn test_super_unit_conversions() {
        assert_eq!(Amount::new(25500).to_super_unit(Currency::Usd), BigDecimal::from(255).with_scale(2));
        assert_eq!(
            Amount::from_super_unit(Currency::Usd, BigDecimal::from(255)).unwrap(),
            Amount::new(25500)
        );
        assert_eq!(Amount::new(-1000).to_super_unit(Currency::Eur), BigDecimal::from(-10).with_scale(2));
    }
}
