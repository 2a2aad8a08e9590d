use std::fmt::{self, Display};
use std::str::FromStr;

use failure::Fail;

const CENTS_IN_DOLLAR: u32 = 2;

/// Settlement currency of the storefront. All supported currencies are fiat
/// with two minor-unit digits; the minor unit defines the rounding precision
/// of every total.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Eq, PartialEq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    Usd,
    Eur,
    Rub,
}

#[derive(Debug, Clone, Fail)]
#[fail(display = "failed to parse currency")]
pub struct ParseCurrencyError;

impl Currency {
    pub fn minor_unit_digits(&self) -> u32 {
        match self {
            Currency::Usd | Currency::Eur | Currency::Rub => CENTS_IN_DOLLAR,
        }
    }
}

impl FromStr for Currency {
    type Err = ParseCurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "usd" => Ok(Currency::Usd),
            "eur" => Ok(Currency::Eur),
            "rub" => Ok(Currency::Rub),
            _ => Err(ParseCurrencyError),
        }
    }
}

impl Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Currency::Usd => f.write_str("usd"),
            Currency::Eur => f.write_str("eur"),
            Currency::Rub => f.write_str("rub"),
        }
    }
}
