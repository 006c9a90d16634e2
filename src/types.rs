use rust_decimal::prelude::{FromPrimitive, Zero};
use rust_decimal::{Decimal, RoundingStrategy};
use std::borrow::Cow;
use std::fmt;

use crate::constants::*;
use crate::errors::*;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct CurrencyCode([u8; 3]);

#[derive(Clone, Copy, Debug, PartialEq, PartialOrd)]
pub struct ExchangeRate(Decimal);

impl CurrencyCode {
    /// Parses a three-letter code, case-insensitively.
    pub fn from_str(code: &str) -> Result<CurrencyCode> {
        let trimmed = code.trim();
        if !CURRENCY_CODE_REGEX.is_match(trimmed) {
            bail!(ErrorKind::InvalidCurrency(code.to_string()));
        }
        match trimmed.to_ascii_uppercase().as_bytes() {
            [a, b, c] => Ok(CurrencyCode([*a, *b, *c])),
            _ => bail!(ErrorKind::InvalidCurrency(code.to_string())),
        }
    }

    pub fn to_str(&self) -> Cow<str> {
        // Safe to use 'from_utf8_lossy', since the bytes are validated ASCII letters.
        String::from_utf8_lossy(&self.0)
    }

    pub fn default_currency() -> CurrencyCode {
        CurrencyCode::from_str(DEFAULT_CURRENCY).expect("DEFAULT_CURRENCY should be a valid code")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl ExchangeRate {
    pub fn from_f64(rate: f64) -> Result<ExchangeRate> {
        let decimal = Decimal::from_f64(rate)
            .chain_err(|| format!("Exchange rate is not a finite number: {}", rate))?;
        ensure!(
            decimal > Decimal::zero(),
            format!("Exchange rate must be positive: {}", rate)
        );
        Ok(ExchangeRate(decimal))
    }

    pub fn to_decimal(self) -> Decimal {
        self.0
    }

    /// Scales `amount` by the rate, rounded half-to-even to whole cents.
    pub fn convert(self, amount: Decimal) -> Result<Decimal> {
        let scaled = amount
            .checked_mul(self.0)
            .chain_err(|| ErrorKind::InvalidAmount(amount.to_string()))?;
        Ok(scaled.round_dp_with_strategy(
            AMOUNT_DECIMAL_PLACES,
            RoundingStrategy::MidpointNearestEven,
        ))
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
