use log::debug;
use rust_decimal::prelude::Zero;
use rust_decimal::Decimal;

use crate::errors::*;
use crate::types::*;
use crate::utilities::*;

/// Anything that can quote the rate for converting `from` into `to`.
pub trait ExchangeRateSource {
    fn get_exchange_rate(&self, from: CurrencyCode, to: CurrencyCode) -> Result<ExchangeRate>;
}

#[derive(Debug)]
pub struct CurrencyConverterClient<'a, S: ExchangeRateSource> {
    rate_source: &'a S,
}

impl<'a, S: ExchangeRateSource> CurrencyConverterClient<'a, S> {
    pub fn new(rate_source: &'a S) -> CurrencyConverterClient<'a, S> {
        CurrencyConverterClient { rate_source }
    }

    /// Converts a positive amount, rounded to cents. Same-currency conversions
    /// return the amount untouched without asking the rate source.
    pub fn convert(&self, amount: Decimal, from: CurrencyCode, to: CurrencyCode) -> Result<Decimal> {
        if amount <= Decimal::zero() {
            bail!(ErrorKind::InvalidAmount(amount.to_string()));
        }
        if from == to {
            return Ok(amount);
        }
        let rate = self
            .rate_source
            .get_exchange_rate(from, to)
            .chain_err(|| ErrorKind::ConversionFailed(from.to_string(), to.to_string()))?;
        let converted = rate
            .convert(amount)
            .chain_err(|| ErrorKind::ConversionFailed(from.to_string(), to.to_string()))?;
        debug!("Converted {} {} to {} {} at rate {}", amount, from, converted, to, rate);
        Ok(converted)
    }

    pub fn convert_text(&self, amount_text: &str, from: CurrencyCode, to: CurrencyCode) -> Result<Decimal> {
        self.convert(parse_amount(amount_text)?, from, to)
    }
}
