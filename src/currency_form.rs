use log::{debug, warn};
use rust_decimal::prelude::Zero;
use rust_decimal::Decimal;

use crate::constants::*;
use crate::currency_converter_client::*;
use crate::errors::*;
use crate::types::*;
use crate::utilities::*;

/// Amounts and currency as they were before the first conversion.
#[derive(Clone, Debug, PartialEq)]
struct ConversionSnapshot {
    amounts: Vec<String>,
    currency: CurrencyCode,
}

#[derive(Clone, Debug, PartialEq)]
pub enum FormMessage {
    Confirmation(String),
    Warning(String),
}

#[derive(Clone, Debug, PartialEq)]
pub enum CurrencyChange {
    Unchanged,
    Selected,
    Converted,
    Restored,
    ConversionFailed,
}

/// One or more amount fields sharing a currency selector. The first amount is
/// the primary one; it decides whether a currency change converts.
#[derive(Clone, Debug)]
pub struct CurrencyFieldGroup {
    amounts: Vec<String>,
    currency: CurrencyCode,
    snapshot: Option<ConversionSnapshot>,
    message: Option<FormMessage>,
}

impl CurrencyFieldGroup {
    pub fn new(field_count: usize, currency: CurrencyCode) -> CurrencyFieldGroup {
        assert!(field_count > 0, "A currency field group needs at least one amount");
        CurrencyFieldGroup {
            amounts: vec![String::new(); field_count],
            currency,
            snapshot: None,
            message: None,
        }
    }

    pub fn with_amounts(amounts: &[&str], currency: CurrencyCode) -> CurrencyFieldGroup {
        let mut group = CurrencyFieldGroup::new(amounts.len(), currency);
        for (index, amount) in amounts.iter().enumerate() {
            group.amounts[index] = amount.to_string();
        }
        group
    }

    pub fn amount(&self, index: usize) -> &str {
        &self.amounts[index]
    }

    pub fn amounts(&self) -> &[String] {
        &self.amounts
    }

    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    pub fn message(&self) -> Option<&FormMessage> {
        self.message.as_ref()
    }

    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn original_currency(&self) -> Option<CurrencyCode> {
        self.snapshot.as_ref().map(|snapshot| snapshot.currency)
    }

    /// A hand edit invalidates any remembered pre-conversion values.
    pub fn set_amount(&mut self, index: usize, text: &str) {
        self.amounts[index] = text.to_string();
        self.snapshot = None;
        self.message = None;
    }

    pub fn change_currency<S: ExchangeRateSource>(
        &mut self,
        new_currency: CurrencyCode,
        converter: &CurrencyConverterClient<S>,
    ) -> CurrencyChange {
        if new_currency == self.currency {
            return CurrencyChange::Unchanged;
        }
        if self.amounts[0].trim().is_empty() {
            self.currency = new_currency;
            return CurrencyChange::Selected;
        }

        if let Some(snapshot) = self.snapshot.take() {
            if snapshot.currency == new_currency {
                debug!(
                    "Restoring {:?} {} instead of converting back",
                    snapshot.amounts, snapshot.currency
                );
                self.amounts = snapshot.amounts;
                self.currency = new_currency;
                self.message = None;
                return CurrencyChange::Restored;
            }
            self.snapshot = Some(snapshot);
        } else {
            self.snapshot = Some(ConversionSnapshot {
                amounts: self.amounts.clone(),
                currency: self.currency,
            });
        }

        let from_currency = self.currency;
        match self.convert_amounts(converter, from_currency, new_currency) {
            Ok(converted) => {
                self.message = Some(FormMessage::Confirmation(format!(
                    "Converted {} {} to {} {}",
                    self.amounts[0].trim(),
                    from_currency,
                    converted[0],
                    new_currency
                )));
                self.amounts = converted;
                self.currency = new_currency;
                CurrencyChange::Converted
            }
            Err(err) => {
                warn!(
                    "Conversion from {} to {} failed: {}",
                    from_currency, new_currency, err
                );
                self.currency = new_currency;
                self.message = Some(FormMessage::Warning(CONVERSION_FAILED_WARNING.to_string()));
                CurrencyChange::ConversionFailed
            }
        }
    }

    /// Parses every amount; empty secondary fields count as zero.
    pub fn parsed_amounts(&self) -> Result<Vec<Decimal>> {
        self.amounts
            .iter()
            .enumerate()
            .map(|(index, text)| {
                if index > 0 && text.trim().is_empty() {
                    Ok(Decimal::zero())
                } else {
                    parse_amount(text)
                }
            })
            .collect()
    }

    // All fields convert or none do.
    fn convert_amounts<S: ExchangeRateSource>(
        &self,
        converter: &CurrencyConverterClient<S>,
        from: CurrencyCode,
        to: CurrencyCode,
    ) -> Result<Vec<String>> {
        self.amounts
            .iter()
            .enumerate()
            .map(|(index, text)| {
                if index == 0 {
                    return converter.convert_text(text, from, to).map(format_amount);
                }
                if text.trim().is_empty() {
                    return Ok(text.clone());
                }
                let amount = parse_amount(text)?;
                if amount.is_zero() {
                    Ok(text.clone())
                } else {
                    converter.convert(amount, from, to).map(format_amount)
                }
            })
            .collect()
    }
}
