use rust_decimal::prelude::{ToPrimitive, Zero};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::constants::*;
use crate::types::*;
use crate::utilities::*;

const GROUP_SEPARATOR: &str = ",";
const DECIMAL_SEPARATOR: &str = ".";

/// Formats amounts for export cells, e.g. `₱1,234.50` or `-$12.35`.
#[derive(Clone, Copy, Debug)]
pub struct CurrencyFormatter {
    default_currency: CurrencyCode,
}

impl CurrencyFormatter {
    pub fn new(default_currency: CurrencyCode) -> CurrencyFormatter {
        CurrencyFormatter { default_currency }
    }

    pub fn default_currency(&self) -> CurrencyCode {
        self.default_currency
    }

    /// Resolves a record's currency text, falling back to the default code
    /// when it is missing or not a currency code.
    pub fn resolve_currency(&self, code: Option<&str>) -> CurrencyCode {
        code.and_then(|code| CurrencyCode::from_str(code).ok())
            .unwrap_or(self.default_currency)
    }

    pub fn format_with_symbol(&self, currency: CurrencyCode, amount: Decimal) -> String {
        let code = currency.to_str();
        let symbol = CURRENCY_SYMBOLS
            .get(code.as_ref())
            .map(|symbol| symbol.to_string())
            .unwrap_or_else(|| code.to_string());
        self.format_custom(&symbol, "", true, amount)
    }

    pub fn format_with_code(&self, currency: CurrencyCode, amount: Decimal) -> String {
        self.format_custom(&currency.to_str(), " ", false, amount)
    }

    pub fn format_f64(&self, currency: CurrencyCode, amount: f64) -> String {
        self.format_with_symbol(currency, decimal_from_f64(amount))
    }

    fn format_custom(
        &self,
        currency_symbol: &str,
        currency_symbol_spacer: &str,
        minus_before_symbol: bool,
        amount: Decimal,
    ) -> String {
        let raw_formatted = format!(
            "{:.*}",
            AMOUNT_DECIMAL_PLACES as usize,
            amount.abs().round_dp_with_strategy(
                AMOUNT_DECIMAL_PLACES,
                RoundingStrategy::MidpointNearestEven
            )
        );
        let mut split_around_decimal = raw_formatted.splitn(2, '.');
        let before_decimal = split_around_decimal.next().unwrap_or("0");
        let after_decimal = split_around_decimal.next().unwrap_or("00");
        let negative = amount < Decimal::zero() && raw_formatted.chars().any(|c| c != '0' && c != '.');
        let group_separated = format!(
            "{}{}{}{}",
            if !minus_before_symbol && negative { "-" } else { "" },
            add_group_separators(before_decimal),
            DECIMAL_SEPARATOR,
            after_decimal
        );
        let with_symbol = format!(
            "{}{}{}",
            currency_symbol, currency_symbol_spacer, group_separated
        );
        if minus_before_symbol && negative {
            format!("-{}", with_symbol)
        } else {
            with_symbol
        }
    }
}

fn add_group_separators(before_decimal: &str) -> String {
    before_decimal
        .chars()
        .rev()
        .collect::<Vec<char>>()
        .chunks(3)
        .map(|chunk| chunk.iter().collect())
        .collect::<Vec<String>>()
        .join(GROUP_SEPARATOR)
        .chars()
        .rev()
        .collect()
}

/// Whole-number percentage of a ratio such as `0.456`, truncated toward zero.
pub fn format_ratio_percentage(ratio: f64) -> String {
    format!("{}%", truncate_percent(ratio * 100.0))
}

/// Progress of `current` toward `target`; a zero target reports no progress.
pub fn format_progress_percentage(current: f64, target: f64) -> String {
    if target == 0.0 {
        return "0%".to_string();
    }
    format!("{}%", truncate_percent(current / target * 100.0))
}

fn truncate_percent(percent: f64) -> i64 {
    if percent.is_finite() {
        percent.trunc().to_i64().unwrap_or(0)
    } else {
        0
    }
}
