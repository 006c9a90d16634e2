use chrono::NaiveDate;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive, Zero};
use rust_decimal::{Decimal, RoundingStrategy};
use std::env;
use std::ffi::OsStr;
use std::str::FromStr;

use crate::constants::*;
use crate::errors::*;

const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

pub fn parse_iso_date(iso_date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(iso_date.trim(), ISO_DATE_FORMAT)
        .chain_err(|| format!("Invalid ISO date string (YYYY-MM-DD): {}", iso_date))
}

/// Parses amount text as typed into a form, accepting `1,234.50` style grouping.
pub fn parse_amount(text: &str) -> Result<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !AMOUNT_REGEX.is_match(trimmed) {
        bail!(ErrorKind::InvalidAmount(text.to_string()));
    }
    let ungrouped = trimmed.replace(',', "");
    let normalized = if ungrouped.starts_with('.') {
        format!("0{}", ungrouped)
    } else {
        ungrouped
    };
    Decimal::from_str(&normalized).chain_err(|| ErrorKind::InvalidAmount(text.to_string()))
}

pub fn format_amount(amount: Decimal) -> String {
    format!(
        "{:.*}",
        AMOUNT_DECIMAL_PLACES as usize,
        amount.round_dp_with_strategy(AMOUNT_DECIMAL_PLACES, RoundingStrategy::MidpointNearestEven)
    )
}

pub fn decimal_from_f64(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(Decimal::zero)
}

pub fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

pub fn default_env<V: AsRef<OsStr>>(var_name: &str, default_value: V) {
    if let Err(env::VarError::NotPresent) = env::var(var_name) {
        env::set_var(var_name, default_value);
    }
}
