use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use crate::alkansya_client::*;
use crate::currency_converter_client::*;
use crate::errors::*;
use crate::models::*;
use crate::types::*;

pub fn code(code: &str) -> CurrencyCode {
    CurrencyCode::from_str(code).unwrap()
}

pub fn usd() -> CurrencyCode {
    code("USD")
}

pub fn php() -> CurrencyCode {
    code("PHP")
}

pub fn eur() -> CurrencyCode {
    code("EUR")
}

pub fn jpy() -> CurrencyCode {
    code("JPY")
}

/// Fixed rate table; unknown pairs fail like an unreachable backend would.
pub struct StubRates {
    rates: HashMap<(CurrencyCode, CurrencyCode), f64>,
    calls: Cell<usize>,
}

impl StubRates {
    pub fn new(rates: &[(&str, &str, f64)]) -> StubRates {
        StubRates {
            rates: rates
                .iter()
                .map(|&(from, to, rate)| ((code(from), code(to)), rate))
                .collect(),
            calls: Cell::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl ExchangeRateSource for StubRates {
    fn get_exchange_rate(&self, from: CurrencyCode, to: CurrencyCode) -> Result<ExchangeRate> {
        self.calls.set(self.calls.get() + 1);
        match self.rates.get(&(from, to)) {
            Some(&rate) => ExchangeRate::from_f64(rate),
            None => bail!(ErrorKind::MissingRate(from.to_string(), to.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SentRecord {
    pub kind: RecordKind,
    pub id: Option<i64>,
    pub payload: Value,
}

pub struct StubBackend {
    pub default_currency: Option<CurrencyCode>,
    pub records: HashMap<RecordKind, Value>,
    pub failing_kinds: HashSet<RecordKind>,
    pub summary: Option<FinancialSummary>,
    pub sent: RefCell<Vec<SentRecord>>,
    pub fetches: RefCell<Vec<RecordKind>>,
}

impl StubBackend {
    pub fn new() -> StubBackend {
        StubBackend {
            default_currency: Some(php()),
            records: HashMap::new(),
            failing_kinds: HashSet::new(),
            summary: None,
            sent: RefCell::new(vec![]),
            fetches: RefCell::new(vec![]),
        }
    }

    fn record_sent(&self, kind: RecordKind, id: Option<i64>, payload: &Value) -> Result<Value> {
        if self.failing_kinds.contains(&kind) {
            bail!(ErrorKind::ServerError(500, format!("{} service unavailable", kind)));
        }
        self.sent.borrow_mut().push(SentRecord {
            kind,
            id,
            payload: payload.clone(),
        });
        Ok(payload.clone())
    }
}

impl AlkansyaBackend for StubBackend {
    fn get_default_currency(&self) -> Result<CurrencyCode> {
        self.default_currency
            .chain_err(|| ErrorKind::ServerError(401, "Unauthorized".to_string()))
    }

    fn get_records(&self, kind: RecordKind) -> Result<Value> {
        self.fetches.borrow_mut().push(kind);
        if self.failing_kinds.contains(&kind) {
            bail!(ErrorKind::ServerError(500, format!("{} service unavailable", kind)));
        }
        Ok(self.records.get(&kind).cloned().unwrap_or(Value::Null))
    }

    fn get_financial_summary(&self, _period: SummaryPeriod) -> Result<FinancialSummary> {
        self.summary
            .clone()
            .chain_err(|| ErrorKind::ServerError(404, "No summary".to_string()))
    }

    fn create_record(&self, kind: RecordKind, payload: &Value) -> Result<Value> {
        self.record_sent(kind, None, payload)
    }

    fn update_record(&self, kind: RecordKind, id: i64, payload: &Value) -> Result<Value> {
        self.record_sent(kind, Some(id), payload)
    }
}
