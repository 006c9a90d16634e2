use log::{debug, warn};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::StatusCode;
use serde_json::Value;
use std::collections::BTreeMap;

use crate::constants::*;
use crate::currency_converter_client::*;
use crate::errors::*;
use crate::models::*;
use crate::types::*;

/// The parts of the MyAlkansya REST API the forms and exports rely on.
pub trait AlkansyaBackend {
    fn get_default_currency(&self) -> Result<CurrencyCode>;
    fn get_records(&self, kind: RecordKind) -> Result<Value>;
    fn get_financial_summary(&self, period: SummaryPeriod) -> Result<FinancialSummary>;
    fn create_record(&self, kind: RecordKind, payload: &Value) -> Result<Value>;
    fn update_record(&self, kind: RecordKind, id: i64, payload: &Value) -> Result<Value>;
}

#[derive(Debug)]
pub struct AlkansyaClient {
    client: Client,
    base_url: String,
    auth_token: String,
}

impl AlkansyaClient {
    pub fn new(base_url: &str, auth_token: String) -> Result<AlkansyaClient> {
        let client = Client::builder()
            .build()
            .chain_err(|| "Failed to build HTTP client")?;
        Ok(AlkansyaClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
        })
    }

    pub fn get_all_rates(&self, base: CurrencyCode) -> Result<BTreeMap<String, f64>> {
        let response = self.get(&format!("{}/{}", ALL_RATES_PATH, base), &[])?;
        serde_json::from_value(response)
            .chain_err(|| format!("Failed to parse exchange rates for {}", base))
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn get(&self, path: &str, query: &[(&str, String)]) -> Result<Value> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, query);
        self.send(self.client.get(&url).query(query))
    }

    fn send_json(&self, request: RequestBuilder, payload: &Value) -> Result<Value> {
        debug!("Request payload: {}", payload);
        self.send(request.json(payload))
    }

    fn send(&self, request: RequestBuilder) -> Result<Value> {
        let response = request
            .bearer_auth(&self.auth_token)
            .send()
            .chain_err(|| "Failed to get response")?;
        Self::parse_response(response)
    }

    fn parse_response(response: Response) -> Result<Value> {
        let status = response.status();
        let body = response.text().chain_err(|| "Failed to read response")?;
        response_value(status, &body)
    }
}

impl ExchangeRateSource for AlkansyaClient {
    fn get_exchange_rate(&self, from: CurrencyCode, to: CurrencyCode) -> Result<ExchangeRate> {
        let response = self.get(
            RATE_PATH,
            &[("from", from.to_string()), ("to", to.to_string())],
        )?;
        rate_from_response(&response, from, to)
    }
}

impl AlkansyaBackend for AlkansyaClient {
    fn get_default_currency(&self) -> Result<CurrencyCode> {
        let profile: UserProfile = serde_json::from_value(self.get(USER_PROFILE_PATH, &[])?)
            .chain_err(|| "Failed to parse user profile")?;
        match profile.currency.as_ref().map(|code| code.trim()) {
            Some(code) if !code.is_empty() => CurrencyCode::from_str(code),
            _ => {
                warn!("User profile has no currency; using {}", DEFAULT_CURRENCY);
                Ok(CurrencyCode::default_currency())
            }
        }
    }

    fn get_records(&self, kind: RecordKind) -> Result<Value> {
        self.get(kind.list_path(), &[])
            .chain_err(|| format!("Failed to load {} records", kind))
    }

    fn get_financial_summary(&self, period: SummaryPeriod) -> Result<FinancialSummary> {
        let response = self.get(
            FINANCIAL_SUMMARY_PATH,
            &[
                ("month", period.month.to_string()),
                ("year", period.year.to_string()),
            ],
        )?;
        serde_json::from_value(response).chain_err(|| "Failed to parse financial summary")
    }

    fn create_record(&self, kind: RecordKind, payload: &Value) -> Result<Value> {
        let url = self.url(kind.create_path());
        debug!("POST {}", url);
        self.send_json(self.client.post(&url), payload)
            .chain_err(|| format!("Failed to save new {}", kind))
    }

    fn update_record(&self, kind: RecordKind, id: i64, payload: &Value) -> Result<Value> {
        let url = self.url(&kind.update_path(id));
        debug!("PUT {}", url);
        self.send_json(self.client.put(&url), payload)
            .chain_err(|| format!("Failed to update {} {}", kind, id))
    }
}

/// Reads a response body as JSON, falling back to plain text. Error statuses
/// become `ServerError` carrying the body's message.
fn response_value(status: StatusCode, body: &str) -> Result<Value> {
    let parsed = if body.trim().is_empty() {
        Value::Null
    } else {
        serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string()))
    };
    if status.is_client_error() || status.is_server_error() {
        bail!(ErrorKind::ServerError(
            status.as_u16(),
            error_message(&parsed).unwrap_or_else(|| status.to_string())
        ));
    }
    Ok(parsed)
}

fn rate_from_response(
    response: &Value,
    from: CurrencyCode,
    to: CurrencyCode,
) -> Result<ExchangeRate> {
    let missing_rate = || ErrorKind::MissingRate(from.to_string(), to.to_string());
    let rate = response
        .get("rate")
        .and_then(Value::as_f64)
        .chain_err(missing_rate)?;
    ExchangeRate::from_f64(rate).chain_err(missing_rate)
}

fn error_message(body: &Value) -> Option<String> {
    match body {
        Value::Object(map) => ["error", "message"]
            .iter()
            .filter_map(|key| map.get(*key))
            .filter_map(|value| value.as_str())
            .map(|message| message.to_string())
            .next(),
        Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
        _ => None,
    }
}
