use log::{info, warn};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::alkansya_client::*;
use crate::constants::*;
use crate::currency_converter_client::*;
use crate::entry_forms::*;
use crate::errors::*;
use crate::types::*;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SubmissionTarget {
    Create,
    Update(i64),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SubmittedRecord {
    pub payload: Value,
    pub response: Value,
    /// Primary amount and currency as entered, when they had to be converted.
    pub converted_from: Option<(Decimal, CurrencyCode)>,
}

/// Saves entry forms, storing every amount in the account's default currency.
pub struct SubmissionPipeline<'a, S: ExchangeRateSource, B: AlkansyaBackend> {
    converter: CurrencyConverterClient<'a, S>,
    backend: &'a B,
    default_currency: CurrencyCode,
}

impl<'a, S: ExchangeRateSource, B: AlkansyaBackend> SubmissionPipeline<'a, S, B> {
    pub fn new(
        rate_source: &'a S,
        backend: &'a B,
        default_currency: CurrencyCode,
    ) -> SubmissionPipeline<'a, S, B> {
        SubmissionPipeline {
            converter: CurrencyConverterClient::new(rate_source),
            backend,
            default_currency,
        }
    }

    pub fn default_currency(&self) -> CurrencyCode {
        self.default_currency
    }

    /// Builds the outgoing payload without sending it. The form is only read,
    /// so a failure leaves it as the user left it.
    pub fn prepare<F: EntryForm>(&self, form: &F) -> Result<(Value, Option<(Decimal, CurrencyCode)>)> {
        let amounts = form.validated_amounts()?;
        let currency = form.currency();
        if currency == self.default_currency {
            return Ok((form.payload(&amounts, currency)?, None));
        }
        let converted = self
            .convert_amounts(&amounts, currency)
            .chain_err(|| ErrorKind::Validation(SUBMIT_CONVERSION_FAILED_MESSAGE.to_string()))?;
        info!(
            "Converted {} {} to {} {} for storage",
            amounts[0], currency, converted[0], self.default_currency
        );
        Ok((
            form.payload(&converted, self.default_currency)?,
            Some((amounts[0], currency)),
        ))
    }

    pub fn submit<F: EntryForm>(&self, form: &F, target: SubmissionTarget) -> Result<SubmittedRecord> {
        let kind = form.kind();
        let (payload, converted_from) = self.prepare(form)?;
        let response = match target {
            SubmissionTarget::Create => self.backend.create_record(kind, &payload),
            SubmissionTarget::Update(id) => self.backend.update_record(kind, id, &payload),
        }
        .map_err(|err| {
            warn!("Saving {} failed: {}", kind, err);
            err
        })?;
        info!("Saved {} ({:?})", kind, target);
        Ok(SubmittedRecord {
            payload,
            response,
            converted_from,
        })
    }

    fn convert_amounts(&self, amounts: &[Decimal], from: CurrencyCode) -> Result<Vec<Decimal>> {
        amounts
            .iter()
            .map(|&amount| {
                if amount.is_zero() {
                    Ok(amount)
                } else {
                    self.converter.convert(amount, from, self.default_currency)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::*;
    use crate::test_support::*;
    use serde_json::json;

    fn expense_form(amount: &str) -> ExpenseForm {
        let mut form = ExpenseForm::new(php());
        form.subject = "Hotel".to_string();
        form.category = "Travel".to_string();
        form.date = "2024-06-01".to_string();
        form.set_amount(amount);
        form
    }

    #[test]
    fn test_submit_in_default_currency_skips_conversion() {
        let rates = StubRates::new(&[]);
        let backend = StubBackend::new();
        let pipeline = SubmissionPipeline::new(&rates, &backend, php());

        let submitted = pipeline
            .submit(&expense_form("1500"), SubmissionTarget::Create)
            .unwrap();
        assert_eq!(submitted.converted_from, None);
        assert_eq!(rates.calls(), 0);
        let sent = backend.sent.borrow();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].kind, RecordKind::Expense);
        assert_eq!(sent[0].payload["amount"], json!(1500.0));
        assert_eq!(sent[0].payload["currency"], json!("PHP"));
    }

    #[test]
    fn test_submit_converts_to_default_currency() {
        let rates = StubRates::new(&[("PHP", "USD", 56.5), ("USD", "PHP", 56.5)]);
        let converter = CurrencyConverterClient::new(&rates);
        let backend = StubBackend::new();
        let pipeline = SubmissionPipeline::new(&rates, &backend, php());

        let mut form = expense_form("");
        form.change_currency(usd(), &converter);
        form.set_amount("100");
        let submitted = pipeline.submit(&form, SubmissionTarget::Create).unwrap();

        assert_eq!(submitted.converted_from, Some((Decimal::new(100, 0), usd())));
        let sent = backend.sent.borrow();
        assert_eq!(sent[0].payload["amount"], json!(5650.0));
        assert_eq!(sent[0].payload["currency"], json!("PHP"));
        // The form keeps what the user entered.
        assert_eq!(form.amount(), "100");
        assert_eq!(form.currency(), usd());
    }

    #[test]
    fn test_failed_conversion_blocks_submission() {
        let rates = StubRates::new(&[]);
        let converter = CurrencyConverterClient::new(&rates);
        let backend = StubBackend::new();
        let pipeline = SubmissionPipeline::new(&rates, &backend, php());

        let mut form = expense_form("");
        form.change_currency(eur(), &converter);
        form.set_amount("80");
        let err = pipeline
            .submit(&form, SubmissionTarget::Create)
            .unwrap_err();
        match err.kind() {
            ErrorKind::Validation(message) => assert_eq!(message, SUBMIT_CONVERSION_FAILED_MESSAGE),
            other => panic!("unexpected error kind: {:?}", other),
        }
        assert!(backend.sent.borrow().is_empty());
        assert_eq!(form.amount(), "80");
        assert_eq!(form.currency(), eur());
    }

    #[test]
    fn test_overflowing_conversion_blocks_submission() {
        let rates = StubRates::new(&[("USD", "PHP", 56.5)]);
        let converter = CurrencyConverterClient::new(&rates);
        let backend = StubBackend::new();
        let pipeline = SubmissionPipeline::new(&rates, &backend, php());

        let mut form = expense_form("");
        form.change_currency(usd(), &converter);
        form.set_amount("79228162514264337593543950335");
        let err = pipeline
            .submit(&form, SubmissionTarget::Create)
            .unwrap_err();
        match err.kind() {
            ErrorKind::Validation(message) => assert_eq!(message, SUBMIT_CONVERSION_FAILED_MESSAGE),
            other => panic!("unexpected error kind: {:?}", other),
        }
        assert!(backend.sent.borrow().is_empty());
    }

    #[test]
    fn test_invalid_form_never_reaches_backend() {
        let rates = StubRates::new(&[]);
        let backend = StubBackend::new();
        let pipeline = SubmissionPipeline::new(&rates, &backend, php());

        let mut form = expense_form("20");
        form.category.clear();
        assert!(pipeline.submit(&form, SubmissionTarget::Create).is_err());
        assert!(backend.sent.borrow().is_empty());
    }

    #[test]
    fn test_update_uses_record_id() {
        let rates = StubRates::new(&[]);
        let backend = StubBackend::new();
        let pipeline = SubmissionPipeline::new(&rates, &backend, php());

        pipeline
            .submit(&expense_form("99.90"), SubmissionTarget::Update(42))
            .unwrap();
        assert_eq!(backend.sent.borrow()[0].id, Some(42));
    }

    #[test]
    fn test_backend_failure_is_reported() {
        let rates = StubRates::new(&[]);
        let mut backend = StubBackend::new();
        backend.failing_kinds.insert(RecordKind::Expense);
        let pipeline = SubmissionPipeline::new(&rates, &backend, php());

        let err = pipeline
            .submit(&expense_form("10"), SubmissionTarget::Create)
            .unwrap_err();
        match err.kind() {
            ErrorKind::ServerError(status, _) => assert_eq!(*status, 500),
            other => panic!("unexpected error kind: {:?}", other),
        }
    }

    #[test]
    fn test_savings_goal_converts_both_amounts() {
        let rates = StubRates::new(&[("USD", "PHP", 50.0)]);
        let backend = StubBackend::new();
        let pipeline = SubmissionPipeline::new(&rates, &backend, php());

        let mut form = SavingsGoalForm::new(usd());
        form.goal = "Emergency fund".to_string();
        form.target_date = "2025-12-31".to_string();
        form.set_target_amount("1000");
        form.set_current_amount("150.50");
        pipeline.submit(&form, SubmissionTarget::Create).unwrap();

        let sent = backend.sent.borrow();
        assert_eq!(sent[0].payload["targetAmount"], json!(50000.0));
        assert_eq!(sent[0].payload["currentAmount"], json!(7525.0));
        assert_eq!(sent[0].payload["currency"], json!("PHP"));
    }

    #[test]
    fn test_successful_submission_always_uses_default_currency() {
        let rates = StubRates::new(&[
            ("USD", "PHP", 56.5),
            ("EUR", "PHP", 61.2),
            ("JPY", "PHP", 0.37),
        ]);
        let backend = StubBackend::new();
        let pipeline = SubmissionPipeline::new(&rates, &backend, php());
        let converter = CurrencyConverterClient::new(&rates);

        for currency in &[usd(), eur(), jpy(), php()] {
            let mut form = expense_form("");
            form.change_currency(*currency, &converter);
            form.set_amount("12.34");
            pipeline.submit(&form, SubmissionTarget::Create).unwrap();
        }
        for sent in backend.sent.borrow().iter() {
            assert_eq!(sent.payload["currency"], json!("PHP"));
        }
    }
}
