#![warn(clippy::all)]

#[macro_use]
extern crate error_chain;

mod alkansya_client;
mod cli;
mod constants;
mod csv_exporter;
mod currency_converter_client;
mod currency_form;
mod currency_formatter;
mod entry_forms;
mod export_processor;
mod export_records;
mod export_workbook;
mod models;
mod sheets_client;
mod submission;
mod types;
mod utilities;

#[cfg(test)]
mod test_support;

pub mod errors {
    error_chain! {
        errors {
            InvalidAmount(text: String) {
                description("invalid amount")
                display("Invalid amount: {:?}", text)
            }
            InvalidCurrency(code: String) {
                description("invalid currency code")
                display("Invalid currency code: {:?}", code)
            }
            MissingRate(from: String, to: String) {
                description("response is missing exchange rate")
                display("Response is missing exchange rate for {} to {}", from, to)
            }
            ServerError(status: u16, message: String) {
                description("server returned an error")
                display("Server responded with {}: {}", status, message)
            }
            Validation(message: String) {
                description("invalid form data")
                display("{}", message)
            }
            ConversionFailed(from: String, to: String) {
                description("currency conversion failed")
                display("Currency conversion from {} to {} failed", from, to)
            }
        }
    }
}

pub use alkansya_client::{AlkansyaBackend, AlkansyaClient};
pub use cli::run;
pub use currency_converter_client::{CurrencyConverterClient, ExchangeRateSource};
pub use currency_form::{CurrencyChange, CurrencyFieldGroup, FormMessage};
pub use entry_forms::{BudgetForm, EntryForm, ExpenseForm, IncomeForm, SavingsGoalForm};
pub use export_processor::{ExportOutcome, ExportProcessor};
pub use export_workbook::{ExportData, ExportWorkbook};
pub use models::{FinancialSummary, RecordKind, SummaryPeriod};
pub use submission::{SubmissionPipeline, SubmissionTarget, SubmittedRecord};
pub use types::{CurrencyCode, ExchangeRate};
