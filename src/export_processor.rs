use chrono::NaiveDateTime;
use log::{debug, warn};
use serde_json::Value;
use std::path::{Path, PathBuf};

use crate::alkansya_client::*;
use crate::csv_exporter::*;
use crate::errors::*;
use crate::export_workbook::*;
use crate::models::*;
use crate::sheets_client::*;
use crate::types::*;

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExportOutcome {
    Sheets(String),
    Csv(PathBuf),
}

pub struct ExportProcessor<'a, B: AlkansyaBackend> {
    backend: &'a B,
    default_currency: CurrencyCode,
    output_dir: &'a Path,
}

impl<'a, B: AlkansyaBackend> ExportProcessor<'a, B> {
    pub fn new(
        backend: &'a B,
        default_currency: CurrencyCode,
        output_dir: &'a Path,
    ) -> ExportProcessor<'a, B> {
        ExportProcessor {
            backend,
            default_currency,
            output_dir,
        }
    }

    /// Exports to a spreadsheet when a publisher is given, otherwise (or if
    /// publishing fails) to a CSV file.
    pub fn run<P: SpreadsheetPublisher>(
        &self,
        period: SummaryPeriod,
        publisher: Option<&P>,
        generated_at: NaiveDateTime,
    ) -> Result<ExportOutcome> {
        let data = self.collect(period);
        let currency = self.export_currency(data.summary.as_ref());
        let workbook = ExportWorkbook::build(data, currency, generated_at);

        if let Some(publisher) = publisher {
            println!("Publishing export to Google Sheets...");
            match publisher.publish(&workbook) {
                Ok(url) => return Ok(ExportOutcome::Sheets(url)),
                Err(err) => {
                    warn!("Google Sheets export failed, falling back to CSV: {}", err);
                    println!("Google Sheets export failed; writing CSV instead.");
                }
            }
        }
        println!("Writing CSV export...");
        save_workbook_csv(&workbook, self.output_dir).map(ExportOutcome::Csv)
    }

    /// Fetches every collection in turn. A failed fetch exports as empty.
    pub fn collect(&self, period: SummaryPeriod) -> ExportData {
        let summary = match self.backend.get_financial_summary(period) {
            Ok(summary) => Some(summary),
            Err(err) => {
                warn!("Financial summary unavailable: {}", err);
                None
            }
        };
        ExportData {
            incomes: self.fetch(RecordKind::Income),
            expenses: self.fetch(RecordKind::Expense),
            budgets: self.fetch(RecordKind::Budget),
            savings_goals: self.fetch(RecordKind::SavingsGoal),
            summary,
        }
    }

    fn fetch(&self, kind: RecordKind) -> Value {
        println!("Loading {} records...", kind);
        match self.backend.get_records(kind) {
            Ok(records) => {
                debug!("Received {} records: {}", kind, records);
                records
            }
            Err(err) => {
                warn!("Exporting no {} records: {}", kind, err);
                Value::Null
            }
        }
    }

    fn export_currency(&self, summary: Option<&FinancialSummary>) -> CurrencyCode {
        summary
            .and_then(|summary| CurrencyCode::from_str(&summary.currency).ok())
            .unwrap_or(self.default_currency)
    }
}
