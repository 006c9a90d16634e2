use chrono::NaiveDateTime;
use serde_json::Value;

use crate::constants::*;
use crate::currency_formatter::*;
use crate::export_records::*;
use crate::models::*;
use crate::types::*;

/// Everything fetched for one export. Collections stay untyped until rendering.
#[derive(Clone, Debug, Default)]
pub struct ExportData {
    pub incomes: Value,
    pub expenses: Value,
    pub budgets: Value,
    pub savings_goals: Value,
    pub summary: Option<FinancialSummary>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExportSection {
    pub sheet_name: &'static str,
    pub title: &'static str,
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExportWorkbook {
    pub currency: CurrencyCode,
    pub generated_at: NaiveDateTime,
    pub sections: Vec<ExportSection>,
}

impl ExportWorkbook {
    pub fn build(
        data: ExportData,
        currency: CurrencyCode,
        generated_at: NaiveDateTime,
    ) -> ExportWorkbook {
        let formatter = CurrencyFormatter::new(currency);
        let sections = vec![
            summary_section(data.summary.as_ref(), &formatter),
            ExportSection {
                sheet_name: INCOME_SHEET,
                title: INCOME_SECTION,
                columns: INCOME_COLUMNS.to_vec(),
                rows: record_rows::<Income, _>(data.incomes, NO_INCOME_RECORDS, |record| {
                    income_row(record, &formatter)
                }),
            },
            ExportSection {
                sheet_name: EXPENSE_SHEET,
                title: EXPENSE_SECTION,
                columns: EXPENSE_COLUMNS.to_vec(),
                rows: record_rows::<Expense, _>(data.expenses, NO_EXPENSE_RECORDS, |record| {
                    expense_row(record, &formatter)
                }),
            },
            ExportSection {
                sheet_name: BUDGET_SHEET,
                title: BUDGET_SECTION,
                columns: BUDGET_COLUMNS.to_vec(),
                rows: record_rows::<Budget, _>(data.budgets, NO_BUDGET_RECORDS, |record| {
                    budget_row(record, &formatter)
                }),
            },
            ExportSection {
                sheet_name: SAVINGS_GOAL_SHEET,
                title: SAVINGS_GOAL_SECTION,
                columns: SAVINGS_GOAL_COLUMNS.to_vec(),
                rows: record_rows::<SavingsGoal, _>(
                    data.savings_goals,
                    NO_SAVINGS_GOALS,
                    |record| savings_goal_row(record, &formatter),
                ),
            },
        ];
        ExportWorkbook {
            currency,
            generated_at,
            sections,
        }
    }

    pub fn title(&self) -> String {
        format!(
            "{}{}",
            EXPORT_TITLE_PREFIX,
            self.generated_at.format(EXPORT_TIMESTAMP_FORMAT)
        )
    }

    pub fn file_name(&self) -> String {
        format!(
            "{}{}.csv",
            EXPORT_FILE_PREFIX,
            self.generated_at.format(EXPORT_TIMESTAMP_FORMAT)
        )
    }

    pub fn footer(&self) -> Vec<String> {
        vec![
            EXPORT_FOOTER_LABEL.to_string(),
            self.generated_at
                .format(EXPORT_FOOTER_TIMESTAMP_FORMAT)
                .to_string(),
        ]
    }

    pub fn section(&self, sheet_name: &str) -> Option<&ExportSection> {
        self.sections
            .iter()
            .find(|section| section.sheet_name == sheet_name)
    }
}

impl ExportSection {
    /// Header row followed by the data rows, as one sheet's cell values.
    pub fn sheet_values(&self) -> Vec<Vec<String>> {
        let mut values = Vec::with_capacity(self.rows.len() + 1);
        values.push(self.columns.iter().map(|column| column.to_string()).collect());
        values.extend(self.rows.iter().cloned());
        values
    }
}

fn summary_section(summary: Option<&FinancialSummary>, formatter: &CurrencyFormatter) -> ExportSection {
    let currency = formatter.default_currency();
    let amount_row = |label: &str, amount: f64| vec![label.to_string(), formatter.format_f64(currency, amount)];
    let rows = match summary {
        Some(summary) => vec![
            amount_row("Total Income", summary.total_income),
            amount_row("Total Expenses", summary.total_expenses),
            amount_row("Total Budget", summary.total_budget),
            amount_row("Total Savings", summary.total_savings),
            amount_row("Net Cashflow", summary.net_cashflow),
            vec![
                "Budget Utilization".to_string(),
                format_ratio_percentage(summary.budget_utilization),
            ],
            vec![
                "Savings Rate".to_string(),
                format_ratio_percentage(summary.savings_rate),
            ],
        ],
        None => vec![
            amount_row("Total Income", 0.0),
            amount_row("Total Expenses", 0.0),
            amount_row("Total Budget", 0.0),
            amount_row("Total Savings", 0.0),
        ],
    };
    ExportSection {
        sheet_name: SUMMARY_SHEET,
        title: SUMMARY_SECTION,
        columns: SUMMARY_COLUMNS.to_vec(),
        rows,
    }
}

fn record_rows<T, F>(collection: Value, placeholder: &str, to_row: F) -> Vec<Vec<String>>
where
    T: FieldSource + serde::de::DeserializeOwned,
    F: Fn(&RecordShape<T>) -> Vec<String>,
{
    let records = read_collection::<T>(collection);
    if records.is_empty() {
        return vec![vec![placeholder.to_string()]];
    }
    records.iter().map(to_row).collect()
}

fn income_row(record: &impl FieldSource, formatter: &CurrencyFormatter) -> Vec<String> {
    let currency = formatter.resolve_currency(record.text("currency").as_deref());
    vec![
        record.text_or_default("id"),
        record.text_or_default("source"),
        formatter.format_f64(currency, record.number_or_zero("amount")),
        record.text_or_default("date"),
        currency.to_string(),
    ]
}

fn expense_row(record: &impl FieldSource, formatter: &CurrencyFormatter) -> Vec<String> {
    let currency = formatter.resolve_currency(record.text("currency").as_deref());
    vec![
        record.text_or_default("id"),
        record.text_or_default("subject"),
        record.text_or_default("category"),
        formatter.format_f64(currency, record.number_or_zero("amount")),
        record.text_or_default("date"),
        currency.to_string(),
    ]
}

fn budget_row(record: &impl FieldSource, formatter: &CurrencyFormatter) -> Vec<String> {
    let currency = formatter.resolve_currency(record.text("currency").as_deref());
    vec![
        record.text_or_default("id"),
        record.text_or_default("category"),
        formatter.format_f64(currency, record.number_or_zero("monthlyBudget")),
        formatter.format_f64(currency, record.number_or_zero("totalSpent")),
        record.text_or_default("budgetMonth"),
        record.text_or_default("budgetYear"),
    ]
}

fn savings_goal_row(record: &impl FieldSource, formatter: &CurrencyFormatter) -> Vec<String> {
    let currency = formatter.resolve_currency(record.text("currency").as_deref());
    let target = record.number_or_zero("targetAmount");
    let current = record.number_or_zero("currentAmount");
    vec![
        record.text_or_default("id"),
        record.text_or_default("goal"),
        formatter.format_f64(currency, target),
        formatter.format_f64(currency, current),
        record.text_or_default("targetDate"),
        format_progress_percentage(current, target),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use chrono::NaiveDate;
    use lazy_static::lazy_static;
    use serde_json::json;

    lazy_static! {
        static ref JUNE_SUMMARY: FinancialSummary = FinancialSummary {
            total_income: 50000.0,
            total_expenses: 12345.675,
            total_budget: 20000.0,
            total_savings: 7500.5,
            net_cashflow: -1200.0,
            budget_utilization: 0.6179,
            savings_rate: 0.15,
            currency: "PHP".to_string(),
        };
    }

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 30)
            .and_then(|date| date.and_hms_opt(14, 5, 9))
            .unwrap()
    }

    fn rows(workbook: &ExportWorkbook, sheet_name: &str) -> Vec<Vec<String>> {
        workbook.section(sheet_name).unwrap().rows.clone()
    }

    #[test]
    fn test_empty_export_has_placeholders() {
        let workbook = ExportWorkbook::build(ExportData::default(), php(), generated_at());
        assert_eq!(rows(&workbook, INCOME_SHEET), vec![vec![NO_INCOME_RECORDS.to_string()]]);
        assert_eq!(rows(&workbook, EXPENSE_SHEET), vec![vec![NO_EXPENSE_RECORDS.to_string()]]);
        assert_eq!(rows(&workbook, BUDGET_SHEET), vec![vec![NO_BUDGET_RECORDS.to_string()]]);
        assert_eq!(
            rows(&workbook, SAVINGS_GOAL_SHEET),
            vec![vec![NO_SAVINGS_GOALS.to_string()]]
        );
        assert_eq!(
            rows(&workbook, SUMMARY_SHEET),
            vec![
                vec!["Total Income".to_string(), "₱0.00".to_string()],
                vec!["Total Expenses".to_string(), "₱0.00".to_string()],
                vec!["Total Budget".to_string(), "₱0.00".to_string()],
                vec!["Total Savings".to_string(), "₱0.00".to_string()],
            ]
        );
    }

    #[test]
    fn test_summary_rows() {
        let data = ExportData {
            summary: Some(JUNE_SUMMARY.clone()),
            ..ExportData::default()
        };
        let workbook = ExportWorkbook::build(data, php(), generated_at());
        let summary = rows(&workbook, SUMMARY_SHEET);
        assert_eq!(summary.len(), 7);
        assert_eq!(summary[0][1], "₱50,000.00");
        assert_eq!(summary[3][1], "₱7,500.50");
        assert_eq!(summary[4][1], "-₱1,200.00");
        assert_eq!(summary[5], vec!["Budget Utilization".to_string(), "61%".to_string()]);
        assert_eq!(summary[6], vec!["Savings Rate".to_string(), "15%".to_string()]);
    }

    #[test]
    fn test_mixed_shapes_render_rows() {
        let data = ExportData {
            incomes: json!([
                { "id": 1, "source": "Salary", "date": "2024-06-15", "amount": 1234.5, "currency": "USD" },
                { "source": "Gift", "amount": "300" },
                17,
            ]),
            expenses: json!({ "body": [
                { "id": 2, "subject": "Lunch", "category": "Food", "date": "2024-06-02", "amount": 250.0 }
            ]}),
            ..ExportData::default()
        };
        let workbook = ExportWorkbook::build(data, php(), generated_at());
        assert_eq!(
            rows(&workbook, INCOME_SHEET),
            vec![
                vec!["1", "Salary", "$1,234.50", "2024-06-15", "USD"],
                vec!["", "Gift", "₱300.00", "", "PHP"],
                vec!["", "", "₱0.00", "", "PHP"],
            ]
            .into_iter()
            .map(|row| row.into_iter().map(String::from).collect::<Vec<_>>())
            .collect::<Vec<_>>()
        );
        assert_eq!(
            rows(&workbook, EXPENSE_SHEET)[0],
            vec!["2", "Lunch", "Food", "₱250.00", "2024-06-02", "PHP"]
        );
    }

    #[test]
    fn test_budget_and_savings_rows() {
        let data = ExportData {
            budgets: json!([{
                "id": 5, "category": "Transport", "monthlyBudget": 3000.0,
                "totalSpent": 1250.25, "budgetMonth": 6, "budgetYear": 2024
            }]),
            savings_goals: json!([
                { "id": 8, "goal": "Laptop", "targetAmount": 1000.0, "currentAmount": 333.0,
                  "targetDate": "2024-12-31", "currency": "EUR" },
                { "id": 9, "goal": "Someday", "targetAmount": 0.0, "currentAmount": 50.0,
                  "targetDate": "" },
            ]),
            ..ExportData::default()
        };
        let workbook = ExportWorkbook::build(data, php(), generated_at());
        assert_eq!(
            rows(&workbook, BUDGET_SHEET)[0],
            vec!["5", "Transport", "₱3,000.00", "₱1,250.25", "6", "2024"]
        );
        let goals = rows(&workbook, SAVINGS_GOAL_SHEET);
        assert_eq!(
            goals[0],
            vec!["8", "Laptop", "€1,000.00", "€333.00", "2024-12-31", "33%"]
        );
        assert_eq!(goals[1][5], "0%");
    }

    #[test]
    fn test_titles_and_sheet_values() {
        let workbook = ExportWorkbook::build(ExportData::default(), usd(), generated_at());
        assert_eq!(workbook.title(), "MyAlkansya Financial Export - 20240630_140509");
        assert_eq!(workbook.file_name(), "MyAlkansya_Export_20240630_140509.csv");
        assert_eq!(
            workbook.footer(),
            vec!["Generated by MyAlkansya App on", "2024-06-30 14:05:09"]
        );
        let values = workbook.section(INCOME_SHEET).unwrap().sheet_values();
        assert_eq!(values[0], vec!["ID", "Source", "Amount", "Date", "Currency"]);
        assert_eq!(values[1], vec![NO_INCOME_RECORDS]);
        let sheet_names: Vec<&str> = workbook.sections.iter().map(|s| s.sheet_name).collect();
        assert_eq!(
            sheet_names,
            vec![SUMMARY_SHEET, INCOME_SHEET, EXPENSE_SHEET, BUDGET_SHEET, SAVINGS_GOAL_SHEET]
        );
    }
}
