use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashMap;

pub const DEFAULT_CURRENCY: &str = "PHP";
pub const DEFAULT_API_URL: &str = "http://localhost:8080";
pub const EXPORT_DIRECTORY_NAME: &str = "exports";
pub const AMOUNT_DECIMAL_PLACES: u32 = 2;

pub const API_URL_ARG: &str = "api-url";
pub const API_URL_ENV: &str = "MYALKANSYA_API_URL";
pub const AUTH_TOKEN_ARG: &str = "auth-token";
pub const AUTH_TOKEN_ENV: &str = "MYALKANSYA_AUTH_TOKEN";
pub const GOOGLE_ACCESS_TOKEN_ARG: &str = "google-access-token";
pub const GOOGLE_ACCESS_TOKEN_ENV: &str = "GOOGLE_SHEETS_ACCESS_TOKEN";
pub const OUTPUT_DIR_ARG: &str = "output-dir";
pub const OUTPUT_DIR_ENV: &str = "MYALKANSYA_EXPORT_DIR";
pub const FORMAT_ARG: &str = "format";
pub const MONTH_ARG: &str = "month";
pub const YEAR_ARG: &str = "year";
pub const ID_ARG: &str = "id";
pub const AMOUNT_ARG: &str = "amount";
pub const FROM_ARG: &str = "from";
pub const TO_ARG: &str = "to";
pub const BASE_ARG: &str = "base";
pub const CURRENCY_ARG: &str = "currency";
pub const SOURCE_ARG: &str = "source";
pub const SUBJECT_ARG: &str = "subject";
pub const CATEGORY_ARG: &str = "category";
pub const DATE_ARG: &str = "date";
pub const GOAL_ARG: &str = "goal";
pub const TARGET_AMOUNT_ARG: &str = "target-amount";
pub const CURRENT_AMOUNT_ARG: &str = "current-amount";
pub const TARGET_DATE_ARG: &str = "target-date";

pub const CONVERT_COMMAND: &str = "convert";
pub const RATES_COMMAND: &str = "rates";
pub const ADD_INCOME_COMMAND: &str = "add-income";
pub const ADD_EXPENSE_COMMAND: &str = "add-expense";
pub const ADD_BUDGET_COMMAND: &str = "add-budget";
pub const ADD_SAVINGS_GOAL_COMMAND: &str = "add-savings-goal";
pub const EXPORT_COMMAND: &str = "export";
pub const EXPORT_FORMAT_CSV: &str = "csv";
pub const EXPORT_FORMAT_SHEETS: &str = "sheets";
pub const EXPORT_FORMATS: [&str; 2] = [EXPORT_FORMAT_CSV, EXPORT_FORMAT_SHEETS];

pub const RATE_PATH: &str = "api/currency/rate";
pub const ALL_RATES_PATH: &str = "api/currency/rates";
pub const USER_PROFILE_PATH: &str = "api/users/me";
pub const FINANCIAL_SUMMARY_PATH: &str = "api/analytics/financial-summary";

pub const GOOGLE_SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
pub const GOOGLE_SHEETS_DOCUMENT_URL: &str = "https://docs.google.com/spreadsheets/d";
pub const SHEETS_VALUE_INPUT_OPTION: &str = "USER_ENTERED";

pub const CONVERSION_FAILED_WARNING: &str =
    "Currency changed, but conversion failed. Amount may need manual adjustment.";
pub const SUBMIT_CONVERSION_FAILED_MESSAGE: &str =
    "Currency conversion failed. Please try again or use your default currency.";

pub const EXPORT_TITLE_PREFIX: &str = "MyAlkansya Financial Export - ";
pub const EXPORT_FILE_PREFIX: &str = "MyAlkansya_Export_";
pub const EXPORT_FOOTER_LABEL: &str = "Generated by MyAlkansya App on";
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
pub const EXPORT_FOOTER_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const SUMMARY_SECTION: &str = "FINANCIAL SUMMARY";
pub const INCOME_SECTION: &str = "INCOME RECORDS";
pub const EXPENSE_SECTION: &str = "EXPENSE RECORDS";
pub const BUDGET_SECTION: &str = "BUDGET RECORDS";
pub const SAVINGS_GOAL_SECTION: &str = "SAVINGS GOALS";

pub const SUMMARY_SHEET: &str = "Summary";
pub const INCOME_SHEET: &str = "Income";
pub const EXPENSE_SHEET: &str = "Expenses";
pub const BUDGET_SHEET: &str = "Budget";
pub const SAVINGS_GOAL_SHEET: &str = "SavingsGoal";

pub const SUMMARY_COLUMNS: [&str; 2] = ["Category", "Amount"];
pub const INCOME_COLUMNS: [&str; 5] = ["ID", "Source", "Amount", "Date", "Currency"];
pub const EXPENSE_COLUMNS: [&str; 6] = ["ID", "Subject", "Category", "Amount", "Date", "Currency"];
pub const BUDGET_COLUMNS: [&str; 6] = [
    "ID",
    "Category",
    "Monthly Budget",
    "Total Spent",
    "Month",
    "Year",
];
pub const SAVINGS_GOAL_COLUMNS: [&str; 6] = [
    "ID",
    "Goal",
    "Target Amount",
    "Current Amount",
    "Target Date",
    "Progress (%)",
];

pub const NO_INCOME_RECORDS: &str = "No income records found";
pub const NO_EXPENSE_RECORDS: &str = "No expense records found";
pub const NO_BUDGET_RECORDS: &str = "No budget records found";
pub const NO_SAVINGS_GOALS: &str = "No savings goals found";

// Keys under which list endpoints sometimes wrap their payload.
pub const COLLECTION_ENVELOPE_KEYS: [&str; 3] = ["body", "data", "content"];

lazy_static! {
    pub static ref AMOUNT_REGEX: Regex =
        Regex::new(r"^(?:[0-9]{1,3}(?:,[0-9]{3})+|[0-9]*)(?:\.[0-9]+)?$")
            .expect("AMOUNT_REGEX should be valid");
    pub static ref CURRENCY_CODE_REGEX: Regex =
        Regex::new(r"^[[:alpha:]]{3}$").expect("CURRENCY_CODE_REGEX should be valid");
    pub static ref CURRENCY_SYMBOLS: HashMap<&'static str, &'static str> = [
        ("PHP", "₱"),
        ("USD", "$"),
        ("EUR", "€"),
        ("GBP", "£"),
        ("JPY", "¥"),
        ("CNY", "¥"),
        ("INR", "₹"),
        ("KRW", "₩"),
        ("BTC", "₿"),
        ("THB", "฿"),
        ("RUB", "₽"),
        ("TRY", "₺"),
        ("MYR", "RM"),
        ("SGD", "S$"),
        ("HKD", "HK$"),
        ("AUD", "A$"),
        ("CAD", "C$"),
        ("NZD", "NZ$"),
        ("ZAR", "R"),
        ("BRL", "R$"),
        ("MXN", "Mex$"),
        ("CHF", "Fr"),
        ("SEK", "kr"),
        ("NOK", "kr"),
        ("DKK", "kr"),
        ("IDR", "Rp"),
        ("AED", "د.إ"),
        ("ARS", "$"),
        ("BGN", "лв"),
        ("BSD", "B$"),
        ("CLP", "$"),
        ("COP", "$"),
        ("CZK", "Kč"),
        ("DOP", "RD$"),
        ("EGP", "E£"),
        ("FJD", "FJ$"),
        ("GTQ", "Q"),
        ("HRK", "kn"),
        ("HUF", "Ft"),
        ("ILS", "₪"),
        ("ISK", "kr"),
        ("KZT", "₸"),
        ("PAB", "B/."),
        ("PEN", "S/."),
        ("PKR", "₨"),
        ("PLN", "zł"),
        ("PYG", "₲"),
        ("RON", "lei"),
        ("SAR", "﷼"),
        ("TWD", "NT$"),
        ("UAH", "₴"),
        ("UYU", "$U"),
    ]
    .iter()
    .cloned()
    .collect();
}
