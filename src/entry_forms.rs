use rust_decimal::prelude::Zero;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::currency_converter_client::*;
use crate::currency_form::*;
use crate::errors::*;
use crate::models::*;
use crate::types::*;
use crate::utilities::*;

/// A record entry form with a currency-aware amount group.
pub trait EntryForm {
    fn kind(&self) -> RecordKind;
    fn money(&self) -> &CurrencyFieldGroup;
    fn money_mut(&mut self) -> &mut CurrencyFieldGroup;
    /// Checks everything except the amount values themselves.
    fn validate_fields(&self) -> Result<()>;
    fn payload(&self, amounts: &[Decimal], currency: CurrencyCode) -> Result<Value>;

    fn change_currency<S: ExchangeRateSource>(
        &mut self,
        currency: CurrencyCode,
        converter: &CurrencyConverterClient<S>,
    ) -> CurrencyChange {
        self.money_mut().change_currency(currency, converter)
    }

    fn currency(&self) -> CurrencyCode {
        self.money().currency()
    }

    fn message(&self) -> Option<&FormMessage> {
        self.money().message()
    }

    /// Validates the whole form and returns the parsed amounts.
    fn validated_amounts(&self) -> Result<Vec<Decimal>> {
        self.validate_fields()?;
        let amounts = self.money().parsed_amounts()?;
        ensure!(
            amounts[0] > Decimal::zero(),
            ErrorKind::Validation(format!("{} amount must be greater than zero", self.kind()))
        );
        Ok(amounts)
    }
}

#[derive(Clone, Debug)]
pub struct IncomeForm {
    pub source: String,
    pub date: String,
    money: CurrencyFieldGroup,
}

#[derive(Clone, Debug)]
pub struct ExpenseForm {
    pub subject: String,
    pub category: String,
    pub date: String,
    money: CurrencyFieldGroup,
}

#[derive(Clone, Debug)]
pub struct BudgetForm {
    pub category: String,
    pub budget_month: u32,
    pub budget_year: i32,
    money: CurrencyFieldGroup,
}

#[derive(Clone, Debug)]
pub struct SavingsGoalForm {
    pub goal: String,
    pub target_date: String,
    money: CurrencyFieldGroup,
}

impl IncomeForm {
    pub fn new(default_currency: CurrencyCode) -> IncomeForm {
        IncomeForm {
            source: String::new(),
            date: String::new(),
            money: CurrencyFieldGroup::new(1, default_currency),
        }
    }

    pub fn amount(&self) -> &str {
        self.money.amount(0)
    }

    pub fn set_amount(&mut self, text: &str) {
        self.money.set_amount(0, text)
    }
}

impl ExpenseForm {
    pub fn new(default_currency: CurrencyCode) -> ExpenseForm {
        ExpenseForm {
            subject: String::new(),
            category: String::new(),
            date: String::new(),
            money: CurrencyFieldGroup::new(1, default_currency),
        }
    }

    pub fn amount(&self) -> &str {
        self.money.amount(0)
    }

    pub fn set_amount(&mut self, text: &str) {
        self.money.set_amount(0, text)
    }
}

impl BudgetForm {
    pub fn new(default_currency: CurrencyCode, budget_month: u32, budget_year: i32) -> BudgetForm {
        BudgetForm {
            category: String::new(),
            budget_month,
            budget_year,
            money: CurrencyFieldGroup::new(1, default_currency),
        }
    }

    pub fn monthly_budget(&self) -> &str {
        self.money.amount(0)
    }

    pub fn set_monthly_budget(&mut self, text: &str) {
        self.money.set_amount(0, text)
    }
}

impl SavingsGoalForm {
    const TARGET: usize = 0;
    const CURRENT: usize = 1;

    pub fn new(default_currency: CurrencyCode) -> SavingsGoalForm {
        SavingsGoalForm {
            goal: String::new(),
            target_date: String::new(),
            money: CurrencyFieldGroup::with_amounts(&["", "0"], default_currency),
        }
    }

    pub fn target_amount(&self) -> &str {
        self.money.amount(Self::TARGET)
    }

    pub fn current_amount(&self) -> &str {
        self.money.amount(Self::CURRENT)
    }

    pub fn set_target_amount(&mut self, text: &str) {
        self.money.set_amount(Self::TARGET, text)
    }

    pub fn set_current_amount(&mut self, text: &str) {
        self.money.set_amount(Self::CURRENT, text)
    }
}

impl EntryForm for IncomeForm {
    fn kind(&self) -> RecordKind {
        RecordKind::Income
    }

    fn money(&self) -> &CurrencyFieldGroup {
        &self.money
    }

    fn money_mut(&mut self) -> &mut CurrencyFieldGroup {
        &mut self.money
    }

    fn validate_fields(&self) -> Result<()> {
        require_text(&self.source, "Source")?;
        require_date(&self.date, "Date")
    }

    fn payload(&self, amounts: &[Decimal], currency: CurrencyCode) -> Result<Value> {
        to_payload(&IncomeRequest {
            source: self.source.trim().to_string(),
            date: self.date.trim().to_string(),
            amount: decimal_to_f64(amounts[0]),
            currency: currency.to_string(),
        })
    }
}

impl EntryForm for ExpenseForm {
    fn kind(&self) -> RecordKind {
        RecordKind::Expense
    }

    fn money(&self) -> &CurrencyFieldGroup {
        &self.money
    }

    fn money_mut(&mut self) -> &mut CurrencyFieldGroup {
        &mut self.money
    }

    fn validate_fields(&self) -> Result<()> {
        require_text(&self.subject, "Subject")?;
        require_text(&self.category, "Category")?;
        require_date(&self.date, "Date")
    }

    fn payload(&self, amounts: &[Decimal], currency: CurrencyCode) -> Result<Value> {
        to_payload(&ExpenseRequest {
            subject: self.subject.trim().to_string(),
            category: self.category.trim().to_string(),
            date: self.date.trim().to_string(),
            amount: decimal_to_f64(amounts[0]),
            currency: currency.to_string(),
        })
    }
}

impl EntryForm for BudgetForm {
    fn kind(&self) -> RecordKind {
        RecordKind::Budget
    }

    fn money(&self) -> &CurrencyFieldGroup {
        &self.money
    }

    fn money_mut(&mut self) -> &mut CurrencyFieldGroup {
        &mut self.money
    }

    fn validate_fields(&self) -> Result<()> {
        require_text(&self.category, "Category")?;
        ensure!(
            (1..=12).contains(&self.budget_month),
            ErrorKind::Validation(format!("Invalid budget month: {}", self.budget_month))
        );
        ensure!(
            self.budget_year > 0,
            ErrorKind::Validation(format!("Invalid budget year: {}", self.budget_year))
        );
        Ok(())
    }

    fn payload(&self, amounts: &[Decimal], currency: CurrencyCode) -> Result<Value> {
        to_payload(&BudgetRequest {
            category: self.category.trim().to_string(),
            monthly_budget: decimal_to_f64(amounts[0]),
            currency: currency.to_string(),
            budget_month: self.budget_month,
            budget_year: self.budget_year,
        })
    }
}

impl EntryForm for SavingsGoalForm {
    fn kind(&self) -> RecordKind {
        RecordKind::SavingsGoal
    }

    fn money(&self) -> &CurrencyFieldGroup {
        &self.money
    }

    fn money_mut(&mut self) -> &mut CurrencyFieldGroup {
        &mut self.money
    }

    fn validate_fields(&self) -> Result<()> {
        require_text(&self.goal, "Goal")?;
        require_date(&self.target_date, "Target date")
    }

    fn payload(&self, amounts: &[Decimal], currency: CurrencyCode) -> Result<Value> {
        to_payload(&SavingsGoalRequest {
            goal: self.goal.trim().to_string(),
            target_amount: decimal_to_f64(amounts[Self::TARGET]),
            current_amount: decimal_to_f64(amounts[Self::CURRENT]),
            target_date: self.target_date.trim().to_string(),
            currency: currency.to_string(),
        })
    }
}

fn require_text(value: &str, field: &str) -> Result<()> {
    ensure!(
        !value.trim().is_empty(),
        ErrorKind::Validation(format!("{} is required", field))
    );
    Ok(())
}

fn require_date(value: &str, field: &str) -> Result<()> {
    require_text(value, field)?;
    parse_iso_date(value)
        .map(|_| ())
        .chain_err(|| ErrorKind::Validation(format!("{} must be a YYYY-MM-DD date", field)))
}

fn to_payload<T: Serialize>(request: &T) -> Result<Value> {
    serde_json::to_value(request).chain_err(|| "Failed to serialize request payload")
}
