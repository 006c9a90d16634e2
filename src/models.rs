use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RecordKind {
    Income,
    Expense,
    Budget,
    SavingsGoal,
}

impl RecordKind {
    pub fn list_path(self) -> &'static str {
        match self {
            RecordKind::Income => "api/incomes/getIncomes",
            RecordKind::Expense => "api/expenses/getExpenses",
            RecordKind::Budget => "api/budgets/user",
            RecordKind::SavingsGoal => "api/savings-goals/getSavingsGoals",
        }
    }

    pub fn create_path(self) -> &'static str {
        match self {
            RecordKind::Income => "api/incomes/postIncome",
            RecordKind::Expense => "api/expenses/postExpense",
            RecordKind::Budget => "api/budgets/create",
            RecordKind::SavingsGoal => "api/savings-goals/postSavingsGoal",
        }
    }

    pub fn update_path(self, id: i64) -> String {
        match self {
            RecordKind::Income => format!("api/incomes/putIncome/{}", id),
            RecordKind::Expense => format!("api/expenses/putExpense/{}", id),
            RecordKind::Budget => format!("api/budgets/update/{}", id),
            RecordKind::SavingsGoal => format!("api/savings-goals/putSavingsGoal/{}", id),
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RecordKind::Income => "income",
            RecordKind::Expense => "expense",
            RecordKind::Budget => "budget",
            RecordKind::SavingsGoal => "savings goal",
        };
        write!(f, "{}", name)
    }
}

/// Month and year the financial summary covers.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SummaryPeriod {
    pub month: u32,
    pub year: i32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: i64,
    pub source: String,
    pub date: String,
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub subject: String,
    pub category: String,
    pub date: String,
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: i64,
    pub category: String,
    pub monthly_budget: f64,
    #[serde(default)]
    pub total_spent: f64,
    #[serde(default)]
    pub currency: Option<String>,
    pub budget_month: u32,
    pub budget_year: i32,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    pub id: i64,
    pub goal: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub target_date: String,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct FinancialSummary {
    pub total_income: f64,
    pub total_expenses: f64,
    pub total_budget: f64,
    pub total_savings: f64,
    pub net_cashflow: f64,
    pub budget_utilization: f64,
    pub savings_rate: f64,
    pub currency: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub currency: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeRequest {
    pub source: String,
    pub date: String,
    pub amount: f64,
    pub currency: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseRequest {
    pub subject: String,
    pub category: String,
    pub date: String,
    pub amount: f64,
    pub currency: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetRequest {
    pub category: String,
    pub monthly_budget: f64,
    pub currency: String,
    pub budget_month: u32,
    pub budget_year: i32,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoalRequest {
    pub goal: String,
    pub target_amount: f64,
    pub current_amount: f64,
    pub target_date: String,
    pub currency: String,
}
