use log::debug;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::constants::*;
use crate::models::*;

/// Read access to the fields of one exported record, whatever shape it came in.
pub trait FieldSource {
    fn text(&self, key: &str) -> Option<String>;
    fn number(&self, key: &str) -> Option<f64>;

    fn text_or_default(&self, key: &str) -> String {
        self.text(key).unwrap_or_default()
    }

    fn number_or_zero(&self, key: &str) -> f64 {
        self.number(key).unwrap_or(0.0)
    }
}

/// How a single collection item was understood.
#[derive(Clone, Debug, PartialEq)]
pub enum RecordShape<T> {
    Typed(T),
    Mapping(Map<String, Value>),
    Unrecognized,
}

impl<T: DeserializeOwned> RecordShape<T> {
    pub fn from_value(value: Value) -> RecordShape<T> {
        if let Ok(typed) = serde_json::from_value::<T>(value.clone()) {
            return RecordShape::Typed(typed);
        }
        match value {
            Value::Object(map) => RecordShape::Mapping(map),
            Value::String(text) => match serde_json::from_str::<Value>(&text) {
                Ok(parsed @ Value::Object(_)) => RecordShape::from_value(parsed),
                _ => {
                    debug!("Unrecognized export item: {:?}", text);
                    RecordShape::Unrecognized
                }
            },
            Value::Array(mut items) if items.len() == 1 => {
                RecordShape::from_value(items.remove(0))
            }
            other => {
                debug!("Unrecognized export item: {}", other);
                RecordShape::Unrecognized
            }
        }
    }
}

impl<T: FieldSource> FieldSource for RecordShape<T> {
    fn text(&self, key: &str) -> Option<String> {
        match self {
            RecordShape::Typed(record) => record.text(key),
            RecordShape::Mapping(map) => map.text(key),
            RecordShape::Unrecognized => None,
        }
    }

    fn number(&self, key: &str) -> Option<f64> {
        match self {
            RecordShape::Typed(record) => record.number(key),
            RecordShape::Mapping(map) => map.number(key),
            RecordShape::Unrecognized => None,
        }
    }
}

impl FieldSource for Map<String, Value> {
    fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }

    fn number(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse().ok(),
            _ => None,
        }
    }
}

impl FieldSource for Income {
    fn text(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.to_string()),
            "source" => Some(self.source.clone()),
            "date" => Some(self.date.clone()),
            "currency" => self.currency.clone(),
            _ => None,
        }
    }

    fn number(&self, key: &str) -> Option<f64> {
        match key {
            "amount" => Some(self.amount),
            _ => None,
        }
    }
}

impl FieldSource for Expense {
    fn text(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.to_string()),
            "subject" => Some(self.subject.clone()),
            "category" => Some(self.category.clone()),
            "date" => Some(self.date.clone()),
            "currency" => self.currency.clone(),
            _ => None,
        }
    }

    fn number(&self, key: &str) -> Option<f64> {
        match key {
            "amount" => Some(self.amount),
            _ => None,
        }
    }
}

impl FieldSource for Budget {
    fn text(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.to_string()),
            "category" => Some(self.category.clone()),
            "currency" => self.currency.clone(),
            "budgetMonth" => Some(self.budget_month.to_string()),
            "budgetYear" => Some(self.budget_year.to_string()),
            _ => None,
        }
    }

    fn number(&self, key: &str) -> Option<f64> {
        match key {
            "monthlyBudget" => Some(self.monthly_budget),
            "totalSpent" => Some(self.total_spent),
            _ => None,
        }
    }
}

impl FieldSource for SavingsGoal {
    fn text(&self, key: &str) -> Option<String> {
        match key {
            "id" => Some(self.id.to_string()),
            "goal" => Some(self.goal.clone()),
            "targetDate" => Some(self.target_date.clone()),
            "currency" => self.currency.clone(),
            _ => None,
        }
    }

    fn number(&self, key: &str) -> Option<f64> {
        match key {
            "targetAmount" => Some(self.target_amount),
            "currentAmount" => Some(self.current_amount),
            _ => None,
        }
    }
}

/// Flattens a list response into its items.
pub fn normalize_collection(value: Value) -> Vec<Value> {
    match value {
        Value::Null => vec![],
        Value::Array(items) => items,
        Value::Object(mut map) => {
            let envelope_key = COLLECTION_ENVELOPE_KEYS
                .iter()
                .find(|key| map.get(**key).map_or(false, Value::is_array));
            match envelope_key {
                Some(key) => match map.remove(*key) {
                    Some(Value::Array(items)) => items,
                    _ => vec![],
                },
                None => vec![Value::Object(map)],
            }
        }
        other => vec![other],
    }
}

pub fn read_collection<T: DeserializeOwned>(value: Value) -> Vec<RecordShape<T>> {
    normalize_collection(value)
        .into_iter()
        .map(RecordShape::from_value)
        .collect()
}
