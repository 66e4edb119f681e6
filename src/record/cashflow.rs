use super::{raw, required_str};
use crate::error::LedgerError;
use crate::money::Money;
use chrono::NaiveDate;
use num_traits::Zero;
use std::fmt;
use tracing::warn;

/// Miscellaneous income outside fuel sales (lubricants, air pump, ...).
/// Adds to cash-in-hand.
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeRecord {
    pub id: String,
    pub date: NaiveDate,
    pub amount: Money,
    pub description: String,
    pub category: Option<String>,
}

/// Day-to-day outgoing. Identical shape to income; only the sign with
/// which it enters the cash formula differs.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRecord {
    pub id: String,
    pub date: NaiveDate,
    pub amount: Money,
    pub description: String,
    pub category: Option<String>,
}

fn validated(raw: &raw::Record) -> Result<(Money, String, Option<String>), LedgerError> {
    let description = required_str(&raw.description, "description")?;
    let amount = raw.amount.ok_or(LedgerError::MissingField("amount"))?;
    if amount <= Money::zero() {
        return Err(LedgerError::InvalidAmount);
    }
    Ok((amount, description, raw.category.clone()))
}

fn coerced(id: &str, kind: &str, raw: &raw::Record) -> (Money, String, Option<String>) {
    if raw.amount.is_none() {
        warn!(id, kind, "missing amount on stored record, coerced to zero");
    }
    (
        raw.amount.unwrap_or_default(),
        raw.description.clone().unwrap_or_default(),
        raw.category.clone(),
    )
}

impl IncomeRecord {
    pub fn from_raw(id: &str, date: NaiveDate, raw: &raw::Record) -> Result<Self, LedgerError> {
        let (amount, description, category) = validated(raw)?;
        Ok(Self {
            id: id.to_owned(),
            date,
            amount,
            description,
            category,
        })
    }

    pub(crate) fn lenient(id: &str, date: NaiveDate, raw: &raw::Record) -> Self {
        let (amount, description, category) = coerced(id, "income", raw);
        Self {
            id: id.to_owned(),
            date,
            amount,
            description,
            category,
        }
    }

    pub fn to_raw(&self) -> raw::Record {
        raw::Record {
            id: Some(self.id.clone()),
            r#type: Some("income".to_owned()),
            date: Some(self.date.to_string()),
            amount: Some(self.amount),
            description: Some(self.description.clone()),
            category: self.category.clone(),
            ..Default::default()
        }
    }
}

impl ExpenseRecord {
    pub fn from_raw(id: &str, date: NaiveDate, raw: &raw::Record) -> Result<Self, LedgerError> {
        let (amount, description, category) = validated(raw)?;
        Ok(Self {
            id: id.to_owned(),
            date,
            amount,
            description,
            category,
        })
    }

    pub(crate) fn lenient(id: &str, date: NaiveDate, raw: &raw::Record) -> Self {
        let (amount, description, category) = coerced(id, "expense", raw);
        Self {
            id: id.to_owned(),
            date,
            amount,
            description,
            category,
        }
    }

    pub fn to_raw(&self) -> raw::Record {
        raw::Record {
            id: Some(self.id.clone()),
            r#type: Some("expense".to_owned()),
            date: Some(self.date.to_string()),
            amount: Some(self.amount),
            description: Some(self.description.clone()),
            category: self.category.clone(),
            ..Default::default()
        }
    }
}

impl fmt::Display for IncomeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {:<24} | {:>12}",
            self.date,
            self.description,
            self.amount.to_string()
        )
    }
}

impl fmt::Display for ExpenseRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {:<24} | {:>12}",
            self.date,
            self.description,
            self.amount.to_string()
        )
    }
}

#[cfg(test)]
mod cashflow_tests {
    use super::*;
    use anyhow::Result;

    fn day() -> NaiveDate {
        "3000-01-01".parse().unwrap()
    }

    #[test]
    fn income_requires_description_and_positive_amount() -> Result<()> {
        let raw = raw::Record {
            amount: Some("300".parse()?),
            description: Some("Lubricant sales".to_owned()),
            ..Default::default()
        };
        let income = IncomeRecord::from_raw("i1", day(), &raw)?;
        assert_eq!(income.amount, "300".parse()?);

        let raw = raw::Record {
            amount: Some("300".parse()?),
            ..Default::default()
        };
        assert_eq!(
            IncomeRecord::from_raw("i1", day(), &raw),
            Err(LedgerError::MissingField("description"))
        );

        let raw = raw::Record {
            amount: Some("-5".parse()?),
            description: Some("refund".to_owned()),
            ..Default::default()
        };
        assert_eq!(
            IncomeRecord::from_raw("i1", day(), &raw),
            Err(LedgerError::InvalidAmount)
        );
        Ok(())
    }

    #[test]
    fn expense_mirrors_income() -> Result<()> {
        let raw = raw::Record {
            amount: Some("200".parse()?),
            description: Some("Generator diesel".to_owned()),
            category: Some("fuel".to_owned()),
            ..Default::default()
        };
        let expense = ExpenseRecord::from_raw("e1", day(), &raw)?;
        assert_eq!(expense.amount, "200".parse()?);
        assert_eq!(expense.category.as_deref(), Some("fuel"));
        Ok(())
    }
}
