pub mod cashflow;
pub mod credit;
pub mod raw;
pub mod sale;

pub use cashflow::{ExpenseRecord, IncomeRecord};
pub use credit::CreditRecord;
pub use sale::SaleRecord;

use crate::error::LedgerError;
use anyhow::{bail, Context, Error, Result};
use chrono::NaiveDate;
use std::str::FromStr;
use tracing::warn;
use uuid::Uuid;

/// A fully valid ledger record of one of the four kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Sale(SaleRecord),
    Credit(CreditRecord),
    Income(IncomeRecord),
    Expense(ExpenseRecord),
}

impl Record {
    pub fn id(&self) -> &str {
        match self {
            Record::Sale(r) => &r.id,
            Record::Credit(r) => &r.id,
            Record::Income(r) => &r.id,
            Record::Expense(r) => &r.id,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Record::Sale(r) => r.date,
            Record::Credit(r) => r.date,
            Record::Income(r) => r.date,
            Record::Expense(r) => r.date,
        }
    }

    pub fn to_raw(&self) -> raw::Record {
        match self {
            Record::Sale(r) => r.to_raw(),
            Record::Credit(r) => r.to_raw(),
            Record::Income(r) => r.to_raw(),
            Record::Expense(r) => r.to_raw(),
        }
    }

    /// Lenient conversion for stored history: missing numeric fields coerce
    /// to zero with a warning, records that cannot be slotted to a day or a
    /// known kind are dropped with a warning. Never fails, so one bad
    /// historical record cannot take down a whole load.
    pub(crate) fn from_raw_lenient(raw: raw::Record) -> Option<Record> {
        let kind = match raw.r#type.clone() {
            Some(kind) => kind,
            None => {
                warn!("skipping stored record without a type tag");
                return None;
            }
        };
        let date = match raw.date.as_deref().map(str::parse::<NaiveDate>) {
            Some(Ok(date)) => date,
            _ => {
                warn!(r#type = %kind, "skipping stored record without a usable date");
                return None;
            }
        };
        let id = raw
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        match kind.as_str() {
            "sale" => Some(Record::Sale(SaleRecord::lenient(&id, date, &raw))),
            "credit" => Some(Record::Credit(CreditRecord::lenient(&id, date, &raw))),
            "income" => Some(Record::Income(IncomeRecord::lenient(&id, date, &raw))),
            "expense" => Some(Record::Expense(ExpenseRecord::lenient(&id, date, &raw))),
            other => {
                warn!(r#type = other, "skipping stored record of unknown type");
                None
            }
        }
    }
}

impl TryFrom<raw::Record> for Record {
    type Error = Error;

    fn try_from(raw: raw::Record) -> Result<Self> {
        let id = raw.id.clone().context("record id missing")?;
        let date = parse_date(&raw).with_context(|| format!("in record {:?}", id))?;
        let kind = raw
            .r#type
            .clone()
            .ok_or(LedgerError::MissingField("type"))?;
        match kind.as_str() {
            "sale" => Ok(Record::Sale(SaleRecord::from_raw(&id, date, &raw)?)),
            "credit" => Ok(Record::Credit(CreditRecord::from_raw(&id, date, &raw)?)),
            "income" => Ok(Record::Income(IncomeRecord::from_raw(&id, date, &raw)?)),
            "expense" => Ok(Record::Expense(ExpenseRecord::from_raw(&id, date, &raw)?)),
            other => bail!("{} is not a valid record type", other),
        }
    }
}

impl FromStr for Record {
    type Err = Error;

    fn from_str(doc: &str) -> Result<Self, Self::Err> {
        let mut raw: raw::Record = serde_yaml::from_str(doc)
            .with_context(|| format!("Failed to deserialize record:\n{}", doc))?;
        raw.id.get_or_insert_with(|| Uuid::new_v4().to_string());
        raw.try_into()
    }
}

pub(crate) fn parse_date(raw: &raw::Record) -> Result<NaiveDate> {
    let date = raw
        .date
        .as_deref()
        .ok_or(LedgerError::MissingField("date"))?;
    date.parse()
        .with_context(|| format!("invalid date {:?}", date))
}

pub(crate) fn required_str(
    field: &Option<String>,
    name: &'static str,
) -> Result<String, LedgerError> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
        .ok_or(LedgerError::MissingField(name))
}
