use super::{raw, required_str};
use crate::error::LedgerError;
use crate::money::{display_dp2, Money};
use chrono::NaiveDate;
use num_traits::Zero;
use rust_decimal::Decimal;
use std::fmt;
use tracing::warn;

/// Fuel dispensed without immediate payment, recorded as a receivable.
/// The status tag is informational only; aggregation subtracts the credit
/// amount on the sale date regardless of it.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditRecord {
    pub id: String,
    pub date: NaiveDate,
    pub customer_name: String,
    pub vehicle_number: Option<String>,
    pub fuel_type: String,
    pub litres: Decimal,
    pub rate: Money,
    pub amount: Money,
    pub due_date: Option<NaiveDate>,
    pub status: String,
}

impl CreditRecord {
    /// Validated construction. Credit quantity is entered directly, not
    /// derived from meter readings, so litres and rate must both be
    /// positive; amount is still recomputed from them.
    pub fn from_raw(id: &str, date: NaiveDate, raw: &raw::Record) -> Result<Self, LedgerError> {
        let customer_name = required_str(&raw.customer_name, "customer name")?;
        let fuel_type = required_str(&raw.fuel_type, "fuel type")?;
        let litres = raw.litres.ok_or(LedgerError::MissingField("litres"))?;
        if litres <= Decimal::ZERO {
            return Err(LedgerError::InvalidQuantity);
        }
        let rate = raw.rate.ok_or(LedgerError::MissingField("rate"))?;
        if rate <= Money::zero() {
            return Err(LedgerError::InvalidPrice);
        }
        Ok(Self {
            id: id.to_owned(),
            date,
            customer_name,
            vehicle_number: raw.vehicle_number.clone(),
            fuel_type,
            litres,
            rate,
            amount: Money(litres * rate.0),
            due_date: raw.due_date.as_deref().and_then(|s| s.parse().ok()),
            status: raw.status.clone().unwrap_or_else(|| "pending".to_owned()),
        })
    }

    pub(crate) fn lenient(id: &str, date: NaiveDate, raw: &raw::Record) -> Self {
        if raw.litres.is_none() || raw.rate.is_none() {
            warn!(id, "missing numeric fields on stored credit, coerced to zero");
        }
        let litres = raw.litres.unwrap_or_default();
        let rate = raw.rate.unwrap_or_default();
        Self {
            id: id.to_owned(),
            date,
            customer_name: raw.customer_name.clone().unwrap_or_default(),
            vehicle_number: raw.vehicle_number.clone(),
            fuel_type: raw.fuel_type.clone().unwrap_or_default(),
            litres,
            rate,
            amount: Money(litres * rate.0),
            due_date: raw.due_date.as_deref().and_then(|s| s.parse().ok()),
            status: raw.status.clone().unwrap_or_else(|| "pending".to_owned()),
        }
    }

    pub fn to_raw(&self) -> raw::Record {
        raw::Record {
            id: Some(self.id.clone()),
            r#type: Some("credit".to_owned()),
            date: Some(self.date.to_string()),
            customer_name: Some(self.customer_name.clone()),
            vehicle_number: self.vehicle_number.clone(),
            fuel_type: Some(self.fuel_type.clone()),
            litres: Some(self.litres),
            rate: Some(self.rate),
            amount: Some(self.amount),
            due_date: self.due_date.map(|d| d.to_string()),
            status: Some(self.status.clone()),
            ..Default::default()
        }
    }
}

impl fmt::Display for CreditRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let litres = format!("{} L", display_dp2(self.litres));
        write!(
            f,
            "{} | {:<20} | {:<12} | {:<10} | {:>10} @ {:>9} | {:>12} | {}",
            self.date,
            self.customer_name,
            self.vehicle_number.as_deref().unwrap_or(""),
            self.fuel_type,
            litres,
            self.rate.to_string(),
            self.amount.to_string(),
            self.status,
        )
    }
}

#[cfg(test)]
mod credit_tests {
    use super::*;
    use anyhow::Result;

    fn input() -> raw::Record {
        raw::Record {
            customer_name: Some("ABC Transport Ltd.".to_owned()),
            fuel_type: Some("Diesel".to_owned()),
            litres: Some("50".parse().unwrap()),
            rate: Some(Money("89.75".parse().unwrap())),
            ..Default::default()
        }
    }

    fn day() -> NaiveDate {
        "3000-01-01".parse().unwrap()
    }

    #[test]
    fn derives_amount() -> Result<()> {
        let credit = CreditRecord::from_raw("c1", day(), &input())?;
        assert_eq!(credit.amount, "4487.50".parse()?);
        assert_eq!(credit.status, "pending");
        Ok(())
    }

    #[test]
    fn requires_customer_name() {
        let raw = raw::Record {
            customer_name: None,
            ..input()
        };
        assert_eq!(
            CreditRecord::from_raw("c1", day(), &raw),
            Err(LedgerError::MissingField("customer name"))
        );
    }

    #[test]
    fn rejects_non_positive_quantity_and_rate() {
        let raw = raw::Record {
            litres: Some(Decimal::ZERO),
            ..input()
        };
        assert_eq!(
            CreditRecord::from_raw("c1", day(), &raw),
            Err(LedgerError::InvalidQuantity)
        );

        let raw = raw::Record {
            rate: Some(Money(Decimal::ZERO)),
            ..input()
        };
        assert_eq!(
            CreditRecord::from_raw("c1", day(), &raw),
            Err(LedgerError::InvalidPrice)
        );
    }

    #[test]
    fn unparseable_due_date_is_dropped() -> Result<()> {
        let raw = raw::Record {
            due_date: Some("sometime next month".to_owned()),
            ..input()
        };
        let credit = CreditRecord::from_raw("c1", day(), &raw)?;
        assert_eq!(credit.due_date, None);
        Ok(())
    }
}
