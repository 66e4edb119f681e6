use super::{raw, required_str};
use crate::error::LedgerError;
use crate::money::{display_dp2, Money};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use tracing::warn;

/// One nozzle meter run. `litres` and `amount` are derived from the
/// readings and rate at construction and never taken from the input.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    pub id: String,
    pub date: NaiveDate,
    pub nozzle: String,
    pub fuel_type: String,
    pub start_reading: Decimal,
    pub end_reading: Decimal,
    pub rate: Money,
    pub litres: Decimal,
    pub amount: Money,
    /// Payment channel tag. Only "cash" counts toward cash-in-hand.
    pub channel: String,
}

pub const CASH: &str = "cash";

impl SaleRecord {
    pub fn is_cash(&self) -> bool {
        self.channel == CASH
    }

    /// Validated construction of a sale from form input.
    ///
    /// Nozzle, fuel type, readings, and rate are required; the end reading
    /// must be strictly greater than the start reading. Litres and amount
    /// are recomputed here so a client-supplied value can never drift from
    /// the readings.
    pub fn from_raw(id: &str, date: NaiveDate, raw: &raw::Record) -> Result<Self, LedgerError> {
        let nozzle = required_str(&raw.nozzle, "nozzle")?;
        let fuel_type = required_str(&raw.fuel_type, "fuel type")?;
        let start_reading = raw
            .start_reading
            .ok_or(LedgerError::MissingField("start reading"))?;
        let end_reading = raw
            .end_reading
            .ok_or(LedgerError::MissingField("end reading"))?;
        let rate = raw.rate.ok_or(LedgerError::MissingField("rate"))?;
        if end_reading <= start_reading {
            return Err(LedgerError::InvalidReading);
        }
        let litres = end_reading - start_reading;
        let amount = Money(litres * rate.0);
        Ok(Self {
            id: id.to_owned(),
            date,
            nozzle,
            fuel_type,
            start_reading,
            end_reading,
            rate,
            litres,
            amount,
            channel: raw.channel.clone().unwrap_or_else(|| CASH.to_owned()),
        })
    }

    /// Ingestion of stored history: coerces missing numerics to zero
    /// instead of failing, still re-deriving litres and amount.
    pub(crate) fn lenient(id: &str, date: NaiveDate, raw: &raw::Record) -> Self {
        if raw.start_reading.is_none() || raw.end_reading.is_none() || raw.rate.is_none() {
            warn!(id, "missing numeric fields on stored sale, coerced to zero");
        }
        let start_reading = raw.start_reading.unwrap_or_default();
        let end_reading = raw.end_reading.unwrap_or_default();
        let rate = raw.rate.unwrap_or_default();
        let litres = end_reading - start_reading;
        Self {
            id: id.to_owned(),
            date,
            nozzle: raw.nozzle.clone().unwrap_or_default(),
            fuel_type: raw.fuel_type.clone().unwrap_or_default(),
            start_reading,
            end_reading,
            rate,
            litres,
            amount: Money(litres * rate.0),
            channel: raw.channel.clone().unwrap_or_else(|| CASH.to_owned()),
        }
    }

    pub fn to_raw(&self) -> raw::Record {
        raw::Record {
            id: Some(self.id.clone()),
            r#type: Some("sale".to_owned()),
            date: Some(self.date.to_string()),
            nozzle: Some(self.nozzle.clone()),
            fuel_type: Some(self.fuel_type.clone()),
            start_reading: Some(self.start_reading),
            end_reading: Some(self.end_reading),
            rate: Some(self.rate),
            litres: Some(self.litres),
            amount: Some(self.amount),
            channel: Some(self.channel.clone()),
            ..Default::default()
        }
    }
}

impl fmt::Display for SaleRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let litres = format!("{} L", display_dp2(self.litres));
        write!(
            f,
            "{} | {:<4} | {:<10} | {:>10} @ {:>9} | {:>12} | {}",
            self.date,
            self.nozzle,
            self.fuel_type,
            litres,
            self.rate.to_string(),
            self.amount.to_string(),
            self.channel,
        )
    }
}
