use crate::error::LedgerError;
use crate::money::Money;
use anyhow::{Context, Error, Result};
use itertools::Itertools;
use num_traits::Zero;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{info, warn};

/// One configurable fuel type: current rate per litre and how many
/// nozzles dispense it. The name is the identifier, case-sensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FuelEntry {
    pub fuel_type: String,
    pub price: Money,
    #[serde(default = "default_nozzle_count")]
    pub nozzle_count: u32,
}

fn default_nozzle_count() -> u32 {
    2
}

/// The station's fuel catalog, in insertion order. Prices here are the
/// current rates; stored sale records carry their own copied rate, so
/// nothing in here ever rewrites history.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelCatalog(Vec<FuelEntry>);

impl FuelCatalog {
    pub fn new() -> Self {
        FuelCatalog(Vec::new())
    }

    /// The station setup the settings panel starts from.
    pub fn defaults() -> Self {
        FuelCatalog(vec![
            entry("Petrol", Decimal::new(10250, 2), 3),
            entry("Diesel", Decimal::new(8975, 2), 2),
            entry("CNG", Decimal::new(7520, 2), 2),
            entry("Premium", Decimal::new(10890, 2), 1),
        ])
    }

    pub async fn from_file(file: &str) -> Result<Self> {
        let doc = async_std::fs::read_to_string(file)
            .await
            .with_context(|| format!("failed to read catalog {:?}", file))?;
        doc.parse()
    }

    pub fn entries(&self) -> &[FuelEntry] {
        &self.0
    }

    pub fn get(&self, fuel_type: &str) -> Option<&FuelEntry> {
        self.0.iter().find(|e| e.fuel_type == fuel_type)
    }

    /// Adds a new type at the default price and nozzle count; the price is
    /// set afterwards via [`FuelCatalog::set_price`].
    pub fn add_fuel_type(&mut self, fuel_type: &str) -> Result<FuelEntry, LedgerError> {
        let name = fuel_type.trim();
        if name.is_empty() {
            return Err(LedgerError::MissingField("fuel type"));
        }
        if self.get(name).is_some() {
            return Err(LedgerError::DuplicateFuelType(name.to_owned()));
        }
        let new = entry(name, Decimal::new(10000, 2), default_nozzle_count());
        info!(fuel_type = name, "added fuel type");
        self.0.push(new.clone());
        Ok(new)
    }

    /// Removes the entry. Historical sale records referencing the type are
    /// left untouched; orphaned references are displayed as-is.
    pub fn remove_fuel_type(&mut self, fuel_type: &str) -> bool {
        match self.0.iter().position(|e| e.fuel_type == fuel_type) {
            Some(i) => {
                self.0.remove(i);
                info!(fuel_type, "removed fuel type");
                true
            }
            None => false,
        }
    }

    /// Sets the current rate for one type. Never touches the rate copied
    /// onto already-stored sales; past transactions must stay reproducible
    /// at the rate actually charged.
    pub fn set_price(&mut self, fuel_type: &str, price: Money) -> Result<(), LedgerError> {
        if price <= Money::zero() {
            return Err(LedgerError::InvalidPrice);
        }
        let entry = self
            .0
            .iter_mut()
            .find(|e| e.fuel_type == fuel_type)
            .ok_or_else(|| LedgerError::NotFound(format!("fuel type {}", fuel_type)))?;
        info!(fuel_type, old = %entry.price, new = %price, "price changed");
        entry.price = price;
        Ok(())
    }

    pub fn set_nozzle_count(&mut self, fuel_type: &str, count: u32) -> Result<u32, LedgerError> {
        let clamped = count.clamp(1, 10);
        let entry = self
            .0
            .iter_mut()
            .find(|e| e.fuel_type == fuel_type)
            .ok_or_else(|| LedgerError::NotFound(format!("fuel type {}", fuel_type)))?;
        entry.nozzle_count = clamped;
        Ok(clamped)
    }

    /// Applies `price × (1 + percentage/100)` to every entry, rounded to
    /// two decimals for storage. A result below the 0.01 floor is clamped
    /// there; the affected types are returned so the caller can flag them.
    pub fn apply_bulk_percentage(&mut self, percentage: Decimal) -> Vec<String> {
        let factor = Decimal::ONE + percentage / Decimal::ONE_HUNDRED;
        let floor = Decimal::new(1, 2);
        let mut clamped = Vec::new();
        for entry in &mut self.0 {
            let mut new_price = (entry.price.0 * factor)
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
            if new_price < floor {
                warn!(fuel_type = %entry.fuel_type, price = %new_price, "price clamped to floor");
                new_price = floor;
                clamped.push(entry.fuel_type.clone());
            }
            entry.price = Money(new_price);
        }
        clamped
    }

    /// Nozzle identifiers for one type: an uppercased prefix plus a
    /// 1-based index. "Power" and "Premium" take two-letter prefixes to
    /// stay distinct from "Petrol".
    pub fn nozzle_ids(&self, fuel_type: &str) -> Vec<String> {
        let prefix = nozzle_prefix(fuel_type);
        self.get(fuel_type)
            .map(|e| (1..=e.nozzle_count).map(|i| format!("{}{}", prefix, i)).collect())
            .unwrap_or_default()
    }

    /// Wholesale replacement, validating every entry.
    pub fn set_all(&mut self, entries: Vec<FuelEntry>) -> Result<(), LedgerError> {
        let mut validated: Vec<FuelEntry> = Vec::with_capacity(entries.len());
        for mut entry in entries {
            entry.fuel_type = entry.fuel_type.trim().to_owned();
            if entry.fuel_type.is_empty() {
                return Err(LedgerError::MissingField("fuel type"));
            }
            if validated.iter().any(|e| e.fuel_type == entry.fuel_type) {
                return Err(LedgerError::DuplicateFuelType(entry.fuel_type));
            }
            if entry.price <= Money::zero() {
                return Err(LedgerError::InvalidPrice);
            }
            entry.nozzle_count = entry.nozzle_count.clamp(1, 10);
            validated.push(entry);
        }
        self.0 = validated;
        Ok(())
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.0).context("failed to serialize catalog")
    }
}

impl Default for FuelCatalog {
    fn default() -> Self {
        Self::defaults()
    }
}

fn entry(fuel_type: &str, price: Decimal, nozzle_count: u32) -> FuelEntry {
    FuelEntry {
        fuel_type: fuel_type.to_owned(),
        price: Money(price),
        nozzle_count,
    }
}

fn nozzle_prefix(fuel_type: &str) -> String {
    match fuel_type.to_lowercase().as_str() {
        "power" => "PO".to_owned(),
        "premium" => "PR".to_owned(),
        _ => fuel_type
            .chars()
            .next()
            .map(|c| c.to_uppercase().to_string())
            .unwrap_or_default(),
    }
}

impl FromStr for FuelCatalog {
    type Err = Error;

    fn from_str(doc: &str) -> Result<Self, Self::Err> {
        let entries: Vec<FuelEntry> = serde_yaml::from_str(doc)
            .with_context(|| format!("Failed to deserialize catalog:\n{}", doc))?;
        let mut catalog = FuelCatalog::new();
        catalog.set_all(entries)?;
        Ok(catalog)
    }
}

impl fmt::Display for FuelCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.0 {
            let nozzles = self.nozzle_ids(&entry.fuel_type).iter().join(" ");
            writeln!(
                f,
                "{:<12} | {:>9} | {:>2} | {}",
                entry.fuel_type,
                entry.price.to_string(),
                entry.nozzle_count,
                nozzles,
            )?;
        }
        Ok(())
    }
}
