pub mod catalog;
pub mod error;
pub mod export;
pub mod money;
pub mod record;
pub mod store;
pub mod summary;

pub use catalog::{FuelCatalog, FuelEntry};
pub use error::LedgerError;
pub use export::DayReport;
pub use money::Money;
pub use record::{CreditRecord, ExpenseRecord, IncomeRecord, Record, SaleRecord};
pub use store::{DayRecords, RecordStore};
pub use summary::{summarize, DailySummary};

use anyhow::Result;
use chrono::NaiveDate;

/// The station's records and fuel catalog, loaded from YAML documents.
pub struct Ledger {
    pub store: RecordStore,
}

impl Ledger {
    /// Loads records from stdin (None), a file, or a directory, and the
    /// catalog from an optional file, falling back to the built-in price
    /// defaults.
    pub async fn load(records: Option<&str>, catalog: Option<&str>) -> Result<Self> {
        let mut store = RecordStore::load(records).await?;
        if let Some(path) = catalog {
            store.catalog = FuelCatalog::from_file(path).await?;
        }
        Ok(Ledger { store })
    }

    pub fn day(&self, date: NaiveDate) -> DayRecords {
        self.store.day(date)
    }

    pub fn summarize(&self, date: NaiveDate) -> DailySummary {
        self.store.summarize(date)
    }

    pub fn report(&self, date: NaiveDate) -> DayReport {
        DayReport::new(self.store.day(date))
    }
}
