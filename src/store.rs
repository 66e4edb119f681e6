use crate::catalog::FuelCatalog;
use crate::error::LedgerError;
use crate::record::{raw, CreditRecord, ExpenseRecord, IncomeRecord, Record, SaleRecord};
use crate::summary::{summarize, DailySummary};
use anyhow::{Context, Result};
use async_std::fs::{self, File};
use async_std::io::prelude::*;
use async_std::io::stdin;
use async_walkdir::{DirEntry, WalkDir};
use chrono::NaiveDate;
use futures::stream::TryStreamExt;
use serde::Deserialize;
use std::io::ErrorKind;
use tracing::{debug, warn};
use uuid::Uuid;

/// In-memory collection of the station's records plus the fuel catalog.
/// Records are held per kind; derived figures come from [summarize], never
/// from stored state.
pub struct RecordStore {
    pub sales: Vec<SaleRecord>,
    pub credits: Vec<CreditRecord>,
    pub incomes: Vec<IncomeRecord>,
    pub expenses: Vec<ExpenseRecord>,
    pub catalog: FuelCatalog,
}

impl Default for RecordStore {
    fn default() -> Self {
        RecordStore {
            sales: Vec::new(),
            credits: Vec::new(),
            incomes: Vec::new(),
            expenses: Vec::new(),
            catalog: FuelCatalog::defaults(),
        }
    }
}

/// One day's records, sliced out of the store by date.
pub struct DayRecords {
    pub date: NaiveDate,
    pub sales: Vec<SaleRecord>,
    pub credits: Vec<CreditRecord>,
    pub incomes: Vec<IncomeRecord>,
    pub expenses: Vec<ExpenseRecord>,
}

impl DayRecords {
    pub fn summarize(&self) -> DailySummary {
        summarize(
            self.date,
            &self.sales,
            &self.credits,
            &self.incomes,
            &self.expenses,
        )
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads YAML multi-documents from stdin (None), a file, or every
    /// non-hidden file under a directory.
    pub async fn load(source: Option<&str>) -> Result<Self> {
        let contents = match source {
            None => {
                let mut contents = String::new();
                stdin().read_to_string(&mut contents).await?;
                contents
            }
            Some(path) => {
                let metadata = fs::metadata(path)
                    .await
                    .with_context(|| format!("cannot read records from {:?}", path))?;
                if metadata.is_dir() {
                    Self::dir_documents(path).await?
                } else {
                    fs::read_to_string(path).await?
                }
            }
        };
        let mut store = Self::new();
        store.ingest(&contents);
        Ok(store)
    }

    async fn dir_documents(dir: &str) -> Result<String> {
        let files: Vec<File> = WalkDir::new(dir)
            .try_filter_map(|dir_entry: DirEntry| async move {
                let path = dir_entry.path();
                let filestem = path
                    .file_stem()
                    .ok_or(std::io::Error::new(ErrorKind::Other, "No file stem"))?
                    .to_string_lossy();
                if path.is_dir() || filestem.starts_with(".") {
                    return Ok(None);
                };
                File::open(&path).await.map(Option::Some)
            })
            .try_collect()
            .await?;
        let mut docs = Vec::with_capacity(files.len());
        for mut file in files {
            let mut contents = String::new();
            file.read_to_string(&mut contents).await?;
            docs.push(contents);
        }
        Ok(docs.join("\n---\n"))
    }

    /// Parses a YAML multi-document string and appends every readable
    /// record. Malformed documents are logged and skipped.
    pub fn ingest(&mut self, contents: &str) {
        for doc in serde_yaml::Deserializer::from_str(contents) {
            let value = match serde_yaml::Value::deserialize(doc) {
                Ok(value) => value,
                Err(err) => {
                    warn!(%err, "skipping unreadable document");
                    continue;
                }
            };
            if value.is_null() {
                // empty document between separators
                continue;
            }
            let raw: raw::Record = match serde_yaml::from_value(value) {
                Ok(raw) => raw,
                Err(err) => {
                    warn!(%err, "skipping malformed record");
                    continue;
                }
            };
            if let Some(record) = Record::from_raw_lenient(raw) {
                self.push(record);
            }
        }
        debug!(
            sales = self.sales.len(),
            credits = self.credits.len(),
            incomes = self.incomes.len(),
            expenses = self.expenses.len(),
            "ingested records"
        );
    }

    fn push(&mut self, record: Record) {
        match record {
            Record::Sale(sale) => self.sales.push(sale),
            Record::Credit(credit) => self.credits.push(credit),
            Record::Income(income) => self.incomes.push(income),
            Record::Expense(expense) => self.expenses.push(expense),
        }
    }

    pub fn day(&self, date: NaiveDate) -> DayRecords {
        DayRecords {
            date,
            sales: self
                .sales
                .iter()
                .filter(|r| r.date == date)
                .cloned()
                .collect(),
            credits: self
                .credits
                .iter()
                .filter(|r| r.date == date)
                .cloned()
                .collect(),
            incomes: self
                .incomes
                .iter()
                .filter(|r| r.date == date)
                .cloned()
                .collect(),
            expenses: self
                .expenses
                .iter()
                .filter(|r| r.date == date)
                .cloned()
                .collect(),
        }
    }

    pub fn summarize(&self, date: NaiveDate) -> DailySummary {
        summarize(
            date,
            &self.sales,
            &self.credits,
            &self.incomes,
            &self.expenses,
        )
    }

    /// Validates and stores a new sale, assigning it a fresh id.
    pub fn add_sale(&mut self, date: NaiveDate, raw: &raw::Record) -> Result<SaleRecord, LedgerError> {
        let id = Uuid::new_v4().to_string();
        let sale = SaleRecord::from_raw(&id, date, raw)?;
        self.sales.push(sale.clone());
        Ok(sale)
    }

    pub fn add_credit(
        &mut self,
        date: NaiveDate,
        raw: &raw::Record,
    ) -> Result<CreditRecord, LedgerError> {
        let id = Uuid::new_v4().to_string();
        let credit = CreditRecord::from_raw(&id, date, raw)?;
        self.credits.push(credit.clone());
        Ok(credit)
    }

    pub fn add_income(
        &mut self,
        date: NaiveDate,
        raw: &raw::Record,
    ) -> Result<IncomeRecord, LedgerError> {
        let id = Uuid::new_v4().to_string();
        let income = IncomeRecord::from_raw(&id, date, raw)?;
        self.incomes.push(income.clone());
        Ok(income)
    }

    pub fn add_expense(
        &mut self,
        date: NaiveDate,
        raw: &raw::Record,
    ) -> Result<ExpenseRecord, LedgerError> {
        let id = Uuid::new_v4().to_string();
        let expense = ExpenseRecord::from_raw(&id, date, raw)?;
        self.expenses.push(expense.clone());
        Ok(expense)
    }

    /// Replaces a sale in place, re-deriving litres and amount from the
    /// new input. The id and date are kept.
    pub fn update_sale(&mut self, id: &str, raw: &raw::Record) -> Result<&SaleRecord, LedgerError> {
        let index = self
            .sales
            .iter()
            .position(|r| r.id == id)
            .ok_or_else(|| LedgerError::NotFound(format!("sale {}", id)))?;
        self.sales[index] = SaleRecord::from_raw(id, self.sales[index].date, raw)?;
        Ok(&self.sales[index])
    }

    pub fn delete_sale(&mut self, id: &str) -> bool {
        let before = self.sales.len();
        self.sales.retain(|r| r.id != id);
        self.sales.len() < before
    }

    pub fn delete_credit(&mut self, id: &str) -> bool {
        let before = self.credits.len();
        self.credits.retain(|r| r.id != id);
        self.credits.len() < before
    }

    pub fn delete_income(&mut self, id: &str) -> bool {
        let before = self.incomes.len();
        self.incomes.retain(|r| r.id != id);
        self.incomes.len() < before
    }

    pub fn delete_expense(&mut self, id: &str) -> bool {
        let before = self.expenses.len();
        self.expenses.retain(|r| r.id != id);
        self.expenses.len() < before
    }

    /// Serializes every record back to a YAML multi-document string,
    /// ordered by date then kind.
    pub fn to_yaml(&self) -> Result<String> {
        let mut records: Vec<Record> = Vec::new();
        records.extend(self.sales.iter().cloned().map(Record::Sale));
        records.extend(self.credits.iter().cloned().map(Record::Credit));
        records.extend(self.incomes.iter().cloned().map(Record::Income));
        records.extend(self.expenses.iter().cloned().map(Record::Expense));
        records.sort_by_key(Record::date);
        let mut out = String::new();
        for record in &records {
            if !out.is_empty() {
                out.push_str("---\n");
            }
            out.push_str(&serde_yaml::to_string(&record.to_raw())?);
        }
        Ok(out)
    }

    pub async fn save(&self, path: &str) -> Result<()> {
        fs::write(path, self.to_yaml()?)
            .await
            .with_context(|| format!("cannot write records to {:?}", path))
    }
}
