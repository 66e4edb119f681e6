pub mod csv;
pub mod html;
pub mod text;

pub use self::csv::Csv;
pub use html::Html;
pub use text::Text;

use crate::money::{display_dp2, Money};
use crate::store::DayRecords;
use crate::summary::DailySummary;
use anyhow::Result;
use rust_decimal::Decimal;
use std::io::Write;

/// One line of the report table. Litres are absent for rows that have no
/// volume dimension (income, expenses, cash-in-hand).
pub struct ReportRow {
    pub category: String,
    pub litres: Option<Decimal>,
    pub amount: Money,
}

/// A day's records with their derived summary, flattened to the row table
/// every output format renders. Building the rows once here keeps the
/// formats from disagreeing about figures.
pub struct DayReport {
    pub day: DayRecords,
    pub summary: DailySummary,
    pub rows: Vec<ReportRow>,
}

impl DayReport {
    pub fn new(day: DayRecords) -> Self {
        let summary = day.summarize();
        let mut rows: Vec<ReportRow> = summary
            .fuel_sales_by_type
            .iter()
            .map(|totals| ReportRow {
                category: totals.fuel_type.clone(),
                litres: Some(totals.litres),
                amount: totals.amount,
            })
            .collect();
        rows.push(ReportRow {
            category: "Credit".to_owned(),
            litres: Some(summary.credit_litres),
            amount: summary.credit_amount,
        });
        rows.push(ReportRow {
            category: "Income".to_owned(),
            litres: None,
            amount: summary.other_income,
        });
        rows.push(ReportRow {
            category: "Expenses".to_owned(),
            litres: None,
            amount: summary.total_expenses,
        });
        rows.push(ReportRow {
            category: "Cash in Hand".to_owned(),
            litres: None,
            amount: summary.adjusted_cash_sales,
        });
        DayReport { day, summary, rows }
    }
}

pub trait WriteFormat {
    fn write<W: Write>(w: W, report: &DayReport) -> Result<()>;
}

pub fn render<F: WriteFormat>(report: &DayReport) -> Result<String> {
    let mut buf = Vec::new();
    F::write(&mut buf, report)?;
    Ok(String::from_utf8(buf)?)
}

pub(crate) fn litres_cell(litres: Decimal) -> String {
    format!("{} L", display_dp2(litres))
}
