use super::{litres_cell, DayReport, WriteFormat};
use anyhow::Result;
use std::io::Write;

/// Fixed-width plain text, one section per record kind plus the summary
/// table. Sections with no records for the day are left out.
pub struct Text;

impl WriteFormat for Text {
    fn write<W: Write>(mut w: W, report: &DayReport) -> Result<()> {
        writeln!(w, "Forecourt Daily Ledger | {}", report.summary.date)?;
        if !report.day.sales.is_empty() {
            writeln!(w, "\nSales")?;
            for sale in &report.day.sales {
                writeln!(w, "{}", sale)?;
            }
        }
        if !report.day.credits.is_empty() {
            writeln!(w, "\nCredit")?;
            for credit in &report.day.credits {
                writeln!(w, "{}", credit)?;
            }
        }
        if !report.day.incomes.is_empty() {
            writeln!(w, "\nIncome")?;
            for income in &report.day.incomes {
                writeln!(w, "{}", income)?;
            }
        }
        if !report.day.expenses.is_empty() {
            writeln!(w, "\nExpenses")?;
            for expense in &report.day.expenses {
                writeln!(w, "{}", expense)?;
            }
        }
        writeln!(w, "\nSummary")?;
        for row in &report.rows {
            let litres = row.litres.map(litres_cell).unwrap_or_default();
            writeln!(
                w,
                "{:<24} | {:>10} | {:>12}",
                row.category,
                litres,
                row.amount.to_string()
            )?;
        }
        Ok(())
    }
}
