use super::{DayReport, WriteFormat};
use crate::money::display_dp2;
use ::csv::WriterBuilder;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;

/// Summary table only, numbers without the currency symbol so the file
/// loads straight into a spreadsheet.
pub struct Csv;

#[derive(Serialize)]
struct CsvRow<'a> {
    category: &'a str,
    litres: String,
    amount: String,
}

impl WriteFormat for Csv {
    fn write<W: Write>(mut w: W, report: &DayReport) -> Result<()> {
        let mut wrt = WriterBuilder::new().from_writer(&mut w);
        for row in &report.rows {
            wrt.serialize(CsvRow {
                category: &row.category,
                litres: row
                    .litres
                    .map(|l| display_dp2(l).to_string())
                    .unwrap_or_default(),
                amount: row.amount.rounded().to_string(),
            })?;
        }
        wrt.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod csv_tests {
    use super::super::{render, report_tests::single_sale_report};
    use super::*;
    use indoc::indoc;

    #[test]
    fn renders_the_summary_table() -> Result<()> {
        let report = single_sale_report();
        let page = render::<Csv>(&report)?;
        assert_eq!(
            page,
            indoc! {"
                category,litres,amount
                Petrol,20.00,2000.00
                Credit,0.00,0.00
                Income,,0.00
                Expenses,,0.00
                Cash in Hand,,2000.00
            "}
        );
        Ok(())
    }
}
