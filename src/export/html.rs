use super::{litres_cell, DayReport, WriteFormat};
use crate::money::Money;
use anyhow::Result;
use num_traits::Zero;
use std::io::Write;

/// Self-contained printable page with the summary table. Negative amounts
/// (a short cash drawer) get a `negative` class so they stand out.
pub struct Html;

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

impl WriteFormat for Html {
    fn write<W: Write>(mut w: W, report: &DayReport) -> Result<()> {
        writeln!(w, "<!DOCTYPE html>")?;
        writeln!(w, "<html><head><meta charset=\"utf-8\">")?;
        writeln!(w, "<title>Daily Ledger {}</title>", report.summary.date)?;
        writeln!(w, "<style>")?;
        writeln!(w, "body {{ font-family: sans-serif; margin: 2em; }}")?;
        writeln!(w, "table {{ border-collapse: collapse; }}")?;
        writeln!(
            w,
            "td, th {{ border: 1px solid #999; padding: 0.3em 0.8em; text-align: right; }}"
        )?;
        writeln!(w, "td:first-child, th:first-child {{ text-align: left; }}")?;
        writeln!(w, ".negative {{ color: #b00; }}")?;
        writeln!(w, "</style></head><body>")?;
        writeln!(w, "<h1>Forecourt Daily Ledger</h1>")?;
        writeln!(w, "<p>{}</p>", report.summary.date)?;
        writeln!(w, "<table>")?;
        writeln!(w, "<tr><th>Category</th><th>Litres</th><th>Amount</th></tr>")?;
        for row in &report.rows {
            let class = if row.amount < Money::zero() {
                " class=\"negative\""
            } else {
                ""
            };
            let litres = row.litres.map(litres_cell).unwrap_or_default();
            writeln!(
                w,
                "<tr{}><td>{}</td><td>{}</td><td>{}</td></tr>",
                class,
                escape(&row.category),
                litres,
                row.amount
            )?;
        }
        writeln!(w, "</table></body></html>")?;
        Ok(())
    }
}
