use anyhow::Result;
use chrono::NaiveDate;
use forecourt::export::{render, Csv, Html, Text};
use forecourt::{Ledger, Money};
use itertools::Itertools;
use rust_decimal::Decimal;

fn mid_january() -> NaiveDate {
    "3000-01-15".parse().unwrap()
}

#[async_std::test]
async fn loads_a_directory_of_records() -> Result<()> {
    let ledger = Ledger::load(Some("./tests/fixtures/week"), None).await?;
    assert_eq!(ledger.store.sales.len(), 4);
    assert_eq!(ledger.store.credits.len(), 1);
    assert_eq!(ledger.store.incomes.len(), 2);
    assert_eq!(ledger.store.expenses.len(), 1);
    let unique_ids = ledger
        .store
        .sales
        .iter()
        .map(|sale| sale.id.as_str())
        .unique()
        .count();
    assert_eq!(unique_ids, 4);

    let day = ledger.day(mid_january());
    assert_eq!(day.sales.len(), 3);
    assert_eq!(day.incomes.len(), 1);
    Ok(())
}

#[async_std::test]
async fn summarizes_a_day() -> Result<()> {
    let ledger = Ledger::load(Some("./tests/fixtures/week"), None).await?;
    let summary = ledger.summarize(mid_january());

    // the card sale counts toward litres and the breakdown but not cash
    assert_eq!(summary.fuel_cash_sales, "3373.175".parse()?);
    assert_eq!(summary.total_litres, "45.8".parse::<Decimal>()?);
    let petrol = &summary.fuel_sales_by_type[0];
    assert_eq!(petrol.fuel_type, "Petrol");
    assert_eq!(petrol.litres, "30.5".parse::<Decimal>()?);
    assert_eq!(petrol.amount, "3050".parse()?);
    let diesel = &summary.fuel_sales_by_type[1];
    assert_eq!(diesel.fuel_type, "Diesel");
    assert_eq!(diesel.amount, "1373.175".parse()?);

    assert_eq!(summary.credit_amount, "500".parse()?);
    assert_eq!(summary.other_income, "300".parse()?);
    assert_eq!(summary.total_expenses, "200".parse()?);
    assert_eq!(summary.adjusted_cash_sales, "2973.175".parse()?);
    assert_eq!(summary.total_sales, "3873.175".parse()?);
    assert_eq!(summary.total_income, "3673.175".parse()?);
    assert_eq!(
        summary.adjusted_cash_sales,
        summary.fuel_cash_sales + summary.other_income
            - summary.total_expenses
            - summary.credit_amount
    );
    Ok(())
}

#[async_std::test]
async fn every_format_reports_the_same_figures() -> Result<()> {
    let ledger = Ledger::load(Some("./tests/fixtures/week"), None).await?;
    let report = ledger.report(mid_january());

    let text = render::<Text>(&report)?;
    let csv = render::<Csv>(&report)?;
    let html = render::<Html>(&report)?;
    for page in [&text, &csv, &html] {
        assert!(page.contains("3050.00"), "missing petrol total:\n{page}");
        assert!(page.contains("1373.18"), "missing diesel total:\n{page}");
        assert!(page.contains("2973.18"), "missing cash in hand:\n{page}");
    }
    assert!(text.contains("ABC Transport Ltd."));
    assert!(csv.starts_with("category,litres,amount\n"));
    assert!(html.contains("<table>"));
    Ok(())
}

#[async_std::test]
async fn bad_historical_records_do_not_break_a_load() -> Result<()> {
    let ledger = Ledger::load(Some("./tests/fixtures/lenient/records.yml"), None).await?;
    // the unknown kind and the unusable date are skipped, the sale with a
    // blank meter comes through as zero litres
    assert_eq!(ledger.store.sales.len(), 2);
    assert!(ledger.store.credits.is_empty());
    assert!(ledger.store.expenses.is_empty());
    let blank = ledger
        .store
        .sales
        .iter()
        .find(|sale| sale.id == "sale-blank-meter")
        .unwrap();
    assert_eq!(blank.litres, Decimal::ZERO);
    assert_eq!(blank.amount, Money(Decimal::ZERO));
    Ok(())
}

#[async_std::test]
async fn catalog_file_overrides_the_defaults() -> Result<()> {
    let ledger = Ledger::load(
        Some("./tests/fixtures/week"),
        Some("./tests/fixtures/catalog.yml"),
    )
    .await?;
    let catalog = &ledger.store.catalog;
    assert_eq!(catalog.entries().len(), 2);
    let petrol = catalog.get("Petrol").unwrap();
    assert_eq!(petrol.price, "110".parse()?);
    assert_eq!(petrol.nozzle_count, 4);
    assert_eq!(catalog.get("Diesel").unwrap().nozzle_count, 2);
    assert_eq!(catalog.nozzle_ids("Petrol"), vec!["P1", "P2", "P3", "P4"]);
    Ok(())
}
