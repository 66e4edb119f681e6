use crate::money::Money;
use crate::record::{CreditRecord, ExpenseRecord, IncomeRecord, SaleRecord};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

/// Litres and amount dispensed for one fuel type over the day, across
/// every payment channel.
#[derive(Debug, Clone, PartialEq)]
pub struct FuelTypeTotals {
    pub fuel_type: String,
    pub litres: Decimal,
    pub amount: Money,
}

/// The derived daily ledger figures. Never persisted; recomputed on demand
/// from the day's records.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    /// Per-type totals over all sales of the day regardless of channel,
    /// in the order the types first appear.
    pub fuel_sales_by_type: Vec<FuelTypeTotals>,
    /// Litres over all sales of the day, all channels.
    pub total_litres: Decimal,
    /// Amount over cash-channel sales only.
    pub fuel_cash_sales: Money,
    pub credit_litres: Decimal,
    pub credit_amount: Money,
    pub other_income: Money,
    pub total_expenses: Money,
    /// Fuel cash sales plus credit, regardless of channel or payment.
    pub total_sales: Money,
    /// Fuel cash sales plus other income.
    pub total_income: Money,
    /// Cash-in-hand: fuel_cash_sales + other_income − total_expenses −
    /// credit_amount. May legitimately be negative; never clamped.
    pub adjusted_cash_sales: Money,
}

/// Derives the daily ledger for one date.
///
/// Every input collection is filtered to the target date here, so callers
/// need not pre-filter. Pure: same inputs, same summary, no side effects.
/// Never fails; an empty day yields an all-zero summary with an empty
/// by-type table.
pub fn summarize(
    date: NaiveDate,
    sales: &[SaleRecord],
    credits: &[CreditRecord],
    incomes: &[IncomeRecord],
    expenses: &[ExpenseRecord],
) -> DailySummary {
    let sales: Vec<&SaleRecord> = sales.iter().filter(|s| s.date == date).collect();
    let credits: Vec<&CreditRecord> = credits.iter().filter(|c| c.date == date).collect();
    let incomes: Vec<&IncomeRecord> = incomes.iter().filter(|i| i.date == date).collect();
    let expenses: Vec<&ExpenseRecord> = expenses.iter().filter(|e| e.date == date).collect();
    debug!(
        %date,
        sales = sales.len(),
        credits = credits.len(),
        incomes = incomes.len(),
        expenses = expenses.len(),
        "summarizing day"
    );

    // group by fuel type in first-appearance order; channel exclusion
    // applies to the cash totals below, not to this breakdown
    let mut fuel_sales_by_type: Vec<FuelTypeTotals> = Vec::new();
    for sale in &sales {
        match fuel_sales_by_type
            .iter_mut()
            .find(|t| t.fuel_type == sale.fuel_type)
        {
            Some(totals) => {
                totals.litres += sale.litres;
                totals.amount += sale.amount;
            }
            None => fuel_sales_by_type.push(FuelTypeTotals {
                fuel_type: sale.fuel_type.clone(),
                litres: sale.litres,
                amount: sale.amount,
            }),
        }
    }

    let total_litres: Decimal = sales.iter().map(|s| s.litres).sum();
    let fuel_cash_sales: Money = sales
        .iter()
        .filter(|s| s.is_cash())
        .map(|s| s.amount)
        .sum();
    let credit_litres: Decimal = credits.iter().map(|c| c.litres).sum();
    let credit_amount: Money = credits.iter().map(|c| c.amount).sum();
    let other_income: Money = incomes.iter().map(|i| i.amount).sum();
    let total_expenses: Money = expenses.iter().map(|e| e.amount).sum();

    DailySummary {
        date,
        fuel_sales_by_type,
        total_litres,
        fuel_cash_sales,
        credit_litres,
        credit_amount,
        other_income,
        total_expenses,
        total_sales: fuel_cash_sales + credit_amount,
        total_income: fuel_cash_sales + other_income,
        adjusted_cash_sales: fuel_cash_sales + other_income - total_expenses - credit_amount,
    }
}

#[cfg(test)]
mod summary_tests {
    use super::*;
    use crate::record::raw;
    use anyhow::Result;
    use num_traits::Zero;

    fn day() -> NaiveDate {
        "3000-01-01".parse().unwrap()
    }

    fn sale(
        id: &str,
        date: NaiveDate,
        fuel_type: &str,
        start: &str,
        end: &str,
        rate: &str,
        channel: &str,
    ) -> SaleRecord {
        SaleRecord::from_raw(
            id,
            date,
            &raw::Record {
                nozzle: Some("P1".to_owned()),
                fuel_type: Some(fuel_type.to_owned()),
                start_reading: Some(start.parse().unwrap()),
                end_reading: Some(end.parse().unwrap()),
                rate: Some(rate.parse().unwrap()),
                channel: Some(channel.to_owned()),
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn credit(id: &str, date: NaiveDate, litres: &str, rate: &str) -> CreditRecord {
        CreditRecord::from_raw(
            id,
            date,
            &raw::Record {
                customer_name: Some("ABC Transport Ltd.".to_owned()),
                fuel_type: Some("Diesel".to_owned()),
                litres: Some(litres.parse().unwrap()),
                rate: Some(rate.parse().unwrap()),
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn income(id: &str, date: NaiveDate, amount: &str) -> IncomeRecord {
        IncomeRecord::from_raw(
            id,
            date,
            &raw::Record {
                amount: Some(amount.parse().unwrap()),
                description: Some("misc".to_owned()),
                ..Default::default()
            },
        )
        .unwrap()
    }

    fn expense(id: &str, date: NaiveDate, amount: &str) -> ExpenseRecord {
        ExpenseRecord::from_raw(
            id,
            date,
            &raw::Record {
                amount: Some(amount.parse().unwrap()),
                description: Some("misc".to_owned()),
                ..Default::default()
            },
        )
        .unwrap()
    }

    #[test]
    fn worked_example() -> Result<()> {
        // one cash sale of 20 L at 100, a 500 credit, 300 income, 200 expenses
        let summary = summarize(
            day(),
            &[sale("s1", day(), "Petrol", "100", "120", "100", "cash")],
            &[credit("c1", day(), "5", "100")],
            &[income("i1", day(), "300")],
            &[expense("e1", day(), "200")],
        );
        assert_eq!(summary.fuel_cash_sales, "2000".parse()?);
        assert_eq!(summary.credit_amount, "500".parse()?);
        assert_eq!(summary.other_income, "300".parse()?);
        assert_eq!(summary.total_expenses, "200".parse()?);
        assert_eq!(summary.adjusted_cash_sales, "1600".parse()?);
        assert_eq!(summary.total_sales, "2500".parse()?);
        assert_eq!(summary.total_income, "2300".parse()?);
        Ok(())
    }

    #[test]
    fn non_cash_sales_are_excluded_from_cash_but_not_from_the_breakdown() -> Result<()> {
        let sales = [
            sale("s1", day(), "Petrol", "100", "120", "100", "cash"),
            sale("s2", day(), "Petrol", "500", "510.5", "100", "card"),
        ];
        let summary = summarize(day(), &sales, &[], &[], &[]);
        assert_eq!(summary.fuel_cash_sales, "2000".parse()?);
        assert_eq!(summary.fuel_sales_by_type.len(), 1);
        assert_eq!(summary.fuel_sales_by_type[0].amount, "3050".parse()?);
        assert_eq!(summary.fuel_sales_by_type[0].litres, "30.5".parse()?);
        // total litres span all channels
        assert_eq!(summary.total_litres, "30.5".parse()?);
        Ok(())
    }

    #[test]
    fn cash_in_hand_identity_holds() -> Result<()> {
        let summary = summarize(
            day(),
            &[sale("s1", day(), "Diesel", "200", "215.3", "89.75", "cash")],
            &[credit("c1", day(), "50", "89.75")],
            &[income("i1", day(), "120.25")],
            &[expense("e1", day(), "3000")],
        );
        assert_eq!(
            summary.adjusted_cash_sales,
            summary.fuel_cash_sales + summary.other_income
                - summary.total_expenses
                - summary.credit_amount
        );
        // negative cash-in-hand is a signal, not an error
        assert!(summary.adjusted_cash_sales < Money::zero());
        Ok(())
    }

    #[test]
    fn filters_to_the_target_date() -> Result<()> {
        let other: NaiveDate = "3000-01-02".parse()?;
        let sales = [
            sale("s1", day(), "Petrol", "100", "120", "100", "cash"),
            sale("s2", other, "Petrol", "120", "140", "100", "cash"),
        ];
        let summary = summarize(day(), &sales, &[], &[], &[]);
        assert_eq!(summary.fuel_cash_sales, "2000".parse()?);
        assert_eq!(summary.total_litres, "20".parse()?);
        Ok(())
    }

    #[test]
    fn empty_day_is_all_zero() {
        let date: NaiveDate = "2030-01-01".parse().unwrap();
        let summary = summarize(date, &[], &[], &[], &[]);
        assert!(summary.fuel_sales_by_type.is_empty());
        assert!(summary.total_litres.is_zero());
        assert!(summary.fuel_cash_sales.is_zero());
        assert!(summary.credit_amount.is_zero());
        assert!(summary.other_income.is_zero());
        assert!(summary.total_expenses.is_zero());
        assert!(summary.adjusted_cash_sales.is_zero());
    }

    #[test]
    fn repeat_calls_are_identical() {
        let sales = [sale("s1", day(), "Petrol", "100", "120", "100", "cash")];
        let credits = [credit("c1", day(), "5", "100")];
        let first = summarize(day(), &sales, &credits, &[], &[]);
        let second = summarize(day(), &sales, &credits, &[], &[]);
        assert_eq!(first, second);
    }

    #[test]
    fn blank_fuel_type_still_forms_a_group() {
        let mut odd = sale("s1", day(), "Petrol", "100", "120", "100", "cash");
        odd.fuel_type = String::new();
        let summary = summarize(day(), &[odd], &[], &[], &[]);
        assert_eq!(summary.fuel_sales_by_type.len(), 1);
        assert_eq!(summary.fuel_sales_by_type[0].fuel_type, "");
    }

    #[test]
    fn by_type_keeps_first_appearance_order() {
        let sales = [
            sale("s1", day(), "Diesel", "200", "210", "89.75", "cash"),
            sale("s2", day(), "Petrol", "100", "120", "100", "cash"),
            sale("s3", day(), "Diesel", "210", "220", "89.75", "cash"),
        ];
        let summary = summarize(day(), &sales, &[], &[], &[]);
        let order: Vec<&str> = summary
            .fuel_sales_by_type
            .iter()
            .map(|t| t.fuel_type.as_str())
            .collect();
        assert_eq!(order, vec!["Diesel", "Petrol"]);
    }
}
