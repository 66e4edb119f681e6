use crate::money::Money;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

/// Raw record deserialized from one yaml document.
///
/// Every field is optional so that this shape doubles as the validation
/// input for record creation; the `type` field tags the record kind
/// ("sale", "credit", "income", "expense").
#[skip_serializing_none]
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize, Default)]
pub struct Record {
    pub id: Option<String>, // assigned at creation if not given
    pub r#type: Option<String>,
    pub date: Option<String>,

    // sale fields
    pub nozzle: Option<String>,
    pub fuel_type: Option<String>,
    pub start_reading: Option<Decimal>,
    pub end_reading: Option<Decimal>,
    pub rate: Option<Money>,
    pub channel: Option<String>,

    // derived on sales and credits; never trusted, always recomputed
    pub litres: Option<Decimal>,
    pub amount: Option<Money>,

    // credit fields
    pub customer_name: Option<String>,
    pub vehicle_number: Option<String>,
    pub due_date: Option<String>,
    pub status: Option<String>,

    // income/expense fields
    pub description: Option<String>,
    pub category: Option<String>,
}
