use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the currency registry. Exactly one row carries
/// `is_base = true` once a reassignment has happened; `exchange_rate` is the
/// amount of base currency one unit of this currency buys (1 for the base).
#[derive(sqlx::FromRow, Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct Currency {
    pub code: String,
    pub name: String,
    pub symbol: String,
    pub is_base: bool,
    pub is_active: bool,
    pub exchange_rate: Decimal,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}
