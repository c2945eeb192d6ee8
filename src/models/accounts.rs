use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Chart-of-accounts entry. Seeded once, read-only afterwards;
/// `account_type` is one of asset, liability, equity, income, expense
/// (enforced by a table CHECK).
#[derive(sqlx::FromRow, Deserialize, Serialize, Debug, Clone)]
pub struct Account {
    pub code: String,
    pub name: String,
    pub account_type: String,
    pub description: Option<String>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}
