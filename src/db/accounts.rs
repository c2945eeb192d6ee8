use sqlx::PgPool;

use crate::core::AppError;
use crate::models::accounts::Account;

pub async fn fetch_accounts(pool: &PgPool) -> Result<Vec<Account>, AppError> {
    let accounts = sqlx::query_as::<_, Account>(
        r#"
        SELECT code, name, account_type, description, created_at, updated_at
        FROM accounts
        ORDER BY code ASC
        "#,
    )
    .fetch_all(pool)
    .await
    .map_err(AppError::db_error)?;

    Ok(accounts)
}
