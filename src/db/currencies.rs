use sqlx::PgPool;

use crate::core::{AppError, AppErrorType};
use crate::models::currencies::Currency;

const CURRENCY_COLUMNS: &str =
    "code, name, symbol, is_base, is_active, exchange_rate, created_at, updated_at";

/// All known currencies, base currency first, then by code.
pub async fn list_currencies(pool: &PgPool) -> Result<Vec<Currency>, AppError> {
    let currencies = sqlx::query_as::<_, Currency>(&format!(
        "SELECT {} FROM currencies ORDER BY is_base DESC, code ASC",
        CURRENCY_COLUMNS
    ))
    .fetch_all(pool)
    .await
    .map_err(AppError::db_error)?;

    Ok(currencies)
}

/// The seed data guarantees one base row exists; a registry without one is a
/// broken precondition and surfaces as NotFound rather than being papered
/// over.
pub async fn get_base_currency(pool: &PgPool) -> Result<Currency, AppError> {
    match sqlx::query_as::<_, Currency>(&format!(
        "SELECT {} FROM currencies WHERE is_base = TRUE",
        CURRENCY_COLUMNS
    ))
    .fetch_optional(pool)
    .await
    {
        Err(e) => {
            tracing::error!("Failed to execute query: {:?}", e);
            Err(AppError::db_error(e))
        }
        Ok(Some(currency)) => Ok(currency),
        Ok(None) => Err(AppError {
            message: Some("No base currency is configured".to_string()),
            cause: None,
            error_type: AppErrorType::NotFoundError,
        }),
    }
}

/// Reassign the base currency. The existence check, the table-wide clear and
/// the set commit or roll back as one transaction, so an unknown code leaves
/// the registry untouched and concurrent reassignments can never end with
/// zero or two base rows. The clear deliberately touches every row: the row
/// locks it takes are what serializes concurrent calls.
pub async fn set_base_currency(pool: &PgPool, code: &str) -> Result<Currency, AppError> {
    let mut tx = pool.begin().await.map_err(AppError::db_error)?;

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM currencies WHERE code = $1)",
    )
    .bind(code)
    .fetch_one(tx.as_mut())
    .await
    .map_err(AppError::db_error)?;

    if !exists {
        return Err(AppError {
            message: Some(format!("Unknown currency code: {}", code)),
            cause: None,
            error_type: AppErrorType::NotFoundError,
        });
    }

    sqlx::query("UPDATE currencies SET is_base = FALSE")
        .execute(tx.as_mut())
        .await
        .map_err(AppError::db_error)?;

    let updated = sqlx::query_as::<_, Currency>(&format!(
        "UPDATE currencies SET is_base = TRUE, is_active = TRUE, updated_at = NOW() WHERE code = $1 RETURNING {}",
        CURRENCY_COLUMNS
    ))
    .bind(code)
    .fetch_optional(tx.as_mut())
    .await
    .map_err(AppError::db_error)?;

    // Dropping the transaction without committing rolls the clear back.
    let currency = match updated {
        Some(currency) => currency,
        None => {
            return Err(AppError {
                message: Some(format!("Unknown currency code: {}", code)),
                cause: None,
                error_type: AppErrorType::NotFoundError,
            })
        }
    };

    tx.commit().await.map_err(AppError::db_error)?;

    Ok(currency)
}
