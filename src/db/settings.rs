use sqlx::PgPool;

use crate::core::AppError;
use crate::models::settings::{CompanySettings, UpdateCompanySettings};

const SELECT_SETTINGS: &str = r#"
    SELECT
        id,
        company_name,
        company_email,
        company_phone,
        company_address,
        tax_id,
        currency,
        currency_symbol,
        date_format,
        timezone,
        logo_path,
        lock_before_date,
        created_at,
        updated_at
    FROM company_settings
    WHERE id = 1
"#;

/// Load the singleton record; an absent row is valid and comes back as the
/// defaults.
pub async fn fetch_company_settings(pool: &PgPool) -> Result<CompanySettings, AppError> {
    let record = sqlx::query_as::<_, CompanySettings>(SELECT_SETTINGS)
        .fetch_optional(pool)
        .await
        .map_err(AppError::db_error)?;

    Ok(record.unwrap_or_default())
}

/// Create-if-absent, else update-in-place. The command has already been
/// validated; provided fields overwrite, omitted fields keep their stored
/// values. `new_logo_path`, when present, replaces the stored reference.
pub async fn upsert_company_settings(
    pool: &PgPool,
    command: &UpdateCompanySettings,
    new_logo_path: Option<&str>,
) -> Result<CompanySettings, AppError> {
    let mut record = fetch_company_settings(pool).await?;
    record.apply(command);
    if let Some(path) = new_logo_path {
        record.logo_path = Some(path.to_string());
    }

    let saved = sqlx::query_as::<_, CompanySettings>(
        r#"
        INSERT INTO company_settings (
            id, company_name, company_email, company_phone, company_address, tax_id,
            currency, currency_symbol, date_format, timezone, logo_path, lock_before_date
        )
        VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (id) DO UPDATE SET
            company_name = EXCLUDED.company_name,
            company_email = EXCLUDED.company_email,
            company_phone = EXCLUDED.company_phone,
            company_address = EXCLUDED.company_address,
            tax_id = EXCLUDED.tax_id,
            currency = EXCLUDED.currency,
            currency_symbol = EXCLUDED.currency_symbol,
            date_format = EXCLUDED.date_format,
            timezone = EXCLUDED.timezone,
            logo_path = EXCLUDED.logo_path,
            lock_before_date = EXCLUDED.lock_before_date,
            updated_at = NOW()
        RETURNING
            id, company_name, company_email, company_phone, company_address, tax_id,
            currency, currency_symbol, date_format, timezone, logo_path, lock_before_date,
            created_at, updated_at
        "#,
    )
    .bind(&record.company_name)
    .bind(&record.company_email)
    .bind(&record.company_phone)
    .bind(&record.company_address)
    .bind(&record.tax_id)
    .bind(&record.currency)
    .bind(&record.currency_symbol)
    .bind(&record.date_format)
    .bind(&record.timezone)
    .bind(&record.logo_path)
    .bind(record.lock_before_date)
    .fetch_one(pool)
    .await
    .map_err(AppError::db_error)?;

    Ok(saved)
}

/// Clear the stored logo reference, returning the previous one so the caller
/// can clean up the blob. `None` when there is no record or no logo; that is
/// a no-op, not an error.
pub async fn clear_logo_path(pool: &PgPool) -> Result<Option<String>, AppError> {
    let existing = sqlx::query_as::<_, CompanySettings>(SELECT_SETTINGS)
        .fetch_optional(pool)
        .await
        .map_err(AppError::db_error)?;

    let previous = match existing.and_then(|record| record.logo_path) {
        Some(path) => path,
        None => return Ok(None),
    };

    sqlx::query("UPDATE company_settings SET logo_path = NULL, updated_at = NOW() WHERE id = 1")
        .execute(pool)
        .await
        .map_err(AppError::db_error)?;

    Ok(Some(previous))
}
