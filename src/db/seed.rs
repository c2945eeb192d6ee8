use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::core::AppError;

/// Seed the company settings record, the currency registry and the chart of
/// accounts. Each table is only touched when it is empty, so running this on
/// every startup is safe.
pub async fn seed_database(pool: &PgPool) -> Result<(), AppError> {
    seed_company_settings(pool).await?;
    seed_currencies(pool).await?;
    seed_chart_of_accounts(pool).await?;
    Ok(())
}

async fn table_count(pool: &PgPool, table: &str) -> Result<i64, AppError> {
    let count = sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(pool)
        .await
        .map_err(AppError::db_error)?;
    Ok(count)
}

async fn seed_company_settings(pool: &PgPool) -> Result<(), AppError> {
    if table_count(pool, "company_settings").await? > 0 {
        tracing::info!("Company settings already present, skipping seed");
        return Ok(());
    }

    sqlx::query(
        r#"
        INSERT INTO company_settings (
            id, company_name, company_email, company_phone, company_address,
            currency, currency_symbol, date_format, timezone
        )
        VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind("Code Academy Uganda")
    .bind("info@codeacademy.ug")
    .bind("+256-XXX-XXXXXX")
    .bind("Kampala, Uganda")
    .bind("UGX")
    .bind("UGX")
    .bind("Y-m-d")
    .bind("Africa/Kampala")
    .execute(pool)
    .await
    .map_err(AppError::db_error)?;

    tracing::info!("Seeded company settings");
    Ok(())
}

async fn seed_currencies(pool: &PgPool) -> Result<(), AppError> {
    if table_count(pool, "currencies").await? > 0 {
        tracing::info!("Currencies already present, skipping seed");
        return Ok(());
    }

    // exchange_rate is units of base (UGX) per one unit of the currency
    let currencies: [(&str, &str, &str, bool, Decimal); 5] = [
        ("UGX", "Ugandan Shilling", "USh", true, Decimal::ONE),
        ("USD", "US Dollar", "$", false, Decimal::new(3750, 0)),
        ("KES", "Kenyan Shilling", "KSh", false, Decimal::new(29, 0)),
        ("EUR", "Euro", "€", false, Decimal::new(4100, 0)),
        ("GBP", "British Pound", "£", false, Decimal::new(4800, 0)),
    ];

    for (code, name, symbol, is_base, exchange_rate) in currencies {
        sqlx::query(
            r#"
            INSERT INTO currencies (code, name, symbol, is_base, is_active, exchange_rate)
            VALUES ($1, $2, $3, $4, TRUE, $5)
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(symbol)
        .bind(is_base)
        .bind(exchange_rate)
        .execute(pool)
        .await
        .map_err(AppError::db_error)?;
    }

    tracing::info!("Seeded {} currencies", currencies.len());
    Ok(())
}

async fn seed_chart_of_accounts(pool: &PgPool) -> Result<(), AppError> {
    if table_count(pool, "accounts").await? > 0 {
        tracing::info!("Chart of accounts already present, skipping seed");
        return Ok(());
    }

    let accounts: [(&str, &str, &str, &str); 17] = [
        ("1000", "Cash", "asset", "Cash on hand"),
        ("1100", "Bank Account", "asset", "Bank deposits"),
        ("1200", "Accounts Receivable", "asset", "Money owed by customers"),
        ("2000", "Accounts Payable", "liability", "Money owed to vendors"),
        ("2100", "Loans Payable", "liability", "Outstanding loans"),
        ("3000", "Owner's Equity", "equity", "Owner's investment"),
        ("3100", "Retained Earnings", "equity", "Accumulated profits"),
        ("4000", "Program Fees", "income", "Revenue from programs"),
        ("4100", "Donations", "income", "Donation income"),
        ("4200", "Grants", "income", "Grant income"),
        ("5000", "Salaries & Wages", "expense", "Staff compensation"),
        ("5100", "Rent", "expense", "Facility rent"),
        ("5200", "Utilities", "expense", "Electricity, water, internet"),
        ("5300", "Supplies", "expense", "Office and program supplies"),
        ("5400", "Marketing", "expense", "Marketing and advertising"),
        ("5500", "Training Materials", "expense", "Educational materials"),
        ("5600", "Equipment", "expense", "Computers and equipment"),
    ];

    for (code, name, account_type, description) in accounts {
        sqlx::query(
            r#"
            INSERT INTO accounts (code, name, account_type, description)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(code)
        .bind(name)
        .bind(account_type)
        .bind(description)
        .execute(pool)
        .await
        .map_err(AppError::db_error)?;
    }

    tracing::info!("Seeded {} chart of accounts entries", accounts.len());
    Ok(())
}
