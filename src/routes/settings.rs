use actix_multipart::{Field, Multipart};
use actix_web::{delete, get, post, web, HttpResponse, Responder};
use chrono::NaiveDate;
use futures_util::TryStreamExt;
use sqlx::PgPool;
use tracing::instrument;
use validator::Validate;

use crate::{
    core::{AppError, AppErrorType, AppSuccessResponse, LogoStorage},
    db::{currencies, settings},
    models::settings::{
        non_empty, CompanySettingsView, LogoUpload, UpdateCompanySettings, MAX_LOGO_BYTES,
    },
};

#[instrument(name = "Get Company Settings", skip(pool, storage))]
#[get("/company")]
pub async fn get_company_settings(
    pool: web::Data<PgPool>,
    storage: web::Data<LogoStorage>,
) -> Result<impl Responder, AppError> {
    let company_settings = settings::fetch_company_settings(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch company settings: {:?}", e);
            AppError {
                message: Some("Failed to fetch company settings".to_string()),
                cause: Some(e.to_string()),
                error_type: AppErrorType::InternalServerError,
            }
        })?;

    let all_currencies = currencies::list_currencies(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch currencies: {:?}", e);
            AppError {
                message: Some("Failed to fetch currencies".to_string()),
                cause: Some(e.to_string()),
                error_type: AppErrorType::InternalServerError,
            }
        })?;

    let base_currency = currencies::get_base_currency(pool.get_ref()).await?;

    let logo_url = company_settings
        .logo_path
        .as_deref()
        .map(|reference| storage.url_for(reference));

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        message: "Company settings retrieved successfully".to_string(),
        data: Some(CompanySettingsView {
            settings: company_settings,
            logo_url,
            currencies: all_currencies,
            base_currency,
        }),
    }))
}

#[instrument(name = "Update Company Settings", skip(pool, storage, payload))]
#[post("/company")]
pub async fn update_company_settings(
    pool: web::Data<PgPool>,
    storage: web::Data<LogoStorage>,
    mut payload: Multipart,
) -> Result<impl Responder, AppError> {
    let (command, logo) = parse_settings_form(&mut payload).await?;

    // Everything is checked before anything is written; a bad logo must not
    // let the text fields through either.
    command.validate().map_err(AppError::from)?;
    if let Some(upload) = &logo {
        upload.validate()?;
    }

    let previous = settings::fetch_company_settings(pool.get_ref()).await?;

    let new_logo_path = match &logo {
        Some(upload) => Some(storage.store(&upload.filename, &upload.bytes)?),
        None => None,
    };

    let saved = settings::upsert_company_settings(
        pool.get_ref(),
        &command,
        new_logo_path.as_deref(),
    )
    .await
    .map_err(|e| {
        // Clean up the just-stored blob so a failed save leaves no dangling
        // reference and no stray file.
        if let Some(reference) = new_logo_path.as_deref() {
            storage.delete(reference);
        }
        tracing::error!("Failed to save company settings: {:?}", e);
        e
    })?;

    // The replaced blob is cleanup, not a correctness dependency; deletion
    // failure is logged inside `delete` and ignored.
    if new_logo_path.is_some() {
        if let Some(reference) = previous.logo_path.as_deref() {
            if storage.exists(reference) {
                storage.delete(reference);
            }
        }
    }

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        message: "Company settings updated successfully.".to_string(),
        data: Some(saved),
    }))
}

#[instrument(name = "Remove Company Logo", skip(pool, storage))]
#[delete("/company/logo")]
pub async fn remove_logo(
    pool: web::Data<PgPool>,
    storage: web::Data<LogoStorage>,
) -> Result<impl Responder, AppError> {
    let previous = settings::clear_logo_path(pool.get_ref()).await.map_err(|e| {
        tracing::error!("Failed to clear logo reference: {:?}", e);
        e
    })?;

    if let Some(reference) = previous.as_deref() {
        if storage.exists(reference) {
            storage.delete(reference);
        }
    }

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        message: "Logo removed successfully.".to_string(),
        data: None::<()>,
    }))
}

async fn parse_settings_form(
    payload: &mut Multipart,
) -> Result<(UpdateCompanySettings, Option<LogoUpload>), AppError> {
    let mut command = UpdateCompanySettings::default();
    let mut logo: Option<LogoUpload> = None;

    while let Some(mut field) = payload.try_next().await.map_err(|e| AppError {
        message: Some("Invalid form upload format".to_string()),
        cause: Some(e.to_string()),
        error_type: AppErrorType::PayloadValidationError,
    })? {
        let field_name = field
            .content_disposition()
            .get_name()
            .unwrap_or("")
            .to_string();

        match field_name.as_str() {
            "logo" => {
                let filename = field
                    .content_disposition()
                    .get_filename()
                    .ok_or_else(|| AppError {
                        message: Some("logo: filename is required".to_string()),
                        cause: None,
                        error_type: AppErrorType::PayloadValidationError,
                    })?
                    .to_string();

                let content_type = field
                    .content_type()
                    .map(|ct| ct.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                let mut bytes = Vec::new();
                while let Some(chunk) = field.try_next().await.map_err(|e| AppError {
                    message: Some("Failed to read logo data".to_string()),
                    cause: Some(e.to_string()),
                    error_type: AppErrorType::PayloadValidationError,
                })? {
                    bytes.extend_from_slice(&chunk);
                    if bytes.len() > MAX_LOGO_BYTES {
                        return Err(AppError {
                            message: Some("logo: must not exceed 2MB".to_string()),
                            cause: None,
                            error_type: AppErrorType::PayloadValidationError,
                        });
                    }
                }

                logo = Some(LogoUpload {
                    filename,
                    content_type,
                    bytes,
                });
            }
            name => {
                let text = read_text_field(&mut field, name).await?;
                match name {
                    "company_name" => command.company_name = non_empty(text),
                    "company_email" => command.company_email = non_empty(text),
                    "company_phone" => command.company_phone = non_empty(text),
                    "company_address" => command.company_address = non_empty(text),
                    "tax_id" => command.tax_id = non_empty(text),
                    "currency" => command.currency = text,
                    "currency_symbol" => command.currency_symbol = text,
                    "date_format" => command.date_format = text,
                    "timezone" => command.timezone = text,
                    "lock_before_date" => command.lock_before_date = parse_lock_date(&text)?,
                    // Unknown fields were drained above; nothing else to do.
                    _ => {}
                }
            }
        }
    }

    Ok((command, logo))
}

async fn read_text_field(field: &mut Field, name: &str) -> Result<String, AppError> {
    let mut data = Vec::new();
    while let Some(chunk) = field.try_next().await.map_err(|e| AppError {
        message: Some(format!("Failed to read {} field", name)),
        cause: Some(e.to_string()),
        error_type: AppErrorType::PayloadValidationError,
    })? {
        data.extend_from_slice(&chunk);
    }
    String::from_utf8(data).map_err(|e| AppError {
        message: Some(format!("Invalid {} encoding", name)),
        cause: Some(e.to_string()),
        error_type: AppErrorType::PayloadValidationError,
    })
}

fn parse_lock_date(text: &str) -> Result<Option<NaiveDate>, AppError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map(Some)
        .map_err(|e| AppError {
            message: Some("lock_before_date: must be a valid date (YYYY-MM-DD)".to_string()),
            cause: Some(e.to_string()),
            error_type: AppErrorType::PayloadValidationError,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use claim::{assert_err, assert_none, assert_ok, assert_some};

    #[test]
    fn lock_date_accepts_iso_dates() {
        let parsed = parse_lock_date("2024-07-01");
        assert_ok!(&parsed);
        assert_some!(parsed.unwrap());
    }

    #[test]
    fn lock_date_treats_blank_as_omitted() {
        assert_none!(parse_lock_date("").unwrap());
        assert_none!(parse_lock_date("   ").unwrap());
    }

    #[test]
    fn lock_date_rejects_garbage() {
        let parsed = parse_lock_date("01/07/2024");
        assert_err!(&parsed);
        let err = parsed.unwrap_err();
        assert!(err.message().contains("lock_before_date"));
    }
}
