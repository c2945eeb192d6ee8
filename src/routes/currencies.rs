use actix_web::{get, post, web, HttpResponse, Responder};
use sqlx::PgPool;
use tracing::instrument;

use crate::{
    core::{AppError, AppErrorType, AppSuccessResponse},
    db::currencies,
};

#[instrument(name = "Get Currencies", skip(pool))]
#[get("")]
pub async fn get_currencies(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let result = currencies::list_currencies(pool.get_ref()).await.map_err(|e| {
        tracing::error!("Failed to fetch currencies: {:?}", e);
        AppError {
            message: Some("Failed to fetch currencies".to_string()),
            cause: Some(e.to_string()),
            error_type: AppErrorType::InternalServerError,
        }
    })?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        message: "Currencies retrieved successfully".to_string(),
        data: Some(result),
    }))
}

#[instrument(name = "Set Base Currency", skip(pool), fields(code = %path))]
#[post("/{code}/base")]
pub async fn set_base_currency(
    pool: web::Data<PgPool>,
    path: web::Path<String>,
) -> Result<impl Responder, AppError> {
    let code = path.into_inner();

    let currency = currencies::set_base_currency(pool.get_ref(), &code).await?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        message: format!(
            "Base currency changed to {}. All amounts will now be displayed in {}.",
            currency.code, currency.code
        ),
        data: Some(currency),
    }))
}
