use actix_web::{get, web, HttpResponse, Responder};
use sqlx::PgPool;
use tracing::instrument;

use crate::{
    core::{AppError, AppErrorType, AppSuccessResponse},
    db::accounts,
};

#[instrument(name = "Get Chart of Accounts", skip(pool))]
#[get("")]
pub async fn get_chart_of_accounts(pool: web::Data<PgPool>) -> Result<impl Responder, AppError> {
    let result = accounts::fetch_accounts(pool.get_ref()).await.map_err(|e| {
        tracing::error!("Failed to fetch chart of accounts: {:?}", e);
        AppError {
            message: Some("Failed to fetch chart of accounts".to_string()),
            cause: Some(e.to_string()),
            error_type: AppErrorType::InternalServerError,
        }
    })?;

    Ok(HttpResponse::Ok().json(AppSuccessResponse {
        success: true,
        message: "Chart of accounts retrieved successfully".to_string(),
        data: Some(result),
    }))
}
