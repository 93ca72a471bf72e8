use actix_web::{web, HttpResponse};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use time::OffsetDateTime;

use crate::db::require_db;
use crate::error::AppError;
use crate::state::app_state::AppState;

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    app_version: String,
    db: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    db_error: Option<String>,
    time: String,
}

async fn health(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let app_version = env!("CARGO_PKG_VERSION").to_string();

    let now = OffsetDateTime::now_utc();
    let time = now
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| "unknown".to_string());

    // Check database connectivity with a lightweight query
    let (db_status, db_error) = match require_db(&app_state) {
        Ok(db) => match db
            .query_one(sea_orm::Statement::from_string(
                db.get_database_backend(),
                "SELECT 1 as health_check".to_string(),
            ))
            .await
        {
            Ok(_) => ("ok".to_string(), None),
            Err(e) => ("error".to_string(), Some(format!("DB query failed: {e}"))),
        },
        Err(e) => ("error".to_string(), Some(format!("DB unavailable: {e}"))),
    };

    let response = HealthResponse {
        status: "ok".to_string(),
        app_version,
        db: db_status,
        db_error,
        time,
    };

    Ok(HttpResponse::Ok().json(response))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(health)));
}
