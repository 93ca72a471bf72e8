use actix_web::{web, HttpResponse, Result};
use serde_json::json;

use crate::auth::role::Role;
use crate::error::AppError;
use crate::extractors::current_user::CurrentUser;

/// Admin-only endpoint
async fn admin_overview(auth: CurrentUser) -> Result<HttpResponse, AppError> {
    auth.require_any_role(&[Role::Admin])?;
    Ok(HttpResponse::Ok().json(json!({ "message": "admin area" })))
}

/// Reachable by managers and admins
async fn management_overview(auth: CurrentUser) -> Result<HttpResponse, AppError> {
    auth.require_any_role(&[Role::Admin, Role::Manager])?;
    Ok(HttpResponse::Ok().json(json!({ "message": "management area" })))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/api/v1/admin").route(web::get().to(admin_overview)))
        .service(web::resource("/api/v1/management").route(web::get().to(management_overview)));
}
