use actix_web::{HttpResponse, web};

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::sync;

/// GET /api/v1/permissions - Full permission catalog
pub async fn list(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let permissions = state.store.list_permissions().await?;
    Ok(HttpResponse::Ok().json(permissions))
}

/// POST /api/v1/permissions/sync - Create permissions declared on routes
pub async fn sync(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let report = sync::sync_permissions(state.store.as_ref(), &state.route_tree).await?;
    Ok(HttpResponse::Ok().json(report))
}
