use actix_web::{HttpResponse, web};

use crate::errors::AppError;
use crate::handlers::AppState;
use crate::matrix::PermissionMatrix;

/// GET /api/v1/permission-matrix - Catalog laid out along the sidebar
pub async fn show(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let catalog = state.store.list_permissions().await?;
    let matrix = PermissionMatrix::build(
        &state.route_tree,
        &state.nav_sections,
        &catalog,
        &state.alias_scoring,
    );
    Ok(HttpResponse::Ok().json(matrix))
}
