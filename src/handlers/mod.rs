pub mod api_v1;

use std::sync::Arc;

use actix_web::{HttpResponse, web};

use crate::matrix::AliasScoring;
use crate::navigation::{NavSection, RouteNode};
use crate::store::RbacStore;

/// Shared by every worker through `web::Data`.
pub struct AppState {
    pub store: Arc<dyn RbacStore>,
    pub route_tree: RouteNode,
    pub nav_sections: Vec<NavSection>,
    pub alias_scoring: AliasScoring,
}

/// Mount `/health` and `/api/v1`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health))
        .service(web::scope("/api/v1").configure(api_v1::configure));
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
