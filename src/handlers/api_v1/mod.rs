pub mod matrix;
pub mod permissions;
pub mod roles;

use actix_web::{
    Error, HttpResponse,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    http::Method,
    middleware::Next,
    web,
};

use crate::errors::ApiErrorResponse;

/// Reject POST/PUT/DELETE requests whose Content-Type is not JSON.
///
/// Browsers cannot send cross-origin JSON with cookies through a plain form, so
/// this doubles as CSRF protection. GET requests pass through.
async fn require_json_content_type(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let method = req.method().clone();

    if method == Method::POST || method == Method::PUT || method == Method::DELETE {
        let content_type = req
            .headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");

        if !content_type.starts_with("application/json") {
            let response = HttpResponse::BadRequest().json(ApiErrorResponse {
                error: "Content-Type must be application/json for mutation requests".to_string(),
                details: None,
            });
            return Ok(req.into_response(response).map_into_right_body());
        }
    }

    next.call(req).await.map(|res| res.map_into_left_body())
}

/// Configure API v1 routes.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/permissions")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(permissions::list))
            .route("/sync", web::post().to(permissions::sync)),
    );
    cfg.service(
        web::scope("/roles")
            .wrap(actix_web::middleware::from_fn(require_json_content_type))
            .route("", web::get().to(roles::list))
            .route("", web::post().to(roles::create))
            .route("/{id}", web::get().to(roles::read))
            .route("/{id}", web::put().to(roles::update))
            .route("/{id}", web::delete().to(roles::delete))
            .route("/{id}/permissions", web::put().to(roles::set_permissions)),
    );
    cfg.route("/permission-matrix", web::get().to(matrix::show));
}
