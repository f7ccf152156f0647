/// Integration tests for the `/api/v1` REST surface, run through the real
/// routing and middleware against an in-memory store.
///
/// Covers the permission sync lifecycle, role CRUD with its validation and
/// system-role guards, the replace-all permission endpoint and the matrix.
use actix_web::{App, http::StatusCode, test};
use serde_json::{Value, json};

use clinic_rbac::errors::ApiErrorResponse;
use clinic_rbac::handlers;
use clinic_rbac::matrix::PermissionMatrix;
use clinic_rbac::models::{Permission, Role};
use clinic_rbac::store::seed::{ADMIN_ROLE, seed_defaults};
use clinic_rbac::sync::SyncReport;

mod common;
use common::{empty_state, permission_id, seeded_state};

macro_rules! app {
    ($state:expr) => {
        test::init_service(App::new().app_data($state.clone()).configure(handlers::configure)).await
    };
}

// ---------------------------------------------------------------------------
// Health / permissions
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn test_health() {
    let state = empty_state();
    let app = app!(state);

    let body: Value = test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(body["status"], "ok");
}

#[actix_web::test]
async fn test_sync_is_idempotent() {
    let state = empty_state();
    let app = app!(state);

    let first: SyncReport = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/permissions/sync")
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert!(first.created > 0);
    assert_eq!(first.existing, 0);
    assert_eq!(first.total, first.created);

    let second: SyncReport = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/permissions/sync")
            .set_json(json!({}))
            .to_request(),
    )
    .await;
    assert_eq!(second.created, 0);
    assert_eq!(second.existing, first.created);
    assert_eq!(second.total, first.total);

    let permissions: Vec<Permission> = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/v1/permissions").to_request(),
    )
    .await;
    assert_eq!(permissions.len(), first.total);
    assert!(permissions.iter().any(|p| p.action == "delete" && p.subject == "Patient"));
}

#[actix_web::test]
async fn test_mutation_without_json_content_type_rejected() {
    let state = empty_state();
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/permissions/sync")
            .insert_header(("content-type", "application/x-www-form-urlencoded"))
            .set_payload("x=1")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ApiErrorResponse = test::read_body_json(resp).await;
    assert!(body.error.contains("application/json"));

    // Nothing was synced.
    assert!(state.store.list_permissions().await.expect("list").is_empty());
}

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn test_create_and_read_role() {
    let state = seeded_state().await;
    let read_patient = permission_id(state.store.as_ref(), "read", "Patient").await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/roles")
            .set_json(json!({
                "name": "recepcion",
                "description": "Front desk",
                "permissionIds": [read_patient, read_patient]
            }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Role = test::read_body_json(resp).await;
    assert_eq!(created.name, "recepcion");
    assert!(!created.is_system);
    assert_eq!(created.permission_ids().into_iter().collect::<Vec<_>>(), vec![read_patient]);

    let fetched: Role = test::call_and_read_body_json(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/roles/{}", created.id))
            .to_request(),
    )
    .await;
    assert_eq!(fetched, created);
}

#[actix_web::test]
async fn test_create_role_validation() {
    let state = seeded_state().await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/roles")
            .set_json(json!({ "name": "bad name!", "permissionIds": [999_999] }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ApiErrorResponse = test::read_body_json(resp).await;
    assert_eq!(body.error, "Validation failed");
    let details = body.details.expect("details");
    assert!(details.contains("999999"), "{details}");
}

#[actix_web::test]
async fn test_duplicate_role_name_conflicts() {
    let state = seeded_state().await;
    let app = app!(state);

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/roles")
                .set_json(json!({ "name": "medico" }))
                .to_request(),
        )
        .await;
        assert_eq!(resp.status(), expected);
    }
}

#[actix_web::test]
async fn test_read_missing_role_is_404() {
    let state = empty_state();
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/v1/roles/4242").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_set_permissions_replaces_whole_set() {
    let state = seeded_state().await;
    let store = state.store.as_ref();
    let read_patient = permission_id(store, "read", "Patient").await;
    let create_patient = permission_id(store, "create", "Patient").await;
    let read_user = permission_id(store, "read", "User").await;
    let app = app!(state);

    let created: Role = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/roles")
            .set_json(json!({ "name": "enfermeria", "permissionIds": [read_patient, read_user] }))
            .to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/roles/{}/permissions", created.id))
            .set_json(json!({ "permissionIds": [create_patient, read_patient] }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Role = test::read_body_json(resp).await;

    let mut expected = vec![read_patient, create_patient];
    expected.sort_unstable();
    assert_eq!(updated.permission_ids().into_iter().collect::<Vec<_>>(), expected);

    // Empty set revokes everything.
    let cleared: Role = test::call_and_read_body_json(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/roles/{}/permissions", created.id))
            .set_json(json!({ "permissionIds": [] }))
            .to_request(),
    )
    .await;
    assert!(cleared.permissions.is_empty());
}

#[actix_web::test]
async fn test_set_permissions_unknown_id_is_400() {
    let state = seeded_state().await;
    let app = app!(state);

    let created: Role = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/roles")
            .set_json(json!({ "name": "auditor" }))
            .to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/roles/{}/permissions", created.id))
            .set_json(json!({ "permissionIds": [-1] }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Role unchanged.
    let role = state.store.get_role(created.id).await.expect("role");
    assert!(role.permissions.is_empty());
}

#[actix_web::test]
async fn test_set_permissions_missing_role_is_404() {
    let state = seeded_state().await;
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/v1/roles/4242/permissions")
            .set_json(json!({ "permissionIds": [-1] }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_system_role_cannot_be_deleted_or_renamed() {
    let state = empty_state();
    seed_defaults(state.store.as_ref(), &state.route_tree)
        .await
        .expect("seed");
    let admin = state
        .store
        .find_role_by_name(ADMIN_ROLE)
        .await
        .expect("query")
        .expect("admin role");
    let app = app!(state);

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/roles/{}", admin.id))
            .insert_header(("content-type", "application/json"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/roles/{}", admin.id))
            .set_json(json!({ "name": "root" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // Description edits are allowed.
    let resp = test::call_service(
        &app,
        test::TestRequest::put()
            .uri(&format!("/api/v1/roles/{}", admin.id))
            .set_json(json!({ "name": ADMIN_ROLE, "description": "Todo" }))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_delete_role() {
    let state = seeded_state().await;
    let app = app!(state);

    let created: Role = test::call_and_read_body_json(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/roles")
            .set_json(json!({ "name": "temporal" }))
            .to_request(),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/v1/roles/{}", created.id))
            .insert_header(("content-type", "application/json"))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let roles: Vec<Role> = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/v1/roles").to_request(),
    )
    .await;
    assert!(roles.iter().all(|r| r.id != created.id));
}

// ---------------------------------------------------------------------------
// Matrix
// ---------------------------------------------------------------------------

#[actix_web::test]
async fn test_permission_matrix_endpoint() {
    let state = seeded_state().await;
    let total = state.store.list_permissions().await.expect("list").len();
    let app = app!(state);

    let matrix: PermissionMatrix = test::call_and_read_body_json(
        &app,
        test::TestRequest::get().uri("/api/v1/permission-matrix").to_request(),
    )
    .await;
    assert_eq!(matrix.permission_ids().len(), total);
    assert!(matrix.find_item("Pacientes").is_some());
    assert!(matrix.unmapped_subjects.contains(&"Backup".to_string()));
}
