mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn roles_resolve_through_the_ownership_chain() {
    let app = common::spawn_app().await;

    let expected = [
        (app.creator, "admin"),
        (app.editor, "editor"),
        (app.viewer, "viewer"),
        (app.superuser, "admin"),
    ];

    for (user, role) in expected {
        for uri in [
            format!("/api/access/project/{}", app.project),
            format!("/api/access/model/{}", app.model),
            format!("/api/access/entity/{}", app.entity),
        ] {
            let res = app.get_as(user, &uri).await;
            assert_eq!(res.status, StatusCode::OK, "{}", uri);
            assert_eq!(res.body["data"]["role"], role, "{}", uri);
            assert_eq!(res.body["data"]["project_id"], app.project.to_string());
        }
    }
}

#[tokio::test]
async fn report_lists_allowed_methods() {
    let app = common::spawn_app().await;

    let res = app.get_as(app.viewer, &format!("/api/access/entity/{}", app.entity)).await;
    assert_eq!(res.body["data"]["allowed_methods"], json!(["GET"]));

    let res = app.get_as(app.editor, &format!("/api/access/entity/{}", app.entity)).await;
    assert_eq!(res.body["data"]["allowed_methods"], json!(["GET", "POST", "PUT", "PATCH"]));
}

#[tokio::test]
async fn outsiders_and_missing_resources() {
    let app = common::spawn_app().await;

    let res = app.get_as(app.outsider, &format!("/api/access/model/{}", app.model)).await;
    assert_eq!(res.status, StatusCode::FORBIDDEN);

    let res = app.get_as(app.superuser, &format!("/api/access/entity/{}", Uuid::new_v4())).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.get_as(app.creator, &format!("/api/access/widget/{}", app.project)).await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);

    let res = app.get_as(app.creator, "/api/access/project/not-a-uuid").await;
    assert_eq!(res.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn concealment_makes_non_membership_look_missing() {
    let app = common::spawn_concealing_app().await;

    let hidden = app.get_as(app.outsider, &format!("/api/access/project/{}", app.project)).await;
    let missing = app.get_as(app.outsider, &format!("/api/access/project/{}", Uuid::new_v4())).await;

    assert_eq!(hidden.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert!(!hidden.message().contains(&app.project.to_string()));
}

#[tokio::test]
async fn membership_changes_apply_to_the_next_request() {
    let app = common::spawn_app().await;
    let uri = format!("/api/access/project/{}", app.project);

    app.store.set_member(app.project, app.viewer, datamodel_api::access::Role::Editor).await;
    assert_eq!(app.get_as(app.viewer, &uri).await.body["data"]["role"], "editor");

    app.store.remove_member(app.project, app.viewer).await;
    assert_eq!(app.get_as(app.viewer, &uri).await.status, StatusCode::FORBIDDEN);
}
