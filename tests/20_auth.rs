mod common;

use axum::http::{Method, StatusCode};
use datamodel_api::auth::{generate_jwt, Claims, UserMetadata};
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn whoami_requires_a_token() {
    let app = common::spawn_app().await;
    let res = app.request(Method::GET, "/api/auth/whoami", None, None).await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.body["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn whoami_reflects_the_token() {
    let app = common::spawn_app().await;

    let res = app.get_as(app.editor, "/api/auth/whoami").await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.body["data"]["id"], app.editor.to_string());
    assert_eq!(res.body["data"]["is_superuser"], false);

    let res = app.get_as(app.superuser, "/api/auth/whoami").await;
    assert_eq!(res.body["data"]["is_superuser"], true);
}

#[tokio::test]
async fn string_superuser_flag_is_honoured() {
    let app = common::spawn_app().await;
    let user = Uuid::new_v4();

    let mut claims = Claims::new(user, Some("ops@example.com".into()), false, 1);
    claims.user_metadata = UserMetadata { is_superuser: Some(json!("true")) };
    let token = generate_jwt(&claims, common::SECRET).unwrap();

    let res = app.request(Method::GET, "/api/auth/whoami", Some(&token), None).await;
    assert_eq!(res.body["data"]["is_superuser"], true);
    assert_eq!(res.body["data"]["email"], "ops@example.com");

    // and the flag carries through to resolution
    let res = app
        .request(Method::GET, &format!("/api/access/project/{}", app.project), Some(&token), None)
        .await;
    assert_eq!(res.body["data"]["role"], "admin");
}

#[tokio::test]
async fn invalid_tokens_are_rejected_before_the_gate() {
    let app = common::spawn_app().await;
    let uri = format!("/api/projects/{}", app.project);

    let foreign = generate_jwt(&Claims::new(app.creator, None, false, 1), "some-other-secret").unwrap();
    for token in ["not-a-jwt", foreign.as_str()] {
        let res = app.request(Method::GET, &uri, Some(token), None).await;
        assert_eq!(res.status, StatusCode::UNAUTHORIZED, "{}", token);
    }
}

#[tokio::test]
async fn anonymous_requests_reach_the_gate_as_unauthenticated() {
    let app = common::spawn_app().await;
    let res = app
        .request(Method::GET, &format!("/api/entities/{}", app.entity), None, None)
        .await;

    assert_eq!(res.status, StatusCode::UNAUTHORIZED);
    assert_eq!(res.message(), "Authentication required");
}
