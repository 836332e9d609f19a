//! End-to-end flow through the assembled router: sign-in, gated pages, cards.

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use campaign_api::ApiServer;
use campaign_core::config::AppConfig;
use campaign_management::CampaignStore;
use std::sync::Arc;
use tower::ServiceExt;

fn app() -> Router {
    let server = ApiServer::new(AppConfig::default(), Arc::new(CampaignStore::new())).unwrap();
    server.router().unwrap()
}

async fn get(app: &Router, path: &str, cookie: Option<&str>) -> Response {
    let mut req = Request::builder().uri(path);
    if let Some(cookie) = cookie {
        req = req.header(header::COOKIE, cookie);
    }
    app.clone().oneshot(req.body(Body::empty()).unwrap()).await.unwrap()
}

async fn body_text(res: Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Sign in and return the `name=value` part of the session cookie.
async fn sign_in(app: &Router) -> String {
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/sign-in")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"username":"ana","password":"campaign2024"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let set_cookie = res.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    assert!(set_cookie.contains("HttpOnly"));

    let json: serde_json::Value = serde_json::from_str(&body_text(res).await).unwrap();
    assert_eq!(json["user"], "ana");

    set_cookie.split(';').next().unwrap().to_string()
}

fn location(res: &Response) -> &str {
    res.headers()[header::LOCATION].to_str().unwrap()
}

#[tokio::test]
async fn anonymous_user_is_sent_to_sign_in() {
    let app = app();
    for path in ["/dashboard", "/dashboard/settings", "/profile", "/campaigns/create"] {
        let res = get(&app, path, None).await;
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(location(&res), "/sign-in");
    }

    let res = get(&app, "/sign-in", None).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn signed_in_user_reaches_dashboard_and_skips_auth_pages() {
    let app = app();
    let cookie = sign_in(&app).await;

    let res = get(&app, "/dashboard", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_text(res).await;
    assert!(html.contains("Bs. 15,000 de 50,000"));
    assert!(html.contains(r#"href="/dashboard/campaigns/amboro-reforestacion""#));

    for path in ["/sign-in", "/sign-up"] {
        let res = get(&app, path, Some(&cookie)).await;
        assert_eq!(res.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(location(&res), "/dashboard");
    }

    let res = get(&app, "/profile", Some(&cookie)).await;
    assert!(body_text(res).await.contains("<p>ana</p>"));

    // Protected and signed in: passes the gate, the page itself does not exist
    let res = get(&app, "/profile/edit", Some(&cookie)).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn public_campaign_page_ignores_session_state() {
    let app = app();
    let cookie = sign_in(&app).await;

    for cookie in [None, Some(cookie.as_str())] {
        let res = get(&app, "/campaigns/amboro-reforestacion", cookie).await;
        assert_eq!(res.status(), StatusCode::OK);
        let html = body_text(res).await;
        assert!(html.contains("/icons/verified.svg"));
        assert!(html.contains("Activa"));
    }

    let res = get(&app, "/campaigns/123", None).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sign_out_revokes_session() {
    let app = app();
    let cookie = sign_in(&app).await;

    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/sign-out")
                .header(header::COOKIE, &cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert!(res.headers()[header::SET_COOKIE].to_str().unwrap().contains("Max-Age=0"));

    let res = get(&app, "/dashboard", Some(&cookie)).await;
    assert_eq!(location(&res), "/sign-in");
}

#[tokio::test]
async fn bad_credentials_are_rejected() {
    let app = app();
    let res = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/auth/sign-in")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"username":"ana","password":"nope"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().get(header::SET_COOKIE).is_none());
}

#[tokio::test]
async fn campaign_api() {
    let app = app();

    let res = get(&app, "/api/v1/campaigns/biblioteca-sucre/card", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let card: serde_json::Value = serde_json::from_str(&body_text(res).await).unwrap();
    assert_eq!(card["statusLabel"], "Finalizada");
    assert_eq!(card["progressWidth"], "102%");
    assert_eq!(card["imageSrc"], "/amboro-main.jpg");
    assert_eq!(card["showVerified"], false);

    let create = |cookie: Option<String>| {
        let mut req = Request::builder()
            .method("POST")
            .uri("/api/v1/campaigns")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            req = req.header(header::COOKIE, cookie);
        }
        req.body(Body::from(
            r#"{"title":"Comedor","category":"Social","location":"El Alto","goalAmount":10000}"#,
        ))
        .unwrap()
    };

    let res = app.clone().oneshot(create(None)).await.unwrap();
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let cookie = sign_in(&app).await;
    let res = app.clone().oneshot(create(Some(cookie))).await.unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: serde_json::Value = serde_json::from_str(&body_text(res).await).unwrap();
    assert_eq!(created["status"], "draft");

    let id = created["id"].as_str().unwrap();
    let res = get(&app, &format!("/api/v1/campaigns/{id}"), None).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[test]
fn unusable_session_ttl_fails_startup() {
    for hours in [0, -1, 1_000_000_000_000, i64::MAX] {
        let mut config = AppConfig::default();
        config.auth.session_ttl_hours = hours;
        assert!(config.validate().is_err(), "{hours}");
        assert!(ApiServer::new(config, Arc::new(CampaignStore::new())).is_err(), "{hours}");
    }
}

#[tokio::test]
async fn sign_up_page_points_to_sign_in() {
    let app = app();
    let res = get(&app, "/sign-up", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let html = body_text(res).await;
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains(r#"href="/sign-in""#));
    assert!(!html.contains("<form"));
    assert!(!html.contains("/api/v1/auth/sign-in"));
}

#[tokio::test]
async fn health_probes() {
    let app = app();
    let res = get(&app, "/health", None).await;
    assert_eq!(res.status(), StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body_text(res).await).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["campaigns"], 5);

    assert_eq!(get(&app, "/live", None).await.status(), StatusCode::OK);
    assert_eq!(get(&app, "/ready", None).await.status(), StatusCode::OK);
}
