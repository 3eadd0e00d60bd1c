use serde_json::json;

use crate::helpers::assert_is_redirect_to;
use crate::helpers::spawn_app;

#[tokio::test]
async fn login_invalid() {
    let app = spawn_app().await;

    let resp = app
        .post_login(&json!({
            "username": "username",
            "password": "password",
        }))
        .await;
    assert_is_redirect_to(&resp, "/login");

    let html = app.get_login_html().await;
    assert!(html.contains("<p><i>Authentication failed</i></p>"));

    // flash messages are shown once
    let html = app.get_login_html().await;
    assert!(!html.contains("Authentication failed"));
}

#[tokio::test]
async fn wrong_password_for_the_right_user() {
    let app = spawn_app().await;

    let resp = app
        .post_login(&json!({
            "username": app.admin.username,
            "password": "not-the-password",
        }))
        .await;

    assert_is_redirect_to(&resp, "/login");
}

#[tokio::test]
async fn login_ok() {
    let app = spawn_app().await;

    app.login_as_admin().await;

    let html = app.get_admin_dashboard_html().await;
    assert!(html.contains(&format!("Welcome {}", app.admin.username)));
}

#[tokio::test]
async fn dashboard_without_login() {
    let app = spawn_app().await;
    let resp = app.get_admin_dashboard().await;
    assert_is_redirect_to(&resp, "/login");
}

#[tokio::test]
async fn logout_ends_the_admin_session() {
    let app = spawn_app().await;
    app.login_as_admin().await;

    let resp = app.post_logout().await;
    assert_is_redirect_to(&resp, "/login");

    let html = app.get_login_html().await;
    assert!(html.contains("<p><i>You have successfully logged out.</i></p>"));

    let resp = app.get_admin_dashboard().await;
    assert_is_redirect_to(&resp, "/login");
}

#[tokio::test]
async fn logout_requires_login() {
    let app = spawn_app().await;
    let resp = app.post_logout().await;
    assert_is_redirect_to(&resp, "/login");
}
