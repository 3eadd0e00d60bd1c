use crate::helpers::spawn_app;

#[tokio::test]
async fn health_check() {
    let app = spawn_app().await;

    let resp = app.get_health_check().await;

    assert!(resp.status().is_success());
    assert_eq!(resp.content_length(), Some(0));
}

#[tokio::test]
async fn health_check_never_calls_getresponse() {
    let app = spawn_app().await;

    app.get_health_check().await;

    assert!(app
        .getresponse_server
        .received_requests()
        .await
        .unwrap()
        .is_empty());
}
