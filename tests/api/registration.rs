use rcp_getresponse::hooks::SUBSCRIBED_META_KEY;
use rcp_getresponse::store::Member;
use serde_json::json;
use serde_json::Value;
use wiremock::ResponseTemplate;

use crate::helpers::assert_is_redirect_to;
use crate::helpers::rpc_method;
use crate::helpers::spawn_app;
use crate::helpers::spawn_app_with;
use crate::helpers::JsonRpcResponder;
use crate::helpers::TestApp;

fn registration(signup: bool) -> Value {
    let mut body = json!({
        "rcp_user_email": "ursula_le_guin@gmail.com",
        "rcp_user_first": "Ursula",
        "rcp_user_last": "Le Guin",
    });
    if signup {
        body["rcp_getresponse_signup"] = json!("on");
    }
    body
}

async fn only_member(app: &TestApp) -> Member {
    let mut members = app.members.list_members().await.unwrap();
    assert_eq!(members.len(), 1);
    members.remove(0)
}

async fn subscribed_flag(
    app: &TestApp,
    member: &Member,
) -> Option<String> {
    app.members
        .get_meta(member.user_id, SUBSCRIBED_META_KEY)
        .await
        .unwrap()
}

#[tokio::test]
async fn no_signup_field_until_configured() {
    let app = spawn_app().await;

    let html = app.get_register_html().await;
    assert!(!html.contains("rcp_getresponse_signup"));

    app.configure_integration("pqRt").await;
    let html = app.get_register_html().await;
    assert!(html.contains(
        r#"<input id="rcp_getresponse_signup" name="rcp_getresponse_signup" type="checkbox" checked="checked" />"#
    ));
    assert!(html.contains(r#"<label for="rcp_getresponse_signup">Signup for Newsletter</label>"#));
}

#[tokio::test]
async fn ticked_box_adds_the_contact() {
    let app = spawn_app().await;
    app.configure_integration("pqRt").await;

    rpc_method("add_contact")
        .respond_with(JsonRpcResponder::result(json!({ "queued": 1 })))
        .expect(1)
        .mount(&app.getresponse_server)
        .await;

    let resp = app.post_register(&registration(true)).await;
    assert_is_redirect_to(&resp, "/register");

    let calls = app.add_contact_calls().await;
    assert_eq!(
        calls[0],
        json!([
            "my-api-key",
            {
                "campaign": "pqRt",
                "name": "Ursula Le Guin",
                "email": "ursula_le_guin@gmail.com",
                "ip": "127.0.0.1",
                "cycle_day": 0,
            }
        ])
    );

    let member = only_member(&app).await;
    assert_eq!(subscribed_flag(&app, &member).await.as_deref(), Some("yes"));

    let html = app.get_register_html().await;
    assert!(html.contains("Thank you for registering!"));
}

#[tokio::test]
async fn unticked_box_registers_without_subscribing() {
    let app = spawn_app().await;
    app.configure_integration("pqRt").await;

    rpc_method("add_contact")
        .respond_with(JsonRpcResponder::result(json!(true)))
        .expect(0)
        .mount(&app.getresponse_server)
        .await;

    let resp = app.post_register(&registration(false)).await;
    assert_is_redirect_to(&resp, "/register");

    let member = only_member(&app).await;
    assert_eq!(member.email.as_ref(), "ursula_le_guin@gmail.com");
    assert_eq!(subscribed_flag(&app, &member).await, None);
}

#[tokio::test]
async fn invalid_email_is_rejected() {
    let app = spawn_app().await;
    app.configure_integration("pqRt").await;

    rpc_method("add_contact")
        .respond_with(JsonRpcResponder::result(json!(true)))
        .expect(0)
        .mount(&app.getresponse_server)
        .await;

    let test_cases = [
        ("", "empty email"),
        ("definitely-not-an-email", "invalid email"),
    ];
    for (email, description) in test_cases {
        let mut body = registration(true);
        body["rcp_user_email"] = json!(email);

        let resp = app.post_register(&body).await;

        assert_eq!(
            resp.status().as_u16(),
            400,
            "did not return 400 for {description}"
        );
    }
    assert!(app.members.list_members().await.unwrap().is_empty());
}

#[tokio::test]
async fn names_are_sanitized() {
    let app = spawn_app().await;
    app.configure_integration("pqRt").await;

    rpc_method("add_contact")
        .respond_with(JsonRpcResponder::result(json!(true)))
        .expect(1)
        .mount(&app.getresponse_server)
        .await;

    let mut body = registration(true);
    body["rcp_user_first"] = json!("  <b>Ursula</b>\n");
    body["rcp_user_last"] = json!("");
    app.post_register(&body).await;

    let calls = app.add_contact_calls().await;
    assert_eq!(calls[0][1]["name"], json!("Ursula "));
    assert_eq!(only_member(&app).await.first_name, "Ursula");
}

#[tokio::test]
async fn failed_subscription_is_invisible_to_the_registrant() {
    let app = spawn_app().await;
    app.configure_integration("pqRt").await;

    rpc_method("add_contact")
        .respond_with(JsonRpcResponder::error("Contact already queued"))
        .expect(1)
        .mount(&app.getresponse_server)
        .await;

    let resp = app.post_register(&registration(true)).await;
    assert_is_redirect_to(&resp, "/register");

    // recorded optimistically by default
    let member = only_member(&app).await;
    assert_eq!(subscribed_flag(&app, &member).await.as_deref(), Some("yes"));
}

#[tokio::test]
async fn accurate_flag_is_not_set_on_failure() {
    let app = spawn_app_with(|cfg| cfg.registration.record_outcome_optimistically = false).await;
    app.configure_integration("pqRt").await;

    rpc_method("add_contact")
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.getresponse_server)
        .await;

    let resp = app.post_register(&registration(true)).await;
    assert_is_redirect_to(&resp, "/register");

    let member = only_member(&app).await;
    assert_eq!(subscribed_flag(&app, &member).await, None);
}

#[tokio::test]
async fn accurate_flag_is_set_on_success() {
    let app = spawn_app_with(|cfg| cfg.registration.record_outcome_optimistically = false).await;
    app.configure_integration("pqRt").await;

    rpc_method("add_contact")
        .respond_with(JsonRpcResponder::result(json!({ "queued": 1 })))
        .expect(1)
        .mount(&app.getresponse_server)
        .await;

    app.post_register(&registration(true)).await;

    let member = only_member(&app).await;
    assert_eq!(subscribed_flag(&app, &member).await.as_deref(), Some("yes"));
}

#[tokio::test]
async fn unconfigured_integration_never_calls_getresponse() {
    let app = spawn_app().await;

    rpc_method("add_contact")
        .respond_with(JsonRpcResponder::result(json!(true)))
        .expect(0)
        .mount(&app.getresponse_server)
        .await;

    // the box can't be shown, but a hand-crafted submission may still carry it
    let resp = app.post_register(&registration(true)).await;
    assert_is_redirect_to(&resp, "/register");
    only_member(&app).await;
}

#[tokio::test]
async fn logged_in_member_is_subscribed_with_stored_email() {
    let app = spawn_app().await;
    app.configure_integration("pqRt").await;

    rpc_method("add_contact")
        .respond_with(JsonRpcResponder::result(json!(true)))
        .expect(1)
        .mount(&app.getresponse_server)
        .await;

    // first visit: registers, no newsletter
    app.post_register(&registration(false)).await;

    // second visit, same browser: opts in, with another address in the form
    let mut body = registration(true);
    body["rcp_user_email"] = json!("someone_else@example.com");
    let resp = app.post_register(&body).await;
    assert_is_redirect_to(&resp, "/register");

    let calls = app.add_contact_calls().await;
    assert_eq!(calls[0][1]["email"], json!("ursula_le_guin@gmail.com"));

    let member = only_member(&app).await;
    assert_eq!(subscribed_flag(&app, &member).await.as_deref(), Some("yes"));
}

#[tokio::test]
async fn repeated_signups_are_not_deduplicated() {
    let app = spawn_app().await;
    app.configure_integration("pqRt").await;

    rpc_method("add_contact")
        .respond_with(JsonRpcResponder::result(json!(true)))
        .expect(2)
        .mount(&app.getresponse_server)
        .await;

    app.post_register(&registration(true)).await;
    app.post_register(&registration(true)).await;

    let calls = app.add_contact_calls().await;
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], calls[1]);
}
