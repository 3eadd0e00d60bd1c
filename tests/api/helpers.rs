use std::sync::Arc;

use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::PasswordHasher;
use argon2::Version;
use once_cell::sync::Lazy;
use rcp_getresponse::configuration::get_configuration;
use rcp_getresponse::configuration::Settings;
use rcp_getresponse::configuration::StorageBackend;
use rcp_getresponse::startup::Application;
use rcp_getresponse::store::MemberStore;
use rcp_getresponse::store::SettingsStore;
use rcp_getresponse::telemetry::get_subscriber;
use rcp_getresponse::telemetry::init_subscriber;
use secrecy::Secret;
use serde_json::json;
use serde_json::Value;
use uuid::Uuid;
use wiremock::matchers;
use wiremock::Mock;
use wiremock::MockBuilder;
use wiremock::MockServer;
use wiremock::Request;
use wiremock::Respond;
use wiremock::ResponseTemplate;

/// Init the tracing subscriber once for the whole test binary.
///
/// To opt in to verbose logging, use the env var `TEST_LOG`:
///
/// ```sh
///      TEST_LOG=true cargo test [test_name] | bunyan
/// ```
static TRACING: Lazy<()> = Lazy::new(|| {
    // stdout and sink are different types, hence the two arms
    match std::env::var("TEST_LOG") {
        Ok(_) => {
            let subscriber = get_subscriber("test", "debug", std::io::stdout);
            init_subscriber(subscriber).unwrap();
        }
        Err(_) => {
            let subscriber = get_subscriber("test", "debug", std::io::sink);
            init_subscriber(subscriber).unwrap();
        }
    };
});

/// Answers a JSON-RPC call with the id it was sent, which is only known at
/// request time
pub struct JsonRpcResponder {
    result: Value,
    error: Value,
}

impl JsonRpcResponder {
    pub fn result(result: Value) -> Self {
        Self {
            result,
            error: Value::Null,
        }
    }

    pub fn error(message: &str) -> Self {
        Self {
            result: Value::Null,
            error: json!({ "message": message, "code": -1 }),
        }
    }
}

impl Respond for JsonRpcResponder {
    fn respond(
        &self,
        request: &Request,
    ) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap();
        ResponseTemplate::new(200).set_body_json(json!({
            "id": body["id"],
            "result": self.result,
            "error": self.error,
        }))
    }
}

/// Matches calls to one remote procedure
pub fn rpc_method(method: &str) -> MockBuilder {
    Mock::given(matchers::method("POST"))
        .and(matchers::path("/"))
        .and(matchers::body_partial_json(json!({ "method": method })))
}

pub struct TestAdmin {
    pub username: String,
    pub password: String,
}

impl TestAdmin {
    fn generate() -> Self {
        Self {
            username: "admin".to_string(),
            password: Uuid::new_v4().to_string(),
        }
    }

    /// PHC string for the configuration. Cheaper params than production, same
    /// algorithm.
    fn password_hash(&self) -> String {
        let salt = SaltString::generate(&mut rand::thread_rng());
        Argon2::new(
            Algorithm::Argon2id,
            Version::V0x13,
            Params::new(15000, 2, 1, None).unwrap(),
        )
        .hash_password(self.password.as_bytes(), &salt)
        .unwrap()
        .to_string()
    }
}

pub struct TestApp {
    pub addr: String,
    /// Stands in for `http://api2.getresponse.com`
    pub getresponse_server: MockServer,
    pub admin: TestAdmin,
    /// Keeps cookies (session, flash messages) between requests, and never
    /// follows redirects
    pub client: reqwest::Client,
    pub settings: Arc<dyn SettingsStore>,
    pub members: Arc<dyn MemberStore>,
}

impl TestApp {
    pub async fn get_health_check(&self) -> reqwest::Response {
        self.client
            .get(format!("{}/health_check", self.addr))
            .send()
            .await
            .expect("execute request")
    }

    pub async fn post_login<Body: serde::Serialize>(
        &self,
        body: &Body,
    ) -> reqwest::Response {
        self.client
            .post(format!("{}/login", self.addr))
            .form(body)
            .send()
            .await
            .expect("execute request")
    }

    pub async fn login_as_admin(&self) {
        let resp = self
            .post_login(&json!({
                "username": self.admin.username,
                "password": self.admin.password,
            }))
            .await;
        assert_is_redirect_to(&resp, "/admin/getresponse");
    }

    pub async fn get_login_html(&self) -> String {
        self.client
            .get(format!("{}/login", self.addr))
            .send()
            .await
            .expect("execute request")
            .text()
            .await
            .unwrap()
    }

    pub async fn post_logout(&self) -> reqwest::Response {
        self.client
            .post(format!("{}/admin/logout", self.addr))
            .send()
            .await
            .expect("execute request")
    }

    pub async fn get_admin_dashboard(&self) -> reqwest::Response {
        self.client
            .get(format!("{}/admin/dashboard", self.addr))
            .send()
            .await
            .expect("execute request")
    }

    pub async fn get_admin_dashboard_html(&self) -> String { self.get_admin_dashboard().await.text().await.unwrap() }

    pub async fn get_settings(&self) -> reqwest::Response {
        self.client
            .get(format!("{}/admin/getresponse", self.addr))
            .send()
            .await
            .expect("execute request")
    }

    pub async fn get_settings_html(&self) -> String { self.get_settings().await.text().await.unwrap() }

    pub async fn post_settings<Body: serde::Serialize>(
        &self,
        body: &Body,
    ) -> reqwest::Response {
        self.client
            .post(format!("{}/admin/getresponse", self.addr))
            .form(body)
            .send()
            .await
            .expect("execute request")
    }

    pub async fn get_register_html(&self) -> String {
        self.client
            .get(format!("{}/register", self.addr))
            .send()
            .await
            .expect("execute request")
            .text()
            .await
            .unwrap()
    }

    pub async fn post_register<Body: serde::Serialize>(
        &self,
        body: &Body,
    ) -> reqwest::Response {
        self.client
            .post(format!("{}/register", self.addr))
            .form(body)
            .send()
            .await
            .expect("execute request")
    }

    pub async fn get_members(&self) -> reqwest::Response {
        self.client
            .get(format!("{}/admin/members", self.addr))
            .send()
            .await
            .expect("execute request")
    }

    pub async fn get_member(
        &self,
        user_id: &str,
    ) -> reqwest::Response {
        self.client
            .get(format!("{}/admin/members/{user_id}", self.addr))
            .send()
            .await
            .expect("execute request")
    }

    /// Configure the integration directly in the store, bypassing the admin
    /// pages
    pub async fn configure_integration(
        &self,
        saved_list: &str,
    ) {
        self.settings
            .save(rcp_getresponse::domain::IntegrationSettings {
                api_key: "my-api-key".to_string(),
                saved_list: Some(saved_list.to_string()),
                signup_label: String::new(),
            })
            .await
            .unwrap();
    }

    /// The `params` of every `add_contact` call received so far
    pub async fn add_contact_calls(&self) -> Vec<Value> {
        self.getresponse_server
            .received_requests()
            .await
            .unwrap()
            .iter()
            .map(|r| serde_json::from_slice::<Value>(&r.body).unwrap())
            .filter(|body| body["method"] == "add_contact")
            .map(|body| body["params"].clone())
            .collect()
    }
}

pub async fn spawn_app() -> TestApp { spawn_app_with(|_| {}).await }

/// Spawn the app on a random port, against a fresh mock GetResponse and an
/// empty memory store. `customise` may adjust the configuration before the
/// app is built.
pub async fn spawn_app_with(customise: impl FnOnce(&mut Settings)) -> TestApp {
    Lazy::force(&TRACING);

    let getresponse_server = MockServer::start().await;
    let admin = TestAdmin::generate();

    let cfg = {
        let mut cfg = get_configuration().expect("read configuration");
        // port 0: the OS picks a free port, retrieved below with `get_port`
        cfg.application.port = 0;
        cfg.getresponse.base_url = getresponse_server.uri();
        cfg.getresponse.timeout_milliseconds = 2000;
        cfg.storage.backend = StorageBackend::Memory;
        cfg.admin.username = admin.username.clone();
        cfg.admin.password_hash = Secret::new(admin.password_hash());
        customise(&mut cfg);
        cfg
    };

    let app = Application::build(cfg).await.expect("build application");
    let port = app.get_port();
    let addr = format!("http://127.0.0.1:{port}");
    let settings = app.settings_store();
    let members = app.member_store();
    tokio::spawn(app.run_until_stopped());

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .cookie_store(true)
        .build()
        .unwrap();

    TestApp {
        addr,
        getresponse_server,
        admin,
        client,
        settings,
        members,
    }
}

pub fn assert_is_redirect_to(
    resp: &reqwest::Response,
    location: &str,
) {
    assert_eq!(resp.status().as_u16(), 303);
    assert_eq!(resp.headers().get("Location").unwrap(), location);
}
