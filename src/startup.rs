use std::net::TcpListener;
use std::sync::Arc;

use actix_session::storage::CookieSessionStore;
use actix_session::SessionMiddleware;
use actix_web::cookie::Key;
use actix_web::dev::Server;
use actix_web::web;
use actix_web::web::Data;
use actix_web::App;
use actix_web::HttpServer;
use actix_web_flash_messages::storage::CookieMessageStore;
use actix_web_flash_messages::FlashMessagesFramework;
use actix_web_lab::middleware::from_fn;
use anyhow::Context;
use secrecy::ExposeSecret;
use tracing_actix_web::TracingLogger;

use crate::authentication::reject_anonymous_users;
use crate::configuration::AdminSettings;
use crate::configuration::ApplicationSettings;
use crate::configuration::Settings;
use crate::configuration::StorageBackend;
use crate::configuration::StorageSettings;
use crate::getresponse::GetResponse;
use crate::hooks::RegistrationHooks;
use crate::routes::admin_dashboard;
use crate::routes::getresponse_settings_form;
use crate::routes::health_check;
use crate::routes::home;
use crate::routes::list_members;
use crate::routes::login;
use crate::routes::login_form;
use crate::routes::logout;
use crate::routes::member_details;
use crate::routes::registration_form;
use crate::routes::register;
use crate::routes::save_getresponse_settings;
use crate::rpc_client::JsonRpcClient;
use crate::store::FileStore;
use crate::store::MemberStore;
use crate::store::MemoryStore;
use crate::store::SettingsStore;

/// Wrapper for actix's `Server` with access to the bound port and the stores.
/// Not to be confused with actix's `App`!
pub struct Application {
    /// Left private; use `get_port` to access
    port: u16,
    server: Server,
    settings: Arc<dyn SettingsStore>,
    members: Arc<dyn MemberStore>,
}

impl Application {
    /// Bind the listener and wire every component together: stores, the
    /// JSON-RPC client, the GetResponse facade and the registration hooks.
    /// Nothing is global; everything reaches the handlers as `web::Data`.
    pub async fn build(cfg: Settings) -> Result<Self, anyhow::Error> {
        let addr = format!("{}:{}", cfg.application.host, cfg.application.port);
        let listener = TcpListener::bind(addr)?;
        // with port 0, the OS picks one
        let port = listener.local_addr()?.port();

        let (settings, members) = build_stores(&cfg.storage).await?;

        let rpc_client = JsonRpcClient::new(
            cfg.getresponse.base_url.clone(),
            cfg.getresponse.timeout(),
        )
        .context("Failed to build JSON-RPC client")?;
        let getresponse = GetResponse::new(Arc::new(rpc_client));

        let hooks = RegistrationHooks::new(
            getresponse.clone(),
            settings.clone(),
            members.clone(),
            cfg.registration.record_outcome_optimistically,
        );

        let server = run(
            listener,
            cfg.application,
            cfg.admin,
            settings.clone(),
            members.clone(),
            getresponse,
            hooks,
        )?;

        Ok(Self {
            port,
            server,
            settings,
            members,
        })
    }

    pub fn get_port(&self) -> u16 { self.port }

    pub fn settings_store(&self) -> Arc<dyn SettingsStore> { self.settings.clone() }

    pub fn member_store(&self) -> Arc<dyn MemberStore> { self.members.clone() }

    /// Because this consumes `self`, this should be the final function call (or
    /// passed to `tokio::spawn`)
    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> { self.server.await }
}

/// One backend serves as both stores
pub async fn build_stores(
    cfg: &StorageSettings
) -> Result<(Arc<dyn SettingsStore>, Arc<dyn MemberStore>), anyhow::Error> {
    match cfg.backend {
        StorageBackend::Memory => {
            let store = MemoryStore::new();
            let settings: Arc<dyn SettingsStore> = Arc::new(store.clone());
            let members: Arc<dyn MemberStore> = Arc::new(store);
            Ok((settings, members))
        }
        StorageBackend::File => {
            let store = Arc::new(
                FileStore::open(&cfg.path)
                    .await
                    .context("Failed to open store file")?,
            );
            let settings: Arc<dyn SettingsStore> = store.clone();
            let members: Arc<dyn MemberStore> = store;
            Ok((settings, members))
        }
    }
}

/// The server is not responsible for binding to an address, it only listens to
/// an already bound address.
///
/// Declares all endpoints.
pub fn run(
    listener: TcpListener,
    app_cfg: ApplicationSettings,
    admin: AdminSettings,
    settings: Arc<dyn SettingsStore>,
    members: Arc<dyn MemberStore>,
    getresponse: GetResponse,
    hooks: RegistrationHooks,
) -> Result<Server, anyhow::Error> {
    let secret_key = Key::try_from(app_cfg.hmac_secret.expose_secret().as_bytes())
        .context("hmac_secret must be at least 64 bytes long")?;

    // flash messages and the session both live in signed cookies; no server
    // side session storage
    let message_store = CookieMessageStore::builder(secret_key.clone()).build();
    let msg_framework = FlashMessagesFramework::builder(message_store).build();
    let secure_cookies = app_cfg.secure_cookies;

    // `Data` is an `Arc` on the outside; `Data::from` keeps the trait objects
    let settings = Data::from(settings);
    let members = Data::from(members);
    let getresponse = Data::new(getresponse);
    let hooks = Data::new(hooks);
    let admin = Data::new(admin);

    // the closure runs once per worker, hence the clones
    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .wrap(msg_framework.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                    .cookie_secure(secure_cookies)
                    .build(),
            )
            .route("/", web::get().to(home))
            .route("/health_check", web::get().to(health_check))
            .route("/login", web::get().to(login_form))
            .route("/login", web::post().to(login))
            .route("/register", web::get().to(registration_form))
            .route("/register", web::post().to(register))
            .service(
                web::scope("/admin")
                    .wrap(from_fn(reject_anonymous_users))
                    .route("/dashboard", web::get().to(admin_dashboard))
                    .route("/getresponse", web::get().to(getresponse_settings_form))
                    .route("/getresponse", web::post().to(save_getresponse_settings))
                    .route("/members", web::get().to(list_members))
                    .route("/members/{user_id}", web::get().to(member_details))
                    .route("/logout", web::post().to(logout)),
            )
            .app_data(settings.clone())
            .app_data(members.clone())
            .app_data(getresponse.clone())
            .app_data(hooks.clone())
            .app_data(admin.clone())
    })
    .listen(listener)?
    .run();

    Ok(server)
}
