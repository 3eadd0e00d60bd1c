use rcp_getresponse::configuration::get_configuration;
use rcp_getresponse::startup::Application;
use rcp_getresponse::telemetry::get_subscriber;
use rcp_getresponse::telemetry::init_subscriber;

/// Initialise telemetry, load config, and start the server
#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("rcp-getresponse", "info", std::io::stdout);
    init_subscriber(subscriber)?;

    let cfg = get_configuration()?;
    let application = Application::build(cfg).await?;
    tracing::info!(port = application.get_port(), "listening");
    application.run_until_stopped().await?;

    Ok(())
}
