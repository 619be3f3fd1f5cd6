use qrlink_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize the application (telemetry, storage, routes)
    let (state, router) = qrlink_api::setup::initialize_app(config.clone()).await?;

    // Start the server
    qrlink_api::setup::server::start_server(&config, router).await?;

    state.storage.teardown().await;

    Ok(())
}
