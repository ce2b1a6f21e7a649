use std::io;

use signoff::configuration::Settings;
use signoff::startup::Application;
use signoff::telemetry::{get_subscriber, init_subscriber};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = get_subscriber("signoff".into(), "info".into(), io::stdout);
    init_subscriber(subscriber);

    // Retrieve settings
    let config = Settings::get_config().expect("Failed to load configuration");

    // Build the application and run it until it is stopped
    let application = Application::build(config)?;
    application.run_until_stopped().await?;

    Ok(())
}
