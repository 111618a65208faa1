use neighbourly::{app::App, config, telemetry};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // telemetry
    let subscriber = telemetry::get_subscriber("neighbourly", "info", std::io::stdout);
    telemetry::init_subscriber(subscriber);

    // config
    let config = config::get().expect("Failed to read configuration");

    let app = App::build(&config).await?;
    tracing::info!("Server is running on {}", app.addr());

    app.run_until_stopped().await
}
