// src/main.rs
use actix_web::{App, HttpServer, middleware, web};
use anyhow::Context;
use log::info;

use freshscan::{AppState, config::AppConfig, configure_routes};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    info!("Starting freshscan service...");

    let config = AppConfig::from_env().context("invalid configuration")?;
    let bind_addr = config.bind_addr.clone();
    let max_upload_bytes = config.max_upload_bytes;

    let app_state = AppState::new(config).context("failed to initialize service state")?;

    info!(
        "Uploads go to {}, limit {} bytes",
        app_state.config.upload_dir.display(),
        max_upload_bytes
    );
    info!("Starting HTTP server on {}", bind_addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .wrap(middleware::Logger::default())
            .configure(configure_routes)
    })
    .bind(&bind_addr)
    .with_context(|| format!("failed to bind {}", bind_addr))?
    .run()
    .await?;

    Ok(())
}
