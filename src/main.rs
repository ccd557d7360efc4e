use actix_web::{middleware::Logger, web, App, HttpServer};
use log::{error, info};
use std::io;
use std::path::Path;

use look::api::{download_image, list_images, upload_image};
use look::app_state::AppState;
use look::config::{log_config_path, AppConfig};

fn init_logging(config_file: &str) {
    if Path::new(config_file).exists() {
        match log4rs::init_file(config_file, Default::default()) {
            Ok(()) => return,
            Err(e) => eprintln!("Failed to load log config {}: {}", config_file, e),
        }
    }
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Logging first, so configuration loading is reported
    init_logging(&log_config_path());
    let config = AppConfig::load().map_err(|e| {
        error!("Failed to load configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidData, e)
    })?;

    let app_state = AppState::from_config(config.clone()).map_err(|e| {
        error!("Failed to prepare image storage at {}: {}", config.storage.base_path, e);
        e
    })?;
    let data = web::Data::new(app_state);

    info!("Starting server on {}:{}", config.server.host, config.server.port);

    HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .wrap(Logger::default())
            .service(list_images)
            .service(upload_image)
            .service(download_image)
    })
    .workers(config.server.workers)
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
