use std::env::var;

use actix_files::Files;
use actix_web::{
    middleware::Logger,
    web::{self, Data},
    App, HttpServer,
};
use blog_services::{
    app_config, config_type::BlogAppConfig, middlewares::session_middleware::SessionMW,
    modules::home::handler::not_found, AppState,
};
use config_libs::libs_config;
use dotenv::dotenv;
use logger_libs::error_logger;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok(); // Load environment variables

    let config_path = var("BLOG_CONFIG").unwrap_or_else(|_| String::from("config/app"));
    let config: BlogAppConfig = match libs_config(&config_path, "BLOG") {
        Ok(config) => config,
        Err(error) => {
            eprintln!("error config: {:?}", error);
            std::process::exit(1);
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logger.log.as_str())).init();

    let app_state: Data<AppState> = match AppState::from_config(&config).await {
        Ok(state) => {
            log::info!("✅ Storage ready: {:?}", config.apps.storage);
            Data::new(state)
        }
        Err(error) => {
            error_logger("startup", "main", "app_state", &error);
            std::process::exit(1);
        }
    };

    let static_dir = config.apps.static_dir.clone();
    log::info!("starting blog on {}:{}", config.apps.address, config.apps.port);

    // Start server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .wrap(SessionMW)
            .wrap(Logger::default()) // add logging middleware
            .configure(app_config)
            .service(Files::new("/static", &static_dir))
            .default_service(web::to(not_found))
    })
    .bind((config.apps.address.as_str(), config.apps.port))?
    .run()
    .await
}
