use actix_web::{middleware as actix_middleware, web, App, HttpServer};
use std::sync::Arc;
use std::time::Duration;
use tokio::time;

use eventboard::auth::AdminCredential;
use eventboard::config::AppConfig;
use eventboard::db::{EventRepository, MemoryEventRepository};
use eventboard::handlers;
use eventboard::session::{SessionStore, SESSION_TTL_HOURS};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if it exists (for development)
    // Try loading from current directory first, then from server/ directory
    if dotenvy::dotenv().is_err() {
        dotenvy::from_filename("server/.env").ok();
    }

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    log::info!("Starting event board server...");

    let config_path = std::env::var("CONFIG_PATH")
        .unwrap_or_else(|_| "server/config/eventboard.toml".to_string());
    let config = AppConfig::load(&config_path)?;

    if config.uses_default_password() {
        log::warn!("ADMIN_PASSWORD is not set; falling back to the default admin password");
    }

    let admin = AdminCredential::new(config.admin_password());
    let sessions = SessionStore::new();
    let events: Arc<dyn EventRepository> = Arc::new(MemoryEventRepository::new());

    log::info!(
        "Sessions expire after {} hours (sweep every {}s)",
        SESSION_TTL_HOURS,
        config.session_sweep_secs
    );

    // Expired sessions are already rejected on read; this only reclaims memory
    let sessions_clone = sessions.clone();
    let sweep_every = Duration::from_secs(config.session_sweep_secs);
    tokio::spawn(async move {
        let mut interval = time::interval(sweep_every);
        loop {
            interval.tick().await;
            let removed = sessions_clone.cleanup_expired();
            if removed > 0 {
                log::info!("Background cleanup: removed {} expired sessions", removed);
            }
        }
    });

    log::info!("Starting HTTP server at {}:{}...", config.host, config.port);

    let events_data: web::Data<dyn EventRepository> = web::Data::from(events);

    HttpServer::new(move || {
        App::new()
            // Shared state
            .app_data(web::Data::new(sessions.clone()))
            .app_data(web::Data::new(admin.clone()))
            .app_data(events_data.clone())
            // Middleware
            .wrap(actix_middleware::Logger::default())
            .wrap(actix_middleware::Compress::default())
            .configure(handlers::configure)
            .default_service(web::to(handlers::not_found))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await?;

    Ok(())
}
