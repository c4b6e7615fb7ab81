//! Binary entry point: configuration, logging, seeding and the HTTP server.

use actix_web::{App, HttpServer, web};
use tracing::info;
use tracing_subscriber::EnvFilter;

use stockbook::inbound::http::{self, HealthState};
use stockbook::middleware::RequestId;
use stockbook::server::{self, AppConfig};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env().map_err(std::io::Error::other)?;
    let state = server::build_state(&config);

    state
        .sessions
        .seed_default_admin()
        .await
        .map_err(std::io::Error::other)?;

    let health = web::Data::new(HealthState::new());
    let app_state = web::Data::new(state);

    info!(bind_addr = %config.bind_addr, "starting http server");
    let server = HttpServer::new({
        let app_state = app_state.clone();
        let health = health.clone();
        move || {
            let app = App::new()
                .app_data(app_state.clone())
                .app_data(health.clone())
                .wrap(RequestId)
                .configure(http::configure_api)
                .configure(http::configure_health);
            #[cfg(debug_assertions)]
            let app = app.configure(http::configure_docs);
            app
        }
    })
    .bind(config.bind_addr)?
    .run();

    health.mark_ready();
    server.await
}
