use std::time::Duration;

use actix_web::{web, App, HttpServer};
use backend::config::db::DbProfile;
use backend::infra::state::build_state;
use backend::middleware::bearer_auth::BearerAuth;
use backend::middleware::cors::cors_middleware;
use backend::middleware::request_trace::RequestTrace;
use backend::middleware::structured_logger::StructuredLogger;
use backend::routes;
use backend::state::security_config::{
    SecurityConfig, DEFAULT_ACCESS_TTL, DEFAULT_REFRESH_TTL,
};
use backend::telemetry;

fn ttl_from_env(name: &str, default: Duration) -> Duration {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .map(Duration::from_secs)
        .unwrap_or(default)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    telemetry::init_tracing();

    // Environment variables must be set by the runtime environment:
    // - Docker: via env_file
    // - Local dev: source an env file manually (set -a; . ./.env; set +a)
    let host = std::env::var("BACKEND_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("BACKEND_PORT")
        .unwrap_or_else(|_| "3001".to_string())
        .parse::<u16>()
        .unwrap_or_else(|_| {
            eprintln!("BACKEND_PORT must be a valid port number");
            std::process::exit(1);
        });

    let jwt = match std::env::var("BACKEND_JWT_SECRET") {
        Ok(jwt) => jwt,
        Err(_) => {
            eprintln!("BACKEND_JWT_SECRET must be set");
            std::process::exit(1);
        }
    };
    let security_config = SecurityConfig::new(jwt.as_bytes()).with_ttls(
        ttl_from_env("ACCESS_TOKEN_TTL_SECS", DEFAULT_ACCESS_TTL),
        ttl_from_env("REFRESH_TOKEN_TTL_SECS", DEFAULT_REFRESH_TTL),
    );

    // Create application state using the unified builder
    let app_state = match build_state()
        .with_db(DbProfile::Prod)
        .with_security(security_config)
        .build()
        .await
    {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Failed to build application state: {e}");
            std::process::exit(1);
        }
    };

    println!("Starting auth backend on http://{host}:{port}");

    // Wrap AppState with web::Data before passing to HttpServer
    let data = web::Data::new(app_state);

    HttpServer::new(move || {
        App::new()
            .wrap(BearerAuth)
            .wrap(cors_middleware())
            .wrap(StructuredLogger)
            .wrap(RequestTrace)
            .app_data(data.clone())
            .configure(routes::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}
