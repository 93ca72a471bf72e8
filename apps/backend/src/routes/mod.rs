use actix_web::web;

pub mod admin;
pub mod auth;
pub mod health;
pub mod private;

/// Configure application routes for main and the test harness.
///
/// In production, `main.rs` wires these behind the full middleware stack
/// (trace id, structured logging, CORS, bearer authentication). Tests
/// register the same paths with only the bearer-auth middleware so the
/// endpoint behavior can be exercised directly.
pub fn configure(cfg: &mut web::ServiceConfig) {
    // Health check: /health
    cfg.configure(health::configure_routes);

    // Public auth endpoints: /api/v1/auth/**
    cfg.service(web::scope("/api/v1/auth").configure(auth::configure_routes));

    // Protected endpoints: /api/v1/**
    cfg.configure(private::configure_routes);
    cfg.configure(admin::configure_routes);
}
