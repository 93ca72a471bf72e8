#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod errors;
pub mod extractors;
pub mod infra;
pub mod logging;
pub mod middleware;
pub mod repos;
pub mod routes;
pub mod services;
pub mod state;
pub mod telemetry;
pub mod trace_ctx;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use auth::jwt::{extract_subject, mint_token, parse_token, Claims};
pub use auth::role::Role;
pub use error::AppError;
pub use extractors::auth_token::AuthToken;
pub use extractors::current_user::CurrentUser;
pub use infra::db::bootstrap_db;
pub use infra::state::build_state;
pub use middleware::bearer_auth::BearerAuth;
pub use middleware::cors::cors_middleware;
pub use middleware::request_trace::RequestTrace;
pub use middleware::structured_logger::StructuredLogger;
pub use services::tokens::IssuedTokens;
pub use state::app_state::AppState;
pub use state::security_config::SecurityConfig;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
