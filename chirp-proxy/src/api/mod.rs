//! HTTP API handlers for chirp-proxy

pub mod auth;
pub mod generation;
pub mod health;
pub mod prompts;
pub mod proxy;

pub use auth::BearerToken;
pub use generation::generation_routes;
pub use health::health_routes;
pub use prompts::prompt_routes;
pub use proxy::proxy_routes;
