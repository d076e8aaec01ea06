mod auth;
mod health;
mod portfolio;

pub use auth::auth_routes;
pub use health::health_routes;
pub use portfolio::portfolio_routes;
