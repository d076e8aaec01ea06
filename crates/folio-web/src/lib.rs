pub mod auth;
pub mod routes;
pub mod server;
pub mod state;

mod error;

pub use auth::{AdminSession, SessionStore};
pub use error::{Result, WebError};
pub use server::{router, start_server};
pub use state::AppState;
