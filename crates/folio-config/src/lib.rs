//! # Folio Configuration
//!
//! Typed configuration for the folio server and CLI. Values come from a TOML
//! file, then `FOLIO_*` environment variables, then command-line flags.
//!
//! ```rust,no_run
//! use folio_config::ConfigLoader;
//!
//! let config = ConfigLoader::new().load()?;
//! println!("listening on {}", config.server.bind_address());
//! # Ok::<(), folio_config::ConfigError>(())
//! ```

mod components;
mod config;
mod loader;

pub use components::*;
pub use config::*;
pub use loader::*;
