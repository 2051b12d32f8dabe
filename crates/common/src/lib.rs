//! Common utilities and shared types for the Puspresma portal backend.
//!
//! This crate provides foundational components used across all portal crates:
//!
//! - **Configuration**: Application settings via [`Config`], built once at
//!   startup and injected into every handler
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **Form validation**: Collect-all field validation via [`FormValidator`]
//!
//! # Example
//!
//! ```no_run
//! use puspresma_common::{AppResult, Config};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     println!("CMS at {}", config.cms.url);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod validation;

pub use config::{AuthConfig, CmsConfig, Config, EmailConfig, ServerConfig};
pub use error::{AppError, AppResult, FieldErrors};
pub use validation::FormValidator;
