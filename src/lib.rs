//! Travel planner - AI powered travel assistance
//!
//! This library provides the web surface, session handling, and prompt
//! construction for a travel planning page whose recommendations come from
//! the Gemini text-generation API.

pub mod api;
pub mod config;
pub mod error;
pub mod generate;
pub mod query;
pub mod session;
pub mod web;

// Re-export core types for public API
pub use api::{AppState, BootstrapResponse, PlanRequest, PlanResponse};
pub use config::{GeminiConfig, LoggingConfig, PlannerConfig, ServerConfig};
pub use error::PlannerError;
pub use generate::{GeminiClient, Generator};
pub use query::{Language, SortBy, TravelMode, TravelPreference, TravelQuery};
pub use session::{SessionFields, SessionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, PlannerError>;
