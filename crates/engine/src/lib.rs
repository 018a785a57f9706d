//! PromptPlay Engine library.
//!
//! Resolves a child's tag picks or free text into a playable scene script.
//!
//! ## Structure
//!
//! - `use_cases/` - Tiered scene resolution, variations, request sequencing
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP entry points
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
