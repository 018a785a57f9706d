//! Infrastructure - external dependency implementations (ports + adapters).

pub mod clock;
pub mod library;
pub mod ollama;
pub mod ports;
pub mod settings;
