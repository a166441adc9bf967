//! Cross-cutting infrastructure shared by workforce services.

pub mod config;
pub mod password;
pub mod tracing;
