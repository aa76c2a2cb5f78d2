// src/api/mod.rs
// Typed client for the tracker REST API

pub mod notifications;
pub mod pipeline;
pub mod predictions;
pub mod profile;
pub mod students;
pub mod types;

pub use pipeline::{ApiClient, NavigationLog, Navigator};
pub use types::{ApiResponse, Timestamp};
