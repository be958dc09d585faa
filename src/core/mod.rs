//! Configuration and request-scoped data types

pub mod config;
pub mod json_path;
pub mod models;
