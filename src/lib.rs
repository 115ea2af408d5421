// Entity model and tag dispatch
pub mod model;

// Object registry and file-backed persistence
pub mod storage;

// HTTP API
pub mod api;

// Configuration
pub mod config;
