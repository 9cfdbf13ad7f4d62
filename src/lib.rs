// src/lib.rs

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod routes;
pub mod source;
pub mod state;
pub mod utils;

// Re-export specific items for convenience if needed
pub use error::PipelineError;
pub use pipeline::Pipeline;
pub use routes::create_router;
