//! Application layer - Use cases and orchestration
//!
//! Contains the report pipeline and its building blocks, plus the port
//! definitions for the two capabilities it depends on (page fetching and
//! mail delivery). Adapters in the infrastructure layer implement the ports.

pub mod config;
pub mod error;
pub mod ports;
pub mod services;

pub use config::PipelineConfig;
pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
