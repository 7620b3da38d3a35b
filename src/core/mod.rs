//! Core application primitives (engines, orchestrators)

pub mod engine;
pub mod http;
pub mod scheduler;

pub use engine::*;
pub use http::*;
pub use scheduler::*;
