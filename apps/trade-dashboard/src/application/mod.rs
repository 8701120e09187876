//! Application layer: ports, use cases and services.

pub mod ports;
pub mod services;
pub mod use_cases;
