//! Library side of the defuse binary: argument surface, batch driver,
//! diagnostics reporter, and tracing setup.

pub mod args;
pub mod driver;
pub mod reporter;
pub mod tracing_config;
