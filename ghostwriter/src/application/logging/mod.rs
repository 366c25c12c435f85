pub mod cleanup;
pub mod tracing;
