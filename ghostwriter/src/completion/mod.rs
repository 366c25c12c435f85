pub mod context;
pub mod state;
pub mod types;
