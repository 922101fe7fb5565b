pub mod events;
pub mod log_dirs;
pub mod state;
pub mod tracing_setup;
