pub mod app;
pub mod config;
pub mod render;

pub use app::{persist, run, CliError, RunOutcome};
pub use config::{Backend, CliConfig, OutputFormat};
