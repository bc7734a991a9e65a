pub mod commands;
pub mod error;
pub mod output;

pub use commands::{ConfigCommand, GenerateCommand, ProvidersCommand};
pub use error::{CliError, CliResult};
pub use output::{OutputFormat, mask_secret};
