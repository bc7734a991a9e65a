pub mod config;
pub mod generate;
pub mod providers;

pub use config::ConfigCommand;
pub use generate::GenerateCommand;
pub use providers::ProvidersCommand;
