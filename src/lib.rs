pub mod configuration;
pub mod provider;
pub mod root_path;
pub mod routes;
pub mod session;
pub mod settings_store;
pub mod startup;
pub mod telemetry;
pub mod utils;
