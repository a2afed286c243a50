pub mod adapters;
pub mod config;

pub use adapters::{BrowserSession, SimulatedGateway};
pub use config::AppConfig;
