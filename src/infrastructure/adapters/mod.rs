pub mod browser_session;
pub mod simulated_gateway;

pub use browser_session::BrowserSession;
pub use simulated_gateway::SimulatedGateway;
