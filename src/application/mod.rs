pub mod dto;
pub mod payment_flow;
pub mod ui_loop;

pub use dto::{ClientMessage, ErrorResponse, ServerMessage};
pub use payment_flow::{FlowSettings, PaymentFlowController};
pub use ui_loop::{UiCommand, UiEventLoop};
