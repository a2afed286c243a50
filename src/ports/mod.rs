pub mod notification_port;
pub mod payment_gateway_port;
pub mod payment_request_port;

pub use notification_port::NotificationPort;
pub use payment_gateway_port::PaymentGatewayPort;
pub use payment_request_port::PaymentRequestPort;
