pub mod entities;
pub mod errors;
pub mod events;
pub mod value_objects;

pub use entities::PaymentAttempt;
pub use events::PaymentResponseEvent;
pub use value_objects::{
    Money, Notice, NoticePosition, PaymentCompletion, PaymentDetails, PaymentMethodDescriptor,
};
