use crate::application::ui_loop::UiCommand;
use crate::domain::{
    Notice, NoticePosition, PaymentCompletion, PaymentDetails, PaymentMethodDescriptor,
    PaymentResponseEvent,
};
use serde::{Deserialize, Serialize};

/// 浏览器发往服务端的消息
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// 支持探测结果
    SupportResult { supported: bool },

    /// 按钮点击
    ButtonClick,

    /// 原生支付窗口返回的响应
    PaymentResponse {
        response_id: String,
        data: serde_json::Value,
    },
}

impl From<ClientMessage> for UiCommand {
    fn from(message: ClientMessage) -> Self {
        match message {
            ClientMessage::SupportResult { supported } => UiCommand::SupportResolved(supported),
            ClientMessage::ButtonClick => UiCommand::ButtonClicked,
            ClientMessage::PaymentResponse { response_id, data } => {
                UiCommand::PaymentResponse(PaymentResponseEvent::new(response_id, data))
            }
        }
    }
}

/// 服务端发往浏览器的消息
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// 询问是否支持 Payment Request API
    QuerySupport,

    /// 绑定支付请求到按钮
    InstallPaymentRequest {
        methods: Vec<PaymentMethodDescriptor>,
        details: PaymentDetails,
    },

    /// 关闭原生支付窗口
    CompletePayment {
        response_id: String,
        result: PaymentCompletion,
    },

    /// 显示通知
    ShowNotification {
        message: String,
        duration_ms: u64,
        position: NoticePosition,
    },
}

impl From<Notice> for ServerMessage {
    fn from(notice: Notice) -> Self {
        ServerMessage::ShowNotification {
            message: notice.message,
            duration_ms: u64::try_from(notice.duration.as_millis()).unwrap_or(u64::MAX),
            position: notice.position,
        }
    }
}

/// 错误响应
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: String, message: String) -> Self {
        Self { error, message }
    }
}
